/// A named, weighted check. `enable_arg` is the single-check filter passed to
/// the analysis tool.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub weight: f64,
    pub enable_arg: &'static str,
}

impl CheckDefinition {
    pub const fn new(
        name: &'static str,
        weight: f64,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            weight,
            enable_arg: name,
        }
    }

    /// Arguments for one tool invocation restricted to this check.
    pub fn command_args(&self, deadline_secs: u32) -> Vec<String> {
        vec![
            "run".to_string(),
            "--out-format=json".to_string(),
            format!("--deadline={deadline_secs}s"),
            "--disable-all".to_string(),
            format!("--enable={}", self.enable_arg),
            "--skip-dirs-use-default".to_string(),
            "--tests=false".to_string(),
            "--allow-parallel-runners".to_string(),
        ]
    }
}

const DEFAULT_CHECKS: [CheckDefinition; 13] = [
    CheckDefinition::new(
        "govet",
        0.30,
        "Vet examines Go source code and reports suspicious constructs, such as Printf calls whose arguments do not align with the format string.",
    ),
    CheckDefinition::new(
        "errcheck",
        0.10,
        "Errcheck finds unchecked errors in Go programs. These unchecked errors can be critical bugs in some cases.",
    ),
    CheckDefinition::new(
        "ineffassign",
        0.05,
        "Detects when assignments to existing variables are not used.",
    ),
    CheckDefinition::new("deadcode", 0.05, "Finds unused code."),
    CheckDefinition::new(
        "gosimple",
        0.05,
        "Linter for Go source code that specializes in simplifying code.",
    ),
    CheckDefinition::new(
        "staticcheck",
        0.05,
        "Staticcheck is go vet on steroids, applying a ton of static analysis checks.",
    ),
    CheckDefinition::new("structcheck", 0.05, "Finds unused struct fields."),
    CheckDefinition::new(
        "unused",
        0.10,
        "Reports unused constants, variables, functions and types.",
    ),
    CheckDefinition::new("varcheck", 0.05, "Finds unused global variables and constants."),
    CheckDefinition::new(
        "typecheck",
        0.05,
        "Like the front-end of a Go compiler, parses and type-checks Go code.",
    ),
    CheckDefinition::new("funlen", 0.10, "Detects long functions."),
    CheckDefinition::new("lll", 0.10, "Reports long lines."),
    CheckDefinition::new("nestif", 0.15, "Reports deeply nested if statements."),
];

/// The fixed set of checks every run executes. Extend by appending.
pub fn default_checks() -> Vec<CheckDefinition> {
    DEFAULT_CHECKS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_checks_have_unique_names_and_valid_weights() {
        let checks = default_checks();
        let names = checks.iter().map(|check| check.name).collect::<HashSet<_>>();
        assert_eq!(names.len(), checks.len());
        assert!(checks
            .iter()
            .all(|check| check.weight > 0.0 && check.weight <= 1.0));
    }

    #[test]
    fn command_args_filter_to_single_check() {
        let check = CheckDefinition::new("govet", 0.3, "vet");
        let args = check.command_args(180);
        assert!(args.contains(&"--disable-all".to_string()));
        assert!(args.contains(&"--enable=govet".to_string()));
        assert!(args.contains(&"--deadline=180s".to_string()));
        assert!(args.contains(&"--skip-dirs-use-default".to_string()));
        assert!(args.contains(&"--tests=false".to_string()));
    }
}
