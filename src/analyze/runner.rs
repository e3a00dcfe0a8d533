use super::parse::{parse_report, passing_percentage};
use super::registry::CheckDefinition;
use crate::error::{ReportcardError, Result};
use crate::types::config::LintConfig;
use crate::types::report::FileSummary;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub percentage: f64,
    pub file_summaries: Vec<FileSummary>,
}

/// Runs one check against a working copy. Implementations are shared across
/// the per-check worker threads.
pub trait CheckRunner: Send + Sync {
    fn run(&self, check: &CheckDefinition, dir: &Path, files: &[PathBuf]) -> Result<CheckOutcome>;
}

/// Invokes the external analysis tool once per check.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    tool: String,
    deadline_secs: u32,
    issues_exit_code: i32,
}

impl ToolRunner {
    pub fn new(tool: impl Into<String>, deadline_secs: u32, issues_exit_code: i32) -> Self {
        Self {
            tool: tool.into(),
            deadline_secs,
            issues_exit_code,
        }
    }

    pub fn from_config(config: &LintConfig) -> Self {
        Self::new(
            config.tool.clone(),
            config.deadline_secs,
            config.issues_exit_code,
        )
    }

    fn failure(check: &CheckDefinition, message: impl Into<String>) -> ReportcardError {
        ReportcardError::CheckExecution {
            check: check.name.to_string(),
            message: message.into(),
        }
    }
}

impl CheckRunner for ToolRunner {
    fn run(&self, check: &CheckDefinition, dir: &Path, files: &[PathBuf]) -> Result<CheckOutcome> {
        let args = check.command_args(self.deadline_secs);
        tracing::debug!("cd {}; {} {}", dir.display(), self.tool, args.join(" "));

        let output = Command::new(&self.tool)
            .args(&args)
            .current_dir(dir)
            .output()
            .map_err(|e| Self::failure(check, format!("could not start {}: {e}", self.tool)))?;

        let code = output.status.code();
        if code != Some(0) && code != Some(self.issues_exit_code) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::failure(
                check,
                format!(
                    "{} exited with {}: {}",
                    self.tool,
                    code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
                    stderr.trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let file_summaries = parse_report(&stdout)
            .map_err(|e| Self::failure(check, format!("unreadable tool output: {e}")))?;
        Ok(CheckOutcome {
            percentage: passing_percentage(dir, files, &file_summaries),
            file_summaries,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-lint");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("script should write");
        let mut permissions = fs::metadata(&path).expect("metadata").permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions).expect("script should be executable");
        path
    }

    fn files(count: usize) -> Vec<PathBuf> {
        (0..count).map(|i| PathBuf::from(format!("f{i}.go"))).collect()
    }

    #[test]
    fn tool_runner_treats_issue_exit_code_as_success() {
        let dir = TempDir::new().expect("temp dir should be created");
        let tool = fake_tool(
            dir.path(),
            r#"echo '{"Issues":[{"Text":"bad","Pos":{"Filename":"f0.go","Line":3}}]}'
exit 1"#,
        );
        let runner = ToolRunner::new(tool.to_string_lossy(), 60, 1);
        let check = CheckDefinition::new("govet", 0.3, "vet");

        let outcome = runner
            .run(&check, dir.path(), &files(4))
            .expect("issue exit should not fail the check");
        assert_eq!(outcome.percentage, 75.0);
        assert_eq!(outcome.file_summaries.len(), 1);
    }

    #[test]
    fn tool_runner_reports_unexpected_exit() {
        let dir = TempDir::new().expect("temp dir should be created");
        let tool = fake_tool(dir.path(), "echo 'panic: boom' >&2\nexit 3");
        let runner = ToolRunner::new(tool.to_string_lossy(), 60, 1);
        let check = CheckDefinition::new("errcheck", 0.1, "errcheck");

        let result = runner.run(&check, dir.path(), &files(2));
        assert!(matches!(
            result,
            Err(ReportcardError::CheckExecution { check, message })
                if check == "errcheck" && message.contains("panic: boom")
        ));
    }

    #[test]
    fn tool_runner_reports_missing_tool() {
        let dir = TempDir::new().expect("temp dir should be created");
        let runner = ToolRunner::new("reportcard-no-such-lint-tool", 60, 1);
        let check = CheckDefinition::new("govet", 0.3, "vet");
        assert!(runner.run(&check, dir.path(), &files(1)).is_err());
    }
}
