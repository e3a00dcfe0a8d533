use serde::{Deserialize, Serialize};
use std::fmt;

/// A scan target: repository path plus branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoIdentity {
    pub repo_path: String,
    pub branch: String,
}

impl RepoIdentity {
    pub fn new(repo_path: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            branch: branch.into(),
        }
    }

    pub fn key(&self) -> String {
        format!("{}@{}", self.repo_path, self.branch)
    }

    /// Inverse of [`RepoIdentity::key`]. Input without exactly one `@` keeps the
    /// whole string as the repository path and an empty branch.
    pub fn parse(identity: &str) -> Self {
        let parts = identity.split('@').collect::<Vec<_>>();
        match parts.as_slice() {
            [repo, branch] => Self::new(*repo, *branch),
            _ => Self::new(identity, ""),
        }
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_path_and_branch() {
        let identity = RepoIdentity::new("github.com/acme/widget", "main");
        assert_eq!(identity.key(), "github.com/acme/widget@main");
    }

    #[test]
    fn parse_splits_key_back_into_fields() {
        let identity = RepoIdentity::parse("github.com/acme/widget@dev");
        assert_eq!(identity, RepoIdentity::new("github.com/acme/widget", "dev"));
    }

    #[test]
    fn parse_without_branch_yields_empty_branch() {
        let identity = RepoIdentity::parse("github.com/acme/widget");
        assert_eq!(identity.repo_path, "github.com/acme/widget");
        assert!(identity.branch.is_empty());
    }

    #[test]
    fn identities_differ_by_branch() {
        assert_ne!(
            RepoIdentity::new("github.com/acme/widget", "main"),
            RepoIdentity::new("github.com/acme/widget", "dev")
        );
    }
}
