use crate::error::{ReportcardError, Result};
use std::path::{Path, PathBuf};

/// `host/owner/name` split out of a repository path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RemoteLocation {
    pub fn parse(repo_path: &str) -> Result<Self> {
        let parts = repo_path.split('/').collect::<Vec<_>>();
        match parts.as_slice() {
            [host, owner, name] if [host, owner, name].iter().all(|part| is_plain_segment(part)) => {
                Ok(Self {
                    host: (*host).to_string(),
                    owner: (*owner).to_string(),
                    name: (*name).to_string(),
                })
            }
            _ => Err(ReportcardError::InvalidRepoPath(repo_path.to_string())),
        }
    }

    pub fn working_dir(&self, local_root: &Path) -> PathBuf {
        local_root.join(&self.host).join(&self.owner).join(&self.name)
    }

    /// `{prefix}@{host}:{owner}/{name}.git`
    pub fn remote_url(&self, prefix: &str) -> String {
        format!("{}@{}:{}/{}.git", prefix, self.host, self.owner, self.name)
    }
}

/// Rejects empty, `.`/`..` and option-like segments so the working dir stays
/// under the checkout root and no segment reaches the VCS binary as a flag.
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.starts_with('-')
}
