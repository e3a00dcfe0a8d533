pub mod remote;

use crate::error::{ReportcardError, Result};
use crate::scan::is_missing_or_empty;
use crate::types::config::ReportcardConfig;
use crate::types::repo::RepoIdentity;
use remote::RemoteLocation;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Makes a current local working copy of a repository identity available.
pub trait Downloader: Send + Sync {
    fn materialize(&self, identity: &RepoIdentity, local_root: &Path) -> Result<PathBuf>;
}

/// Drives the external `git` binary.
#[derive(Debug, Clone)]
pub struct GitDownloader {
    binary: String,
    prefixes: HashMap<String, String>,
}

impl GitDownloader {
    pub fn new<'a, I>(binary: impl Into<String>, hosts: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            binary: binary.into(),
            prefixes: hosts
                .into_iter()
                .map(|(host, prefix)| (host.to_string(), prefix.to_string()))
                .collect(),
        }
    }

    pub fn from_config(config: &ReportcardConfig) -> Self {
        Self::new(config.vcs.binary.clone(), config.host_prefixes())
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<()> {
        let command_line = format!("{} {}", self.binary, args.join(" "));
        tracing::debug!("cd {}; {}", dir.display(), command_line);

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(dir)
            .env("PWD", dir)
            .output()
            .map_err(|e| ReportcardError::Download {
                command: command_line.clone(),
                output: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));
        tracing::error!("# cd {}; {}\n{}", dir.display(), command_line, captured.trim());
        Err(ReportcardError::Download {
            command: command_line,
            output: captured.trim().to_string(),
        })
    }
}

impl Downloader for GitDownloader {
    fn materialize(&self, identity: &RepoIdentity, local_root: &Path) -> Result<PathBuf> {
        let location = RemoteLocation::parse(&identity.repo_path)?;
        let prefix = self
            .prefixes
            .get(&location.host)
            .ok_or_else(|| ReportcardError::UnknownHost(location.host.clone()))?;
        let working_dir = location.working_dir(local_root);

        if is_missing_or_empty(&working_dir) {
            std::fs::create_dir_all(&working_dir)?;
            let parent = working_dir.parent().unwrap_or(local_root);
            let remote = location.remote_url(prefix);
            tracing::info!("cloning {} into {}", remote, working_dir.display());
            self.run(parent, &["clone", &remote])?;
            self.run(&working_dir, &["checkout", &identity.branch])?;
        } else {
            tracing::info!("updating {} at {}", identity, working_dir.display());
            self.run(&working_dir, &["fetch", "--all"])?;
            self.run(&working_dir, &["checkout", &identity.branch])?;
            self.run(&working_dir, &["pull", "origin", &identity.branch])?;
        }

        Ok(working_dir)
    }
}
