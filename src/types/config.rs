use crate::error::ReportcardError;
use crate::types::repo::RepoIdentity;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportcardConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub vcs: VcsConfig,
    #[serde(default)]
    pub lint: LintConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Redb,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
        }
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::Redb
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".reportcard/cache.redb")
}

#[derive(Debug, Clone, Deserialize)]
pub struct VcsHost {
    pub host: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VcsConfig {
    #[serde(default = "default_git_binary")]
    pub binary: String,
    #[serde(default = "default_repo_root")]
    pub repo_root: PathBuf,
    #[serde(default = "default_hosts")]
    pub hosts: Vec<VcsHost>,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            binary: default_git_binary(),
            repo_root: default_repo_root(),
            hosts: default_hosts(),
        }
    }
}

fn default_git_binary() -> String {
    "git".to_string()
}

fn default_repo_root() -> PathBuf {
    PathBuf::from("reportcard-repos")
}

fn default_hosts() -> Vec<VcsHost> {
    vec![VcsHost {
        host: "github.com".to_string(),
        prefix: "git".to_string(),
    }]
}

#[derive(Debug, Clone, Deserialize)]
pub struct LintConfig {
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u32,
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    #[serde(default)]
    pub skip_dirs: Vec<String>,
    #[serde(default = "default_issues_exit_code")]
    pub issues_exit_code: i32,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            deadline_secs: default_deadline_secs(),
            source_extension: default_source_extension(),
            skip_dirs: Vec::new(),
            issues_exit_code: default_issues_exit_code(),
        }
    }
}

fn default_tool() -> String {
    "golangci-lint".to_string()
}

fn default_deadline_secs() -> u32 {
    180
}

fn default_source_extension() -> String {
    "go".to_string()
}

fn default_issues_exit_code() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct UriFormatRule {
    pub prefix: String,
    pub uri_format: String,
}

impl UriFormatRule {
    /// Expands `{repo}`, `{branch}` and `{file}` in the rule's format.
    pub fn expand(&self, identity: &RepoIdentity, file: &str) -> String {
        self.uri_format
            .replace("{repo}", &identity.repo_path)
            .replace("{branch}", &identity.branch)
            .replace("{file}", file.trim_start_matches("./"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_uri_rules")]
    pub uri_format_rules: Vec<UriFormatRule>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            uri_format_rules: default_uri_rules(),
        }
    }
}

fn default_uri_rules() -> Vec<UriFormatRule> {
    vec![UriFormatRule {
        prefix: "github.com".to_string(),
        uri_format: "https://{repo}/blob/{branch}/{file}".to_string(),
    }]
}

impl ReportConfig {
    pub fn file_url(&self, identity: &RepoIdentity, file: &str) -> Option<String> {
        self.uri_format_rules
            .iter()
            .find(|rule| identity.repo_path.starts_with(&rule.prefix))
            .map(|rule| rule.expand(identity, file))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_serialize_per_repo")]
    pub serialize_per_repo: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            serialize_per_repo: default_serialize_per_repo(),
        }
    }
}

fn default_serialize_per_repo() -> bool {
    true
}

impl ReportcardConfig {
    pub fn validate(&self) -> Result<(), ReportcardError> {
        if self.vcs.binary.trim().is_empty() {
            return Err(ReportcardError::ConfigParse(
                "vcs.binary must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for host in &self.vcs.hosts {
            if host.host.trim().is_empty() || host.prefix.trim().is_empty() {
                return Err(ReportcardError::ConfigParse(
                    "vcs.hosts entries need a non-empty host and prefix".to_string(),
                ));
            }
            if !seen.insert(host.host.as_str()) {
                return Err(ReportcardError::ConfigParse(format!(
                    "vcs.hosts contains duplicate host: {}",
                    host.host
                )));
            }
        }

        if self.lint.tool.trim().is_empty() {
            return Err(ReportcardError::ConfigParse(
                "lint.tool must not be empty".to_string(),
            ));
        }
        if self.lint.deadline_secs == 0 {
            return Err(ReportcardError::ConfigParse(
                "lint.deadline_secs must be greater than 0".to_string(),
            ));
        }
        if self.lint.source_extension.trim().is_empty() {
            return Err(ReportcardError::ConfigParse(
                "lint.source_extension must not be empty".to_string(),
            ));
        }

        for rule in &self.report.uri_format_rules {
            if !rule.uri_format.contains("{file}") {
                return Err(ReportcardError::ConfigParse(format!(
                    "report.uri_format_rules entry for '{}' must contain {{file}}",
                    rule.prefix
                )));
            }
        }

        Ok(())
    }

    pub fn host_prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vcs
            .hosts
            .iter()
            .map(|host| (host.host.as_str(), host.prefix.as_str()))
    }
}
