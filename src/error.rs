use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportcardError {
    #[error("invalid repository path: {0} (expected host/owner/name)")]
    InvalidRepoPath(String),

    #[error("no vcs host configured for: {0}")]
    UnknownHost(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("could not download repository: `{command}` failed: {output}")]
    Download { command: String, output: String },

    #[error("no source files found in {0}")]
    NoFiles(String),

    #[error("check {check} failed: {message}")]
    CheckExecution { check: String, message: String },

    #[error("corrupt cache entry {key}: {message}")]
    CacheDecode { key: String, message: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportcardError {
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportcardError>;
