// Error taxonomy for a configure run. Every variant is terminal for the
// run; `exit_code` gives each failure category its own process status.

use crate::params::ValidationError;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigureError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a configuration file already exists at {path}; rerun with --overwrite or confirm the overwrite prompt to replace it")]
    ExistingConfig { path: PathBuf },

    #[error("failed to read answer from terminal: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("failed to fetch configuration from panel: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("the configuration token is invalid")]
    TokenInvalid,

    #[error("the configuration token is expired")]
    TokenExpired,

    #[error("unknown error returned by panel: {body}")]
    UnknownPanelError { body: String },

    #[error("failed to fetch configuration from panel: HTTP {status}")]
    Status { status: StatusCode },

    #[error("panel returned a configuration that is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to write configuration to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigureError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigureError::Validation(_) => 2,
            ConfigureError::ExistingConfig { .. } => 3,
            ConfigureError::ClientBuild(_) | ConfigureError::Transport(_) => 4,
            ConfigureError::TokenInvalid
            | ConfigureError::TokenExpired
            | ConfigureError::UnknownPanelError { .. }
            | ConfigureError::Status { .. } => 5,
            ConfigureError::Parse(_) => 6,
            ConfigureError::Write { .. } => 7,
            ConfigureError::Prompt(_) => 8,
        }
    }
}

/// Log a failed run once at error severity and pick its exit code.
/// Errors that are not a `ConfigureError` exit with 1.
pub fn report(err: &anyhow::Error) -> i32 {
    tracing::error!("{}", err);
    err.downcast_ref::<ConfigureError>()
        .map(ConfigureError::exit_code)
        .unwrap_or(1)
}
