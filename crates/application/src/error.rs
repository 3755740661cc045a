//! Error types for the application layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or validating [`crate::Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {source}")]
    Parse {
        /// File the JSON came from, if any.
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Errors talking to a running arbiter.
#[derive(Debug, Error)]
pub enum ArbiterError {
    /// The arbiter task has shut down.
    #[error("arbiter is no longer running")]
    Closed,

    /// The arbiter task panicked or was cancelled.
    #[error("arbiter task failed: {0}")]
    TaskFailed(String),
}
