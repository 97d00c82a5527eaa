//! Error types for the command-line front end.

use std::path::PathBuf;

use guide_core::GuideError;
use thiserror::Error;

/// Errors that end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A world file is not valid JSON for a world map.
    #[error("invalid world file {path}: {source}")]
    WorldFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Required configuration is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// The line editor could not be set up.
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// The async runtime could not be created.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Guide(#[from] GuideError),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
