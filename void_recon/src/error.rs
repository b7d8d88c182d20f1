//! Error types for the application crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a landmark source could not deliver frames.
///
/// Neither variant is retried automatically; the user restarts the feed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The device exists but access was refused.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// No device, driver or service to talk to.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type AppResult<T> = Result<T, AppError>;
