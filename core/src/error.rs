//! Error types for savina-driver-core

use std::path::PathBuf;

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum DriverError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A results directory could not be prepared
    #[error("cannot prepare results directory {path}: {source}")]
    ResultsDir {
        /// Directory that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A benchmark process could not be started or awaited
    #[error("launch error: {0}")]
    Launch(String),

    /// The core-activation helper could not be run
    #[error("core activation error: {0}")]
    Activation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DriverError {
    /// Configuration value is missing from a builder
    pub fn missing_config(what: &str) -> Self {
        Self::Config(format!("missing required field: {what}"))
    }

    /// Generic configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Launch failure for a single invocation
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// Activation helper failure
    pub fn activation(msg: impl Into<String>) -> Self {
        Self::Activation(msg.into())
    }
}

/// Result type alias
pub type DriverResult<T> = std::result::Result<T, DriverError>;
