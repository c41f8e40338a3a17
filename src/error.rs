//! Error types for versify operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while loading canons or extracting scripture text.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Versification not found: {0}")]
    NotFound(String),

    #[error("Versification inheritance cycle: {0}")]
    InheritanceCycle(String),

    #[error("Timed out after {after:?} fetching {module} {reference}")]
    Timeout {
        module: String,
        reference: String,
        after: Duration,
    },

    #[error("Text retrieval tool not available: {0}")]
    ToolUnavailable(String),

    #[error("Unknown module(s): {}", .0.join(", "))]
    UnknownModule(Vec<String>),

    #[error("Invalid module id {0:?}: must be a bare file name")]
    InvalidModuleId(String),
}

pub type Result<T> = std::result::Result<T, Error>;
