//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Stored config exists but is not a JSON object.
    #[error("corrupt config file {}: {message}", path.display())]
    CorruptConfig { path: PathBuf, message: String },

    /// Filesystem failure while persisting or reading state.
    #[error("{context}")]
    Persistence {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("input aborted")]
    InputAborted,

    #[error("authentication required: run `login` first")]
    AuthRequired,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// True if this error is (or wraps) an authentication failure.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, ApplicationError::AuthRequired)
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
