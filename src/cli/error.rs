//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("key not set: {0}")]
    NotFound(String),

    /// Login wrote a credential but the resolved state is still logged out.
    #[error("credential stored but not in effect: {0}")]
    CredentialShadowed(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::NotFound(_) => crate::exitcode::NOTFOUND,
            CliError::CredentialShadowed(_) => crate::exitcode::NOPERM,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::CorruptConfig { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Persistence { .. } => crate::exitcode::CANTCREAT,
                    ApplicationError::InputAborted => crate::exitcode::INTERRUPTED,
                    ApplicationError::AuthRequired => crate::exitcode::NOPERM,
                    ApplicationError::Domain(DomainError::InvalidKey(_))
                    | ApplicationError::Domain(DomainError::EmptyCredential) => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}
