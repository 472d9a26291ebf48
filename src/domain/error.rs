//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent rule violations on config keys and credentials.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid config key: {0:?} (keys must be non-empty)")]
    InvalidKey(String),

    #[error("credential must not be empty")]
    EmptyCredential,
}

/// Reject keys that cannot be stored.
pub fn validate_key(key: &str) -> Result<(), DomainError> {
    if key.trim().is_empty() {
        return Err(DomainError::InvalidKey(key.to_string()));
    }
    Ok(())
}
