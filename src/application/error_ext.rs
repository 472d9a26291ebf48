//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error, classifying it as a persistence failure.
    ///
    /// # Example
    /// ```ignore
    /// fs.write_atomic(&path, &json)
    ///     .with_path_context("write config", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Persistence {
            context: format!("{}: {}: {}", action, path.display(), e),
            source: Box::new(e),
        })
    }
}

/// Extension trait for prompt results: cancellation becomes `InputAborted`.
pub trait PromptResultExt<T> {
    /// Map an interrupted or closed prompt to `InputAborted`, anything else
    /// to `OperationFailed` with `action` as context.
    fn or_aborted(self, action: &str) -> ApplicationResult<T>;
}

impl<T> PromptResultExt<T> for io::Result<T> {
    fn or_aborted(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| match e.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => {
                ApplicationError::InputAborted
            }
            _ => ApplicationError::OperationFailed {
                context: action.to_string(),
                source: Box::new(e),
            },
        })
    }
}
