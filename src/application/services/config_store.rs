//! Persisted config document
//!
//! One JSON object at a fixed path. Absence means an empty document; a file
//! that is not a JSON object is an error and is never rewritten implicitly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::ConfigDocument;
use crate::infrastructure::traits::FileSystem;

/// Reads and writes the config document.
pub struct ConfigStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    /// Location of the config document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored document.
    ///
    /// # Errors
    /// - `CorruptConfig` if the file is not valid JSON or not a JSON object
    /// - `Persistence` if the file exists but cannot be read
    pub fn read_document(&self) -> ApplicationResult<ConfigDocument> {
        debug!("read_document: path={}", self.path.display());
        if !self.fs.exists(&self.path) {
            debug!("read_document: no file, using empty document");
            return Ok(ConfigDocument::new());
        }

        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read config", &self.path)?;

        let value: Value =
            serde_json::from_str(&content).map_err(|e| ApplicationError::CorruptConfig {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ApplicationError::CorruptConfig {
                path: self.path.clone(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Replace the whole stored document.
    ///
    /// Creates the containing directory on first write. The write goes
    /// through a temp file and rename, so a failure leaves the previous
    /// document intact.
    pub fn write_document(&self, doc: &ConfigDocument) -> ApplicationResult<()> {
        debug!(
            "write_document: path={}, keys={}",
            self.path.display(),
            doc.len()
        );
        let mut json = serde_json::to_string_pretty(doc).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize config".to_string(),
                source: Box::new(e),
            }
        })?;
        json.push('\n');

        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create config directory", &self.path)?;
        self.fs
            .write_atomic(&self.path, &json)
            .with_path_context("write config", &self.path)?;
        Ok(())
    }

    /// Remove `key` from the stored document.
    ///
    /// Returns `false` without writing if the key was not stored.
    pub fn delete_key(&self, key: &str) -> ApplicationResult<bool> {
        debug!("delete_key: key={}", key);
        let mut doc = self.read_document()?;
        if doc.remove(key).is_none() {
            debug!("delete_key: {} not stored, nothing to do", key);
            return Ok(false);
        }
        self.write_document(&doc)?;
        Ok(true)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
