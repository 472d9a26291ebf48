//! Resolved configuration
//!
//! Merges the stored document with environment overrides on every call.
//! Writes go to the stored document only.
//!
//! # Precedence (lowest to highest)
//! 1. Stored document: `<config_dir>/config.json`
//! 2. Process environment: `CLIBASE_*`, `API_TOKEN`
//! 3. `.env` in the working directory
//! 4. `.env.local` in the working directory
//!
//! A `set` on a key that an override shadows is persisted, but `load` keeps
//! returning the override until it disappears.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::application::services::{ConfigStore, EnvResolver};
use crate::application::ApplicationResult;
use crate::domain::{validate_key, value_to_string, ConfigDocument, ResolvedConfig, TOKEN_KEY};

/// Configuration service over the stored and environment layers.
pub struct ConfigManager {
    store: ConfigStore,
    resolver: EnvResolver,
}

impl ConfigManager {
    pub fn new(store: ConfigStore, resolver: EnvResolver) -> Self {
        Self { store, resolver }
    }

    /// Path of the stored document.
    pub fn config_path(&self) -> &Path {
        self.store.path()
    }

    /// Directory searched for `.env` / `.env.local`.
    pub fn work_dir(&self) -> &Path {
        self.resolver.work_dir()
    }

    /// Fresh merge of both layers; overrides win.
    pub fn load(&self) -> ApplicationResult<ResolvedConfig> {
        let document = self.store.read_document()?;
        let overrides = self.resolver.load_overrides()?;
        debug!(
            "load: {} stored keys, {} override keys",
            document.len(),
            overrides.len()
        );
        Ok(ResolvedConfig::merge(document, &overrides))
    }

    pub fn get(&self, key: &str) -> ApplicationResult<Option<Value>> {
        Ok(self.load()?.get(key).cloned())
    }

    /// Persist `key = value` into the stored document.
    pub fn set(&self, key: &str, value: Value) -> ApplicationResult<()> {
        debug!("set: key={}", key);
        validate_key(key)?;

        let mut doc = self.store.read_document()?;
        doc.insert(key.to_string(), value);
        self.store.write_document(&doc)?;

        if self.shadowing_override(key)?.is_some() {
            warn!(
                "{} is overridden by the environment; the stored value takes effect once the override is removed",
                key
            );
        }
        Ok(())
    }

    /// Remove `key` from the stored document.
    ///
    /// Returns whether a stored value existed. Environment values for the
    /// key stay in effect.
    pub fn delete(&self, key: &str) -> ApplicationResult<bool> {
        debug!("delete: key={}", key);
        validate_key(key)?;
        self.store.delete_key(key)
    }

    /// Resolved credential, rendered as a string. A stored `null` is absent.
    pub fn read_token(&self) -> ApplicationResult<Option<String>> {
        Ok(self
            .load()?
            .get(TOKEN_KEY)
            .filter(|v| !v.is_null())
            .map(value_to_string))
    }

    pub fn write_token(&self, token: &str) -> ApplicationResult<()> {
        self.set(TOKEN_KEY, Value::String(token.to_string()))
    }

    /// The stored layer alone.
    pub fn stored_document(&self) -> ApplicationResult<ConfigDocument> {
        self.store.read_document()
    }

    /// Override value that hides the stored value of `key`, if any.
    pub fn shadowing_override(&self, key: &str) -> ApplicationResult<Option<String>> {
        Ok(self.resolver.load_overrides()?.get(key).map(str::to_string))
    }

    /// Replace the stored document with an empty one.
    pub fn reset(&self) -> ApplicationResult<()> {
        debug!("reset: path={}", self.store.path().display());
        self.store.write_document(&ConfigDocument::new())
    }
}
