//! Environment override resolution
//!
//! Layers (lowest to highest): process environment, `.env`, `.env.local`.
//! Only prefixed variables become config keys; the dedicated token variable
//! maps to `token`.
//!
//! Keys derived from variable names are lowercase (`CLIBASE_API_URL` →
//! `api_url`). Stored keys are case-sensitive, so a stored `API_URL` is never
//! shadowed by an override.
//!
//! Empty values are not overrides: `API_TOKEN=` in a `.env` template leaves
//! the stored token in effect. For `token`, a blank value counts as empty.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Environment, Source};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{DotenvFile, EnvOverrides, TOKEN_KEY};
use crate::infrastructure::traits::{EnvSource, FileSystem};

/// Override files, in increasing precedence.
pub const DOTENV_FILES: [&str; 2] = [".env", ".env.local"];

/// Prefix for variables that map to generic config keys.
pub const ENV_PREFIX: &str = "CLIBASE";

/// Unprefixed variable carrying the credential.
pub const TOKEN_ENV_VAR: &str = "API_TOKEN";

/// Loads environment overrides. Read-only; never writes anywhere.
pub struct EnvResolver {
    fs: Arc<dyn FileSystem>,
    env: Arc<dyn EnvSource>,
    work_dir: PathBuf,
}

impl EnvResolver {
    pub fn new(fs: Arc<dyn FileSystem>, env: Arc<dyn EnvSource>, work_dir: PathBuf) -> Self {
        Self { fs, env, work_dir }
    }

    /// Directory searched for override files.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Raw variables after layering process env and override files.
    ///
    /// Missing files are skipped. An unreadable file is logged and skipped;
    /// malformed lines inside a file are skipped one by one.
    pub fn load_raw(&self) -> BTreeMap<String, String> {
        let mut vars = self.env.vars();
        debug!("load_raw: {} process variables", vars.len());

        for name in DOTENV_FILES {
            let path = self.work_dir.join(name);
            if !self.fs.is_file(&path) {
                continue;
            }
            let content = match self.fs.read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!("skipping unreadable override file {}: {}", path.display(), e);
                    continue;
                }
            };

            let parsed = DotenvFile::parse(&content);
            for skipped in &parsed.skipped {
                warn!(
                    "{}:{}: skipped line ({})",
                    path.display(),
                    skipped.line_no,
                    skipped.reason
                );
            }
            debug!(
                "load_raw: {} variables from {}",
                parsed.variables.len(),
                path.display()
            );
            vars.extend(parsed.variables);
        }

        vars
    }

    /// Overrides projected onto config keys.
    ///
    /// `CLIBASE_API_URL` → `api_url`. `API_TOKEN` → `token`, winning over
    /// `CLIBASE_TOKEN`. Tool settings variables are not config keys.
    pub fn load_overrides(&self) -> ApplicationResult<EnvOverrides> {
        let raw = self.load_raw();
        let dedicated_token = raw
            .get(TOKEN_ENV_VAR)
            .filter(|t| !t.trim().is_empty())
            .cloned();

        let source: config::Map<String, String> = raw.into_iter().collect();
        let collected = Environment::with_prefix(ENV_PREFIX)
            .ignore_empty(true)
            .source(Some(source))
            .collect()
            .map_err(|e| ApplicationError::Config {
                message: format!("read environment overrides: {e}"),
            })?;

        let mut overrides = EnvOverrides::new();
        for (key, value) in collected {
            if key.is_empty() || Settings::ENV_KEYS.contains(&key.as_str()) {
                continue;
            }
            let value = value.into_string().map_err(|e| ApplicationError::Config {
                message: format!("environment override {key}: {e}"),
            })?;
            if key == TOKEN_KEY && value.trim().is_empty() {
                debug!("load_overrides: ignoring blank {ENV_PREFIX}_TOKEN");
                continue;
            }
            overrides.insert(key, value);
        }

        if let Some(token) = dedicated_token {
            overrides.insert(TOKEN_KEY, token);
        }

        debug!("load_overrides: {} keys", overrides.len());
        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::{MapEnv, RealFileSystem};
    use tempfile::TempDir;

    fn resolver(dir: &TempDir, env: MapEnv) -> EnvResolver {
        EnvResolver::new(
            Arc::new(RealFileSystem),
            Arc::new(env),
            dir.path().to_path_buf(),
        )
    }

    #[test]
    fn given_unprefixed_variable_when_loading_overrides_then_ignored() {
        let dir = TempDir::new().unwrap();
        let env = MapEnv::new().with("HOME", "/home/x").with("CLIBASE_REGION", "eu");

        let overrides = resolver(&dir, env).load_overrides().unwrap();

        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("region"), Some("eu"));
    }

    #[test]
    fn given_both_token_variables_when_loading_then_dedicated_wins() {
        let dir = TempDir::new().unwrap();
        let env = MapEnv::new()
            .with("CLIBASE_TOKEN", "prefixed")
            .with(TOKEN_ENV_VAR, "dedicated");

        let overrides = resolver(&dir, env).load_overrides().unwrap();

        assert_eq!(overrides.get(TOKEN_KEY), Some("dedicated"));
    }

    #[test]
    fn given_empty_values_when_loading_overrides_then_not_overrides() {
        let dir = TempDir::new().unwrap();
        let env = MapEnv::new()
            .with(TOKEN_ENV_VAR, "")
            .with("CLIBASE_TOKEN", "   ")
            .with("CLIBASE_REGION", "");

        let overrides = resolver(&dir, env).load_overrides().unwrap();

        assert!(overrides.is_empty());
    }

    #[test]
    fn given_blank_dedicated_token_when_loading_then_prefixed_token_applies() {
        let dir = TempDir::new().unwrap();
        let env = MapEnv::new()
            .with(TOKEN_ENV_VAR, "")
            .with("CLIBASE_TOKEN", "prefixed");

        let overrides = resolver(&dir, env).load_overrides().unwrap();

        assert_eq!(overrides.get(TOKEN_KEY), Some("prefixed"));
    }

    #[test]
    fn given_settings_variable_when_loading_overrides_then_not_a_config_key() {
        let dir = TempDir::new().unwrap();
        let env = MapEnv::new().with("CLIBASE_CONFIG_DIR", "/tmp/elsewhere");

        let overrides = resolver(&dir, env).load_overrides().unwrap();

        assert!(overrides.is_empty());
    }
}
