//! Settings of the tool itself (where state lives), with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults: platform config dir, current working directory
//! 2. Environment variables: `CLIBASE_*` prefix
//! 3. Command-line flags
//!
//! These settings locate the config document; they are not entries in it.

use std::path::{Path, PathBuf};

use config::{Environment, Source};
use directories::ProjectDirs;

use crate::application::{ApplicationError, ApplicationResult};
use crate::application::services::ENV_PREFIX;
use crate::util::path::expand_env_vars;
use crate::infrastructure::traits::EnvSource;

/// File name of the config document inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Application name used for the platform config directory.
pub const APP_NAME: &str = "clibase";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the config document
    pub config_dir: PathBuf,
    /// Directory searched for `.env` / `.env.local`
    pub work_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            config_dir: default_config_dir(),
            work_dir,
        }
    }
}

/// Platform config directory for the application.
///
/// Falls back to `~/.config/clibase` when no home directory can be found.
pub fn default_config_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(expand_env_vars("~/.config/clibase")))
}

impl Settings {
    /// Keys (after prefix stripping) that configure the tool and are
    /// therefore not config overrides.
    pub const ENV_KEYS: [&'static str; 1] = ["config_dir"];

    /// Path of the config document.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load settings from defaults and the given environment.
    pub fn load(env: &dyn EnvSource) -> ApplicationResult<Self> {
        let current = Self::default();
        let mut current = Self::apply_env_overrides(current, env)?;
        current.expand_paths();
        Ok(current)
    }

    /// Apply command-line flags on top; `None` keeps the loaded value.
    pub fn with_overrides(mut self, config_dir: Option<&Path>, work_dir: Option<&Path>) -> Self {
        if let Some(dir) = config_dir {
            self.config_dir = dir.to_path_buf();
        }
        if let Some(dir) = work_dir {
            self.work_dir = dir.to_path_buf();
        }
        self.expand_paths();
        self
    }

    /// Apply CLIBASE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: &dyn EnvSource) -> ApplicationResult<Self> {
        let source: config::Map<String, String> = env.vars().into_iter().collect();
        let vars = Environment::with_prefix(ENV_PREFIX)
            .source(Some(source))
            .collect()
            .map_err(|e| ApplicationError::Config {
                message: e.to_string(),
            })?;

        if let Some(val) = vars.get("config_dir") {
            let val = val.clone().into_string().map_err(|e| ApplicationError::Config {
                message: format!("{ENV_PREFIX}_CONFIG_DIR: {e}"),
            })?;
            if !val.is_empty() {
                settings.config_dir = PathBuf::from(val);
            }
        }
        Ok(settings)
    }

    /// Expand shell variables and tilde in path fields.
    fn expand_paths(&mut self) {
        self.config_dir = PathBuf::from(expand_env_vars(&self.config_dir.to_string_lossy()));
        self.work_dir = PathBuf::from(expand_env_vars(&self.work_dir.to_string_lossy()));
    }
}
