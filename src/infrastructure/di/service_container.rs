//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{AuthSession, ConfigManager, ConfigStore, EnvResolver};
use crate::config::Settings;
use crate::infrastructure::traits::{
    EnvSource, FileSystem, ProcessEnv, Prompt, RealFileSystem, TerminalPrompt,
};

/// Container holding all application services.
///
/// Built once per command invocation; nothing in it outlives the process.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Process environment abstraction
    pub env: Arc<dyn EnvSource>,

    /// Terminal prompt abstraction
    pub prompt: Arc<dyn Prompt>,

    pub config: Arc<ConfigManager>,
    pub auth: AuthSession,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(ProcessEnv),
            Arc::new(TerminalPrompt),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        env: Arc<dyn EnvSource>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        let settings = Arc::new(settings);

        let store = ConfigStore::new(fs.clone(), settings.config_path());
        let resolver = EnvResolver::new(fs.clone(), env.clone(), settings.work_dir.clone());
        let config = Arc::new(ConfigManager::new(store, resolver));
        let auth = AuthSession::new(config.clone(), prompt.clone());

        Self {
            settings,
            fs,
            env,
            prompt,
            config,
            auth,
        }
    }
}
