//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, EnvSource, Prompt)
//! but are themselves concrete structs, not traits.

mod auth_session;
mod config_manager;
mod config_store;
mod env_resolver;

pub use auth_session::{AuthSession, LogoutOutcome, WhoAmI, TOKEN_PROMPT};
pub use config_manager::ConfigManager;
pub use config_store::ConfigStore;
pub use env_resolver::{EnvResolver, DOTENV_FILES, ENV_PREFIX, TOKEN_ENV_VAR};
