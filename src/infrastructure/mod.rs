//! Infrastructure layer: I/O implementations and DI container
//!
//! Filesystem, process environment and terminal prompts sit behind the
//! traits in [`traits`]; [`di`] wires them into the services.

pub mod di;
pub mod error;
pub mod traits;

pub use error::InfraError;
