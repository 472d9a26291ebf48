//! Domain layer: entities and pure logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod dotenv;
pub mod entities;
pub mod error;

pub use dotenv::{DotenvFile, SkippedLine};
pub use entities::*;
pub use error::{validate_key, DomainError};
