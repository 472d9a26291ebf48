//! clibase: configuration resolution and credential management for CLIs
//!
//! The resolved configuration merges a stored JSON document with
//! environment overrides (process environment, `.env`, `.env.local`), the
//! environment winning. Writes only ever touch the stored document.
//! [`application::services::AuthSession`] derives login state from the
//! resolved `token` key.
//!
//! Layers:
//! - [`domain`]: entities, dotenv parsing, no I/O
//! - [`application`]: services over the I/O traits
//! - [`infrastructure`]: I/O traits, real implementations, wiring
//! - [`cli`]: argument parsing and command entry points

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
