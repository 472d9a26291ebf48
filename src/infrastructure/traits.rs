//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations (filesystem, process
//! environment, terminal prompts), allowing services to be tested with
//! in-memory implementations.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;

    /// Replace the file at `path` with `content` in one step.
    ///
    /// Writes a private (owner-only) temp file next to `path` and renames it
    /// into place, so readers see either the old or the new document.
    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Source of process-level environment variables.
pub trait EnvSource: Send + Sync {
    /// All variables with valid UTF-8 names and values.
    fn vars(&self) -> BTreeMap<String, String>;
}

/// Interactive terminal input.
///
/// All calls block. A cancelled prompt (interrupt, closed stdin) surfaces as
/// an `io::Error` of kind `Interrupted` or `UnexpectedEof`.
pub trait Prompt: Send + Sync {
    /// Plain text input.
    fn ask_text(&self, label: &str) -> io::Result<String>;

    /// Masked input; typed characters are not echoed.
    fn ask_secret(&self, label: &str) -> io::Result<String>;

    /// Yes/no question.
    fn ask_confirm(&self, label: &str) -> io::Result<bool>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        // tempfile creates the file with mode 0600 on unix
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Live process environment.
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn vars(&self) -> BTreeMap<String, String> {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// In-memory environment, for tests and embedding hosts.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MapEnv {
    fn vars(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }
}

/// Terminal prompt: rpassword for masked input, dialoguer for the rest.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask_text(&self, label: &str) -> io::Result<String> {
        use dialoguer::{theme::ColorfulTheme, Input};

        let value: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .interact_text()
            .map_err(dialoguer_io)?;
        Ok(value)
    }

    fn ask_secret(&self, label: &str) -> io::Result<String> {
        rpassword::prompt_password(format!("{label}: "))
    }

    fn ask_confirm(&self, label: &str) -> io::Result<bool> {
        use dialoguer::{theme::ColorfulTheme, Confirm};

        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .default(false)
            .interact()
            .map_err(dialoguer_io)?;
        Ok(answer)
    }
}

/// Unwrap a dialoguer error into its `io::Error`, keeping the kind
/// (`Interrupted` on Ctrl-C).
fn dialoguer_io(err: dialoguer::Error) -> io::Error {
    match err {
        dialoguer::Error::IO(e) => e,
    }
}
