//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// CLI foundation: layered config (stored + env/dotenv) and credential management
#[derive(Parser, Debug)]
#[command(name = "clibase")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory searched for .env / .env.local (default: cwd)
    #[arg(short = 'C', long = "dir", global = true, value_hint = ValueHint::DirPath)]
    pub work_dir: Option<PathBuf>,

    /// Directory holding config.json (default: platform config dir)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a credential (prompts, masked)
    Login {
        /// Use this token instead of prompting
        #[arg(long, conflicts_with = "stdin")]
        token: Option<String>,
        /// Read the token from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Remove the stored credential
    Logout,

    /// Show authentication state
    Whoami {
        /// Print the full token instead of a masked one
        #[arg(long)]
        show_token: bool,
    },

    /// Read and write configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved value of a key
    Get {
        key: String,
    },

    /// Store a value (prompts if omitted)
    Set {
        key: String,
        value: Option<String>,
        /// Parse the value as JSON (numbers, booleans, objects)
        #[arg(long)]
        json: bool,
    },

    /// Remove a key from the stored config
    Delete {
        key: String,
    },

    /// Show resolved config with the source of each value
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Only the stored layer (ignore environment overrides)
        #[arg(long)]
        stored: bool,
        /// With --json, include the source layer of each value
        #[arg(long, requires = "json", conflicts_with = "stored")]
        sources: bool,
        /// Print the token unmasked
        #[arg(long)]
        show_token: bool,
    },

    /// Show config and override file paths
    Path,

    /// Delete all stored configuration
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
