//! Command implementations
//!
//! One `run_*` entry point per command. Each translates CLI arguments into
//! calls on the services in the `ServiceContainer` and renders the result.

use std::collections::BTreeMap;
use std::io::{self, Read};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::PromptResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::domain::{
    mask_token, value_to_string, AuthState, ConfigDocument, ResolvedValue, TOKEN_KEY,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Dispatch a parsed command line.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Login { token, stdin }) => run_login(container, token.as_deref(), *stdin),
        Some(Commands::Logout) => run_logout(container),
        Some(Commands::Whoami { show_token }) => run_whoami(container, *show_token),
        Some(Commands::Config { command }) => execute_config(command, container),
        Some(Commands::Completion { shell }) => {
            run_completion(*shell);
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn execute_config(command: &ConfigCommands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        ConfigCommands::Get { key } => run_config_get(container, key),
        ConfigCommands::Set { key, value, json } => {
            run_config_set(container, key, value.as_deref(), *json)
        }
        ConfigCommands::Delete { key } => run_config_delete(container, key),
        ConfigCommands::List {
            json,
            stored,
            sources,
            show_token,
        } => run_config_list(container, *json, *stored, *sources, *show_token),
        ConfigCommands::Path => run_config_path(container),
        ConfigCommands::Reset { yes } => run_config_reset(container, *yes),
    }
}

#[instrument(skip(container, token))]
pub fn run_login(container: &ServiceContainer, token: Option<&str>, stdin: bool) -> CliResult<()> {
    let entered = if stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| InfraError::io("read token from stdin", e))?;
        Some(buf)
    } else {
        token.map(str::to_string)
    };

    let state = match &entered {
        Some(value) => container.auth.login_with_token(value)?,
        None => container.auth.login()?,
    };
    if !state.is_authenticated() {
        return Err(CliError::CredentialShadowed(
            "the resolved token is still empty".to_string(),
        ));
    }

    output::success(&format!(
        "Logged in, credential stored in {}",
        container.config.config_path().display()
    ));
    if container.config.shadowing_override(TOKEN_KEY)?.is_some() {
        output::warning("a token from the environment takes precedence over the stored one");
    }
    Ok(())
}

#[instrument(skip(container))]
pub fn run_logout(container: &ServiceContainer) -> CliResult<()> {
    let outcome = container.auth.logout()?;
    if outcome.removed {
        output::success("Logged out");
    } else {
        output::info("Not logged in");
    }
    if outcome.state.is_authenticated() {
        output::warning("a token is still provided by the environment (API_TOKEN, CLIBASE_TOKEN or .env files)");
    }
    Ok(())
}

#[instrument(skip(container))]
pub fn run_whoami(container: &ServiceContainer, show_token: bool) -> CliResult<()> {
    let who = container.auth.whoami()?;
    match &who.state {
        AuthState::Authenticated { token } => {
            let shown = if show_token {
                token.clone()
            } else {
                mask_token(token)
            };
            output::success("Authenticated");
            output::detail(&format!("token:  {shown}"));
            if let Some(source) = who.source {
                output::detail(&format!("source: {source}"));
            }
        }
        AuthState::Unauthenticated => output::info("Not logged in"),
    }
    Ok(())
}

#[instrument(skip(container))]
pub fn run_config_get(container: &ServiceContainer, key: &str) -> CliResult<()> {
    match container.config.get(key)? {
        Some(value) => {
            output::info(&value_to_string(&value));
            Ok(())
        }
        None => Err(CliError::NotFound(key.to_string())),
    }
}

#[instrument(skip(container, value))]
pub fn run_config_set(
    container: &ServiceContainer,
    key: &str,
    value: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let raw = match value {
        Some(v) => v.to_string(),
        None => container
            .prompt
            .ask_text(&format!("Value for {key}"))
            .or_aborted("read value")?,
    };
    let value = parse_value(&raw, json)?;

    container.config.set(key, value)?;
    output::action("Set", &key);

    if let Some(env_value) = container.config.shadowing_override(key)? {
        let shown = if key == TOKEN_KEY {
            mask_token(&env_value)
        } else {
            env_value
        };
        output::warning(&format!(
            "{key} is overridden by the environment ({shown}); the stored value applies once the override is removed"
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
pub fn run_config_delete(container: &ServiceContainer, key: &str) -> CliResult<()> {
    if container.config.delete(key)? {
        output::action("Deleted", &key);
    } else {
        output::info(&format!("{key} is not stored"));
    }
    if container.config.shadowing_override(key)?.is_some() {
        output::warning(&format!("{key} is still set by the environment"));
    }
    Ok(())
}

#[instrument(skip(container))]
pub fn run_config_list(
    container: &ServiceContainer,
    json: bool,
    stored: bool,
    sources: bool,
    show_token: bool,
) -> CliResult<()> {
    let display = |key: &str, value: &Value| -> Value {
        match value {
            Value::String(s) if key == TOKEN_KEY && !show_token => Value::String(mask_token(s)),
            other => other.clone(),
        }
    };

    if stored {
        let doc = container.config.stored_document()?;
        let shown: ConfigDocument = doc.iter().map(|(k, v)| (k.clone(), display(k, v))).collect();
        if json {
            print_json(&shown)?;
        } else {
            for (key, value) in &shown {
                output::entry(key, &value_to_string(value), None);
            }
        }
        return Ok(());
    }

    let resolved = container.config.load()?;
    debug!("run_config_list: {} keys", resolved.len());
    if json && sources {
        let shown: BTreeMap<&String, ResolvedValue> = resolved
            .iter()
            .map(|(k, e)| {
                let entry = ResolvedValue {
                    value: display(k, &e.value),
                    source: e.source,
                };
                (k, entry)
            })
            .collect();
        print_json(&shown)?;
    } else if json {
        let shown: ConfigDocument = resolved
            .iter()
            .map(|(k, e)| (k.clone(), display(k, &e.value)))
            .collect();
        print_json(&shown)?;
    } else if resolved.is_empty() {
        output::info("(no configuration)");
    } else {
        for (key, entry) in resolved.iter() {
            output::entry(key, &value_to_string(&display(key, &entry.value)), Some(entry.source));
        }
    }
    Ok(())
}

pub fn run_config_path(container: &ServiceContainer) -> CliResult<()> {
    output::header("Config");
    output::detail(&container.config.config_path().display());
    output::header("Override files (lowest to highest)");
    for name in crate::application::services::DOTENV_FILES {
        let path = container.config.work_dir().join(name);
        let marker = if container.fs.is_file(&path) { "" } else { "  (missing)" };
        output::detail(&format!("{}{}", path.display(), marker));
    }
    Ok(())
}

#[instrument(skip(container))]
pub fn run_config_reset(container: &ServiceContainer, yes: bool) -> CliResult<()> {
    let path = container.config.config_path().display().to_string();
    if !yes {
        let confirmed = container
            .prompt
            .ask_confirm(&format!("Delete all stored configuration in {path}?"))
            .or_aborted("read confirmation")?;
        if !confirmed {
            output::info("Aborted");
            return Ok(());
        }
    }
    container.config.reset()?;
    output::action("Reset", &path);
    Ok(())
}

pub fn run_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Interpret a CLI value; with `json`, parse it as a JSON value.
fn parse_value(raw: &str, json: bool) -> CliResult<Value> {
    if !json {
        return Ok(Value::String(raw.to_string()));
    }
    serde_json::from_str(raw).map_err(|e| CliError::InvalidArgs(format!("not valid JSON: {e}")))
}

fn print_json<T: Serialize>(doc: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(doc)
        .map_err(|e| CliError::Usage(format!("serialize output: {e}")))?;
    output::info(&text);
    Ok(())
}
