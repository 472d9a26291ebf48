//! Integration tests for ConfigManager: stored layer + environment overrides.

mod common;

use std::sync::Arc;

use rstest::rstest;
use serde_json::{json, Value};

use clibase::application::ApplicationError;
use clibase::domain::{DomainError, ValueSource};
use clibase::infrastructure::traits::MapEnv;

use common::{Sandbox, ScriptedPrompt};

#[test]
fn given_empty_config_dir_when_loading_then_empty_and_nothing_written() {
    // Arrange
    let sandbox = Sandbox::new();
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));

    // Act
    let resolved = container.config.load().unwrap();

    // Assert
    assert!(resolved.is_empty());
    assert!(!sandbox.config_path().exists());
}

#[rstest]
#[case::string(json!("https://api.test"))]
#[case::number(json!(42))]
#[case::boolean(json!(false))]
#[case::object(json!({"nested": [1, 2]}))]
fn given_set_value_when_loading_then_value_is_returned(#[case] value: Value) {
    // Arrange
    let sandbox = Sandbox::new();
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));

    // Act
    container.config.set("setting", value.clone()).unwrap();

    // Assert
    let resolved = container.config.load().unwrap();
    assert_eq!(resolved.get("setting"), Some(&value));
    assert_eq!(resolved.source("setting"), Some(ValueSource::Stored));
}

#[test]
fn given_stored_key_when_deleted_then_get_returns_none() {
    // Arrange
    let sandbox = Sandbox::new();
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));
    container.config.set("api_url", json!("https://x")).unwrap();

    // Act
    let removed = container.config.delete("api_url").unwrap();

    // Assert
    assert!(removed);
    assert_eq!(container.config.get("api_url").unwrap(), None);
}

#[test]
fn given_missing_key_when_deleted_then_false_and_no_file_created() {
    // Arrange
    let sandbox = Sandbox::new();
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));

    // Act
    let removed = container.config.delete("never_set").unwrap();

    // Assert
    assert!(!removed);
    assert!(!sandbox.config_path().exists());
}

#[test]
fn given_override_and_stored_value_when_loading_then_override_wins() {
    // Arrange
    let sandbox = Sandbox::new();
    sandbox.write_config(r#"{"api_url": "https://stored", "region": "eu"}"#);
    let env = MapEnv::new().with("CLIBASE_API_URL", "https://env");
    let container = sandbox.container(env, Arc::new(ScriptedPrompt::new()));

    // Act
    let resolved = container.config.load().unwrap();

    // Assert
    assert_eq!(resolved.get_string("api_url").as_deref(), Some("https://env"));
    assert_eq!(resolved.source("api_url"), Some(ValueSource::Environment));
    assert_eq!(resolved.get_string("region").as_deref(), Some("eu"));
    assert_eq!(resolved.source("region"), Some(ValueSource::Stored));
}

#[test]
fn given_env_token_and_file_token_when_reading_token_then_env_token() {
    // Arrange
    let sandbox = Sandbox::new();
    sandbox.write_config(r#"{"token": "filetoken"}"#);
    let env = MapEnv::new().with("API_TOKEN", "envtoken");
    let container = sandbox.container(env, Arc::new(ScriptedPrompt::new()));

    // Act
    let token = container.config.read_token().unwrap();

    // Assert
    assert_eq!(token.as_deref(), Some("envtoken"));
}

#[test]
fn given_dotenv_local_override_when_loading_then_beats_stored_and_process() {
    // Arrange
    let sandbox = Sandbox::new();
    sandbox.write_config(r#"{"region": "stored"}"#);
    sandbox.write_work_file(".env", "CLIBASE_REGION=dotenv\n");
    sandbox.write_work_file(".env.local", "CLIBASE_REGION=local\n");
    let env = MapEnv::new().with("CLIBASE_REGION", "process");
    let container = sandbox.container(env, Arc::new(ScriptedPrompt::new()));

    // Act
    let value = container.config.get("region").unwrap();

    // Assert
    assert_eq!(value, Some(json!("local")));
}

#[test]
fn given_shadowed_key_when_setting_then_persisted_but_override_still_wins() {
    // Arrange
    let sandbox = Sandbox::new();
    let env = MapEnv::new().with("CLIBASE_REGION", "env");
    let container = sandbox.container(env, Arc::new(ScriptedPrompt::new()));

    // Act
    container.config.set("region", json!("stored")).unwrap();

    // Assert
    assert_eq!(sandbox.stored_json(), json!({"region": "stored"}));
    assert_eq!(container.config.get("region").unwrap(), Some(json!("env")));
    assert_eq!(
        container.config.shadowing_override("region").unwrap().as_deref(),
        Some("env")
    );
}

#[test]
fn given_existing_keys_when_setting_another_then_others_preserved() {
    // Arrange
    let sandbox = Sandbox::new();
    sandbox.write_config(r#"{"a": 1, "b": "two"}"#);
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));

    // Act
    container.config.set("c", json!(true)).unwrap();

    // Assert
    assert_eq!(sandbox.stored_json(), json!({"a": 1, "b": "two", "c": true}));
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
fn given_blank_key_when_setting_then_invalid_key(#[case] key: &str) {
    // Arrange
    let sandbox = Sandbox::new();
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));

    // Act
    let result = container.config.set(key, json!("x"));

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidKey(_)))
    ));
    assert!(!sandbox.config_path().exists());
}

#[test]
fn given_corrupt_file_when_setting_then_error_and_file_untouched() {
    // Arrange
    let sandbox = Sandbox::new();
    sandbox.write_config("{broken");
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));

    // Act
    let result = container.config.set("a", json!(1));

    // Assert
    assert!(matches!(result, Err(ApplicationError::CorruptConfig { .. })));
    assert_eq!(sandbox.read_config().as_deref(), Some("{broken"));
}

#[test]
fn given_stored_values_when_resetting_then_document_empty() {
    // Arrange
    let sandbox = Sandbox::new();
    sandbox.write_config(r#"{"token": "t", "a": 1}"#);
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));

    // Act
    container.config.reset().unwrap();

    // Assert
    assert_eq!(sandbox.stored_json(), json!({}));
    assert!(container.config.stored_document().unwrap().is_empty());
}

#[test]
fn given_stored_null_token_when_reading_token_then_absent() {
    // Arrange
    let sandbox = Sandbox::new();
    sandbox.write_config(r#"{"token": null}"#);
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));

    // Act
    let token = container.config.read_token().unwrap();

    // Assert
    assert_eq!(token, None);
}

#[test]
fn given_env_changes_between_calls_when_loading_then_no_stale_cache() {
    // Arrange
    let sandbox = Sandbox::new();
    let container = sandbox.container(MapEnv::new(), Arc::new(ScriptedPrompt::new()));
    assert_eq!(container.config.get("region").unwrap(), None);

    // Act
    sandbox.write_work_file(".env", "CLIBASE_REGION=late\n");

    // Assert
    assert_eq!(container.config.get("region").unwrap(), Some(json!("late")));
}
