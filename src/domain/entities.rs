//! Domain entities: core data structures

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Reserved configuration key holding the credential.
pub const TOKEN_KEY: &str = "token";

/// Persisted configuration: one flat level of string keys.
///
/// Nested values are carried opaquely; they are never merged key by key.
pub type ConfigDocument = BTreeMap<String, Value>;

/// Environment-sourced overrides, already projected onto config keys.
///
/// Transient: rebuilt on every resolution and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    values: BTreeMap<String, String>,
}

impl EnvOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }
}

/// Layer a resolved value was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueSource {
    /// Process environment or a dotenv override file
    #[serde(rename = "env")]
    Environment,
    /// The persisted config document
    #[serde(rename = "stored")]
    Stored,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Environment => write!(f, "env"),
            ValueSource::Stored => write!(f, "stored"),
        }
    }
}

/// A single entry of the resolved view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedValue {
    pub value: Value,
    pub source: ValueSource,
}

/// Immutable merge of stored document and environment overrides.
///
/// For every key the override wins if present, else the stored value.
/// Never mutated after construction; persist changes through the store and
/// resolve again.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    entries: BTreeMap<String, ResolvedValue>,
}

impl ResolvedConfig {
    /// Merge the two layers, overrides taking precedence.
    pub fn merge(document: ConfigDocument, overrides: &EnvOverrides) -> Self {
        let mut entries: BTreeMap<String, ResolvedValue> = document
            .into_iter()
            .map(|(key, value)| {
                (
                    key,
                    ResolvedValue {
                        value,
                        source: ValueSource::Stored,
                    },
                )
            })
            .collect();

        for (key, value) in overrides.iter() {
            entries.insert(
                key.clone(),
                ResolvedValue {
                    value: Value::String(value.clone()),
                    source: ValueSource::Environment,
                },
            );
        }

        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Value rendered as a plain string (strings unquoted, other JSON as text).
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(value_to_string)
    }

    pub fn source(&self, key: &str) -> Option<ValueSource> {
        self.entries.get(key).map(|e| e.source)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResolvedValue)> {
        self.entries.iter()
    }
}

/// Render a JSON value for display: strings without quotes.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Authentication state, derived from the resolved token.
///
/// There is no persisted flag; the state is recomputed on every probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { token: String },
}

impl AuthState {
    /// Authenticated iff the token is present and non-empty.
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => AuthState::Authenticated { token },
            _ => AuthState::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated { token } => Some(token),
            AuthState::Unauthenticated => None,
        }
    }
}

/// Mask a credential for display, keeping at most four trailing characters.
///
/// Short tokens are fully masked.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
