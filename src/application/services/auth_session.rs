//! Login / logout / whoami over the resolved token
//!
//! The state is never stored: it is derived from the resolved `token` key on
//! every call. Recovery from an authentication failure is a single retry.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::services::ConfigManager;
use crate::application::{ApplicationError, ApplicationResult, PromptResultExt};
use crate::domain::{AuthState, DomainError, ValueSource, TOKEN_KEY};
use crate::infrastructure::traits::Prompt;

/// Label shown when asking for the credential.
pub const TOKEN_PROMPT: &str = "API token";

/// Result of a `whoami` probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoAmI {
    pub state: AuthState,
    /// Layer the token came from, when authenticated
    pub source: Option<ValueSource>,
}

/// Result of a `logout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// A stored token existed and was removed
    pub removed: bool,
    /// State after logout; stays authenticated while an environment token exists
    pub state: AuthState,
}

/// Credential state machine.
pub struct AuthSession {
    config: Arc<ConfigManager>,
    prompt: Arc<dyn Prompt>,
}

impl AuthSession {
    pub fn new(config: Arc<ConfigManager>, prompt: Arc<dyn Prompt>) -> Self {
        Self { config, prompt }
    }

    /// Current state, recomputed from the resolved token.
    pub fn state(&self) -> ApplicationResult<AuthState> {
        Ok(AuthState::from_token(self.config.read_token()?))
    }

    /// Any state → Authenticated, with a credential read from a masked prompt.
    ///
    /// Replaces an existing stored token unconditionally.
    pub fn login(&self) -> ApplicationResult<AuthState> {
        debug!("login: prompting for credential");
        let value = self
            .prompt
            .ask_secret(TOKEN_PROMPT)
            .or_aborted("read credential")?;
        self.login_with_token(&value)
    }

    /// Any state → Authenticated, with a credential supplied by the caller.
    pub fn login_with_token(&self, value: &str) -> ApplicationResult<AuthState> {
        let token = value.trim();
        if token.is_empty() {
            return Err(DomainError::EmptyCredential.into());
        }
        self.config.write_token(token)?;
        info!("stored new credential");
        self.state()
    }

    /// Any state → Unauthenticated (stored layer). Idempotent.
    pub fn logout(&self) -> ApplicationResult<LogoutOutcome> {
        let removed = self.config.delete(TOKEN_KEY)?;
        let state = self.state()?;
        if !removed {
            debug!("logout: no stored credential");
        }
        if state.is_authenticated() {
            warn!("a credential is still provided by the environment");
        }
        Ok(LogoutOutcome { removed, state })
    }

    /// Read-only probe.
    pub fn whoami(&self) -> ApplicationResult<WhoAmI> {
        let resolved = self.config.load()?;
        let state = AuthState::from_token(resolved.get_string(TOKEN_KEY));
        let source = if state.is_authenticated() {
            resolved.source(TOKEN_KEY)
        } else {
            None
        };
        Ok(WhoAmI { state, source })
    }

    /// Resolved credential, or `AuthRequired`.
    pub fn require_token(&self) -> ApplicationResult<String> {
        match self.state()? {
            AuthState::Authenticated { token } => Ok(token),
            AuthState::Unauthenticated => Err(ApplicationError::AuthRequired),
        }
    }

    /// Recovery hook for a rejected credential: clear it and log in again.
    ///
    /// An environment token keeps winning over the newly stored one; the
    /// returned state reflects that.
    pub fn handle_auth_error(&self) -> ApplicationResult<AuthState> {
        info!("credential rejected, clearing stored token");
        if self.config.shadowing_override(TOKEN_KEY)?.is_some() {
            warn!("token is set by the environment; a new login is stored but not used");
        }
        self.config.delete(TOKEN_KEY)?;
        self.login()
    }

    /// Run `op` with the resolved credential.
    ///
    /// If no credential is available, or `op` fails with `AuthRequired`,
    /// `handle_auth_error` runs once and `op` is retried once. The second
    /// outcome is returned as is.
    ///
    /// A rejected environment token is returned without prompting: a new
    /// login could not replace it.
    pub fn with_auth_retry<T, F>(&self, mut op: F) -> ApplicationResult<T>
    where
        F: FnMut(&str) -> ApplicationResult<T>,
    {
        match self.require_token() {
            Ok(token) => match op(&token) {
                Err(e) if e.is_auth_required() => {
                    debug!("with_auth_retry: operation rejected credential");
                    if self.config.shadowing_override(TOKEN_KEY)?.is_some() {
                        warn!("rejected token comes from the environment; not prompting");
                        return Err(e);
                    }
                }
                other => return other,
            },
            Err(e) if e.is_auth_required() => {
                debug!("with_auth_retry: no credential");
            }
            Err(e) => return Err(e),
        }

        let state = self.handle_auth_error()?;
        let token = state.token().ok_or(ApplicationError::AuthRequired)?;
        op(token)
    }
}
