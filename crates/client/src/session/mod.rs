//! Session store: the single authenticated-identity slot.
//!
//! Owns the [`AuthState`] machine, persists credentials across restarts,
//! and keeps the API client's bearer slot in sync with every transition.
//! Other components query it; none of them mutate it.
//!
//! Auth flips are broadcast on a watch channel so the application assembly
//! can drive dependent lifecycles (the cart loads only while
//! authenticated).

mod state;
mod storage;

pub use state::AuthState;
pub use storage::{CredentialStore, StorageError};

use std::sync::{Arc, RwLock};

use pepperleaf_core::User;
use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::watch;
use tracing::instrument;

use crate::api::ApiClient;
use crate::api::types::SignupRequest;
use crate::notify::SharedNotifier;

/// Errors surfaced by session operations.
///
/// Failed login/signup attempts also land in [`AuthState::AuthFailed`]; the
/// error here carries the same user-facing message for callers that prefer
/// `?` over inspecting state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{message}")]
    AuthFailed { message: String },
}

/// The authenticated-identity slot of the running client.
///
/// Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    credentials: CredentialStore,
    notifier: SharedNotifier,
    state: RwLock<AuthState>,
    authed_tx: watch::Sender<bool>,
}

impl SessionStore {
    /// Create a session store starting in the `Anonymous` state.
    #[must_use]
    pub fn new(api: ApiClient, credentials: CredentialStore, notifier: SharedNotifier) -> Self {
        let (authed_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(SessionInner {
                api,
                credentials,
                notifier,
                state: RwLock::new(AuthState::Anonymous),
                authed_tx,
            }),
        }
    }

    /// Restore a previously persisted session, without contacting the
    /// server.
    ///
    /// Returns whether a session was restored. Corrupt persisted data is
    /// discarded silently (diagnostic channel only) and the session stays
    /// `Anonymous` - a failed restore is never a user-facing error.
    #[instrument(skip(self))]
    pub fn restore(&self) -> bool {
        match self.inner.credentials.load() {
            Ok(Some((user, token))) => {
                self.inner.api.set_bearer(Some(token.clone()));
                self.transition(|state| state.complete_auth(user, token));
                tracing::debug!("session restored from persisted credentials");
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt persisted session");
                if let Err(e) = self.inner.credentials.clear() {
                    tracing::warn!(error = %e, "failed to clear corrupt credentials");
                }
                false
            }
        }
    }

    /// Authenticate with email and password.
    ///
    /// On success the credential pair is persisted and the state becomes
    /// `Authenticated`; on failure it becomes `AuthFailed` with a
    /// user-facing message and nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AuthFailed` with the surfaced message.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        self.transition(AuthState::begin_auth);

        match self.inner.api.login(email, password).await {
            Ok(payload) => {
                self.complete(payload.user, payload.token);
                self.inner.notifier.success("Login successful!");
                Ok(())
            }
            Err(e) => Err(self.fail(&e, "Login failed")),
        }
    }

    /// Create a new account and authenticate as it.
    ///
    /// Same shape as [`login`](Self::login), but the identity is created
    /// server-side first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AuthFailed` with the surfaced message.
    #[instrument(skip(self, profile), fields(email = %profile.email))]
    pub async fn signup(&self, profile: SignupRequest) -> Result<(), SessionError> {
        self.transition(AuthState::begin_auth);

        match self.inner.api.signup(&profile).await {
            Ok(payload) => {
                self.complete(payload.user, payload.token);
                self.inner.notifier.success("Account created successfully!");
                Ok(())
            }
            Err(e) => Err(self.fail(&e, "Signup failed")),
        }
    }

    /// Drop the held identity unconditionally.
    ///
    /// Clears persisted credentials and the API bearer slot. Never contacts
    /// the server - there is no server-side session to invalidate.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        if let Err(e) = self.inner.credentials.clear() {
            tracing::warn!(error = %e, "failed to clear persisted credentials");
        }
        self.inner.api.set_bearer(None);
        self.transition(AuthState::sign_out);
        self.inner.notifier.success("Logged out successfully!");
    }

    /// Discard a stored authentication error without side effects.
    pub fn clear_error(&self) {
        self.transition(AuthState::clear_error);
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner
            .state
            .read()
            .map_or(AuthState::Anonymous, |state| state.clone())
    }

    /// Whether an identity is currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Whether a login or signup is in flight (the busy flag).
    #[must_use]
    pub fn is_authenticating(&self) -> bool {
        self.state().is_authenticating()
    }

    /// The authenticated user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    /// The stored failure message, if the last attempt failed.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.state().error_message().map(str::to_string)
    }

    /// Subscribe to authenticated-state flips.
    ///
    /// The channel carries `is_authenticated` and only changes on actual
    /// flips, not on every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.authed_tx.subscribe()
    }

    fn complete(&self, user: User, token: String) {
        let token = SecretString::from(token);
        if let Err(e) = self.inner.credentials.save(&user, &token) {
            // The in-memory session is still valid; only restore-on-restart
            // is affected.
            tracing::warn!(error = %e, "failed to persist session credentials");
        }
        self.inner.api.set_bearer(Some(token.clone()));
        self.transition(|state| state.complete_auth(user, token));
    }

    fn fail(&self, error: &crate::api::ApiError, fallback: &str) -> SessionError {
        let message = error
            .user_message()
            .unwrap_or(fallback)
            .to_string();
        tracing::debug!(error = %error, "authentication attempt failed");
        self.inner.api.set_bearer(None);
        self.transition({
            let message = message.clone();
            move |state| state.fail_auth(message)
        });
        self.inner.notifier.error(&message);
        SessionError::AuthFailed { message }
    }

    /// Apply a pure transition to the state and publish the resulting
    /// authenticated flag.
    fn transition(&self, f: impl FnOnce(AuthState) -> AuthState) {
        let authed = {
            let Ok(mut state) = self.inner.state.write() else {
                return;
            };
            let next = f(std::mem::take(&mut *state));
            *state = next;
            state.is_authenticated()
        };
        self.inner.authed_tx.send_if_modified(|current| {
            let changed = *current != authed;
            *current = authed;
            changed
        });
    }
}
