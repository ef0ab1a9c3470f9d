//! Authentication state machine.
//!
//! The session is a tagged union with pure transition functions. A user and
//! a token exist only inside [`AuthState::Authenticated`], so the invariant
//! "authenticated iff user and token are both present" holds by
//! construction rather than by discipline.

use pepperleaf_core::User;
use secrecy::SecretString;

/// The authenticated-identity slot of the running client.
#[derive(Debug, Clone, Default)]
pub enum AuthState {
    /// No identity held.
    #[default]
    Anonymous,
    /// A login or signup request is in flight.
    Authenticating,
    /// An identity and its bearer credential are held.
    Authenticated { user: User, token: SecretString },
    /// The last login or signup attempt failed.
    AuthFailed { message: String },
}

impl AuthState {
    /// Start a login or signup attempt.
    ///
    /// Valid from every state; a previous failure message is discarded.
    #[must_use]
    pub fn begin_auth(self) -> Self {
        Self::Authenticating
    }

    /// Complete an authentication attempt with the identity the server
    /// returned.
    #[must_use]
    pub fn complete_auth(self, user: User, token: SecretString) -> Self {
        Self::Authenticated { user, token }
    }

    /// Record a failed authentication attempt.
    #[must_use]
    pub fn fail_auth(self, message: String) -> Self {
        Self::AuthFailed { message }
    }

    /// Drop the held identity unconditionally.
    #[must_use]
    pub fn sign_out(self) -> Self {
        Self::Anonymous
    }

    /// Discard a stored failure without side effects.
    ///
    /// Only `AuthFailed` transitions (to `Anonymous`); every other state is
    /// unchanged.
    #[must_use]
    pub fn clear_error(self) -> Self {
        match self {
            Self::AuthFailed { .. } => Self::Anonymous,
            other => other,
        }
    }

    /// Whether an identity is currently held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Whether an authentication attempt is in flight.
    #[must_use]
    pub const fn is_authenticating(&self) -> bool {
        matches!(self, Self::Authenticating)
    }

    /// The held user, if authenticated.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// The held bearer token, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        match self {
            Self::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// The stored failure message, if the last attempt failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::AuthFailed { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_login_success_path() {
        let state = AuthState::Anonymous.begin_auth();
        assert!(state.is_authenticating());

        let state = state.complete_auth(user(), SecretString::from("tok-1"));
        assert!(state.is_authenticated());
        assert_eq!(state.user().map(|u| u.id.as_str()), Some("u-1"));
        assert!(state.token().is_some());
    }

    #[test]
    fn test_login_failure_path() {
        let state = AuthState::Anonymous
            .begin_auth()
            .fail_auth("Invalid credentials".to_string());
        assert!(!state.is_authenticated());
        assert_eq!(state.error_message(), Some("Invalid credentials"));
        assert!(state.user().is_none());
    }

    #[test]
    fn test_new_attempt_discards_previous_error() {
        let state = AuthState::AuthFailed {
            message: "Invalid credentials".to_string(),
        }
        .begin_auth();
        assert!(state.is_authenticating());
        assert!(state.error_message().is_none());
    }

    #[test]
    fn test_sign_out_from_every_state() {
        assert!(matches!(
            AuthState::Anonymous.sign_out(),
            AuthState::Anonymous
        ));
        assert!(matches!(
            AuthState::Authenticating.sign_out(),
            AuthState::Anonymous
        ));
        let authed = AuthState::Anonymous
            .begin_auth()
            .complete_auth(user(), SecretString::from("tok-1"));
        assert!(matches!(authed.sign_out(), AuthState::Anonymous));
    }

    #[test]
    fn test_clear_error_only_leaves_failed_state() {
        let cleared = AuthState::AuthFailed {
            message: "nope".to_string(),
        }
        .clear_error();
        assert!(matches!(cleared, AuthState::Anonymous));

        let authed = AuthState::Anonymous
            .begin_auth()
            .complete_auth(user(), SecretString::from("tok-1"));
        assert!(authed.clear_error().is_authenticated());
    }
}
