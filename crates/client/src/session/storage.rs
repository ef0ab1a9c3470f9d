//! Durable storage for session credentials.
//!
//! Two entries under the data directory: `token` (the opaque bearer
//! credential) and `user.json` (the serialized profile). They are written
//! together and cleared together, never independently - a half-present pair
//! is treated as absent.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pepperleaf_core::User;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// Errors reading or writing persisted credentials.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("credential storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted user profile did not parse.
    #[error("persisted profile is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// File-backed store for the persisted `(token, user)` pair.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on the first save.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Persist the credential pair, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or either entry
    /// cannot be written.
    pub fn save(&self, user: &User, token: &SecretString) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.token_path(), token.expose_secret())?;
        std::fs::write(self.user_path(), serde_json::to_vec_pretty(user)?)?;
        Ok(())
    }

    /// Load the persisted credential pair.
    ///
    /// Returns `Ok(None)` when either entry is missing or the token is
    /// blank. A present-but-unparseable profile is an error so the caller
    /// can discard the pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` for an unparseable profile and
    /// `StorageError::Io` for any other read failure.
    pub fn load(&self) -> Result<Option<(User, SecretString)>, StorageError> {
        let token = match read_if_present(&self.token_path())? {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => return Ok(None),
        };
        let Some(profile) = read_if_present(&self.user_path())? else {
            return Ok(None);
        };

        let user: User = serde_json::from_str(&profile)?;
        Ok(Some((user, SecretString::from(token))))
    }

    /// Remove both entries. Missing entries are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a present entry cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        remove_if_present(&self.token_path())?;
        remove_if_present(&self.user_path())?;
        Ok(())
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }
}

fn read_if_present(path: &Path) -> Result<Option<String>, std::io::Error> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn remove_if_present(path: &Path) -> Result<(), std::io::Error> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
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
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().to_path_buf());

        store.save(&user(), &SecretString::from("tok-1")).unwrap();

        let (loaded_user, loaded_token) = store.load().unwrap().unwrap();
        assert_eq!(loaded_user, user());
        assert_eq!(loaded_token.expose_secret(), "tok-1");
    }

    #[test]
    fn test_missing_entries_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("never-created"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_half_present_pair_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join(TOKEN_FILE), "tok-1").unwrap();

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join(TOKEN_FILE), "tok-1").unwrap();
        std::fs::write(dir.path().join(USER_FILE), "{not json").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_clear_removes_both_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().to_path_buf());
        store.save(&user(), &SecretString::from("tok-1")).unwrap();

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // A second clear with nothing present is fine
        store.clear().unwrap();
    }
}
