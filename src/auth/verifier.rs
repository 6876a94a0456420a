//! # Credential Verifier
//!
//! Turns a username/password pair into a new stored identity
//! (registration) or a verified existing one (login).

use super::crypto::{hash_password, verify_password};
use super::errors::{AuthError, AuthResult, Field};
use super::store::{CredentialStore, User, UserId};

/// Credential verifier over a store
pub struct Verifier<'s, S: CredentialStore> {
    store: &'s S,
}

impl<'s, S: CredentialStore> Verifier<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Register a new account
    ///
    /// Duplicate races are decided by the store's uniqueness constraint,
    /// not by a lookup here.
    pub fn register(&self, username: &str, password: &str) -> AuthResult<UserId> {
        if username.is_empty() {
            return Err(AuthError::Validation(Field::Username));
        }
        if password.is_empty() {
            return Err(AuthError::Validation(Field::Password));
        }

        let password_hash = hash_password(password)?;
        self.store.create_user(username, &password_hash)
    }

    /// Check a username/password pair
    ///
    /// An unknown username and a wrong password produce the same error;
    /// only the debug log records which it was.
    pub fn authenticate(&self, username: &str, password: &str) -> AuthResult<User> {
        let Some(user) = self.store.find_by_username(username)? else {
            tracing::debug!(username, "login failed: incorrect username");
            // Burn a hash so the miss costs about as much as a mismatch
            let _ = hash_password(password);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(username, "login failed: incorrect password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::InMemoryCredentialStore;

    #[test]
    fn test_register_then_authenticate() {
        let store = InMemoryCredentialStore::new();
        let verifier = Verifier::new(&store);

        let id = verifier.register("alice", "pw1").unwrap();

        let user = verifier.authenticate("alice", "pw1").unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_register_requires_username() {
        let store = InMemoryCredentialStore::new();
        let verifier = Verifier::new(&store);

        let result = verifier.register("", "pw1");
        assert!(matches!(result, Err(AuthError::Validation(Field::Username))));
    }

    #[test]
    fn test_register_requires_password() {
        let store = InMemoryCredentialStore::new();
        let verifier = Verifier::new(&store);

        let result = verifier.register("alice", "");
        assert!(matches!(result, Err(AuthError::Validation(Field::Password))));
    }

    #[test]
    fn test_register_propagates_duplicate() {
        let store = InMemoryCredentialStore::new();
        let verifier = Verifier::new(&store);

        verifier.register("alice", "pw1").unwrap();
        let result = verifier.register("alice", "pw2");
        assert!(matches!(
            result,
            Err(AuthError::DuplicateUsername(name)) if name == "alice"
        ));
    }

    #[test]
    fn test_wrong_password_and_unknown_user_look_alike() {
        let store = InMemoryCredentialStore::new();
        let verifier = Verifier::new(&store);

        verifier.register("alice", "pw1").unwrap();

        let wrong_password = verifier.authenticate("alice", "wrong").unwrap_err();
        let unknown_user = verifier.authenticate("ghost", "pw1").unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn test_stored_hash_is_not_plaintext() {
        let store = InMemoryCredentialStore::new();
        let verifier = Verifier::new(&store);

        verifier.register("alice", "pw1").unwrap();
        let user = store.find_by_username("alice").unwrap().unwrap();
        assert_ne!(user.password_hash, "pw1");
    }
}
