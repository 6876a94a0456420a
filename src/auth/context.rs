//! # Request Context
//!
//! Explicit per-request state: the lazily opened store connection and
//! the identity resolved from the session. Never process-global; each
//! request builds one and drops it on every exit path.

use std::sync::Arc;

use crate::config::AppConfig;

use super::errors::AuthResult;
use super::session::Session;
use super::store::{CredentialStore, SqliteCredentialStore, User};

/// Who the current request belongs to
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    Authenticated(User),
}

impl Identity {
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(user),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user().is_none()
    }
}

/// Context for one request
///
/// The store connection opens on first use and closes when the context
/// drops with the request scope.
pub struct RequestContext {
    config: Arc<AppConfig>,
    store: Option<SqliteCredentialStore>,
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            store: None,
            identity: None,
        }
    }

    /// The request's store connection, opened lazily
    pub fn store(&mut self) -> AuthResult<&SqliteCredentialStore> {
        let store = match self.store.take() {
            Some(store) => store,
            None => SqliteCredentialStore::open(&self.config.database)?,
        };
        Ok(self.store.insert(store))
    }

    /// Resolve the session to an identity
    ///
    /// Computed once per request; later calls return the cached result
    /// without touching the store. A `user_id` that no longer maps to a
    /// user downgrades to `Anonymous` rather than erroring.
    pub fn resolve(&mut self, session: &Session) -> AuthResult<Identity> {
        if let Some(identity) = &self.identity {
            return Ok(identity.clone());
        }

        let identity = match session.user_id() {
            None => Identity::Anonymous,
            Some(id) => match self.store()?.find_by_id(id)? {
                Some(user) => Identity::Authenticated(user),
                None => {
                    tracing::debug!(user_id = id, "session referenced a missing user");
                    Identity::Anonymous
                }
            },
        };

        self.identity = Some(identity.clone());
        Ok(identity)
    }
}
