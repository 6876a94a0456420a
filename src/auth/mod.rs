//! # Scriblr Auth Module
//!
//! This module provides user registration, credential verification,
//! signed client-side sessions, and per-request identity resolution.

pub mod context;
pub mod crypto;
pub mod errors;
pub mod guard;
pub mod session;
pub mod store;
pub mod verifier;

pub use context::{Identity, RequestContext};
pub use errors::{AuthError, AuthResult, Field};
pub use guard::{login_required, Outcome, Redirect};
pub use session::{Session, SessionCodec};
pub use store::{CredentialStore, InMemoryCredentialStore, SqliteCredentialStore, User, UserId};
pub use verifier::Verifier;
