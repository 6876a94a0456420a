//! # Auth Errors
//!
//! Error types for the authentication module. Every variant is a
//! per-request outcome; none is fatal to the process.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Form field named by a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Username => write!(f, "username"),
            Field::Password => write!(f, "password"),
        }
    }
}

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// A required form field was empty or absent
    #[error("{0} is required")]
    Validation(Field),

    /// The username is already taken
    #[error("user {0} is already registered")]
    DuplicateUsername(String),

    /// Unknown username or wrong password (generic - don't leak which)
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// Password hashing failed
    #[error("internal error: password hashing failed")]
    HashingFailed,

    /// Session token signing failed
    #[error("internal error: session token encoding failed")]
    TokenEncodingFailed,

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Whether the error is surfaced on the form rather than treated as a
    /// server fault
    pub fn is_form_error(&self) -> bool {
        matches!(
            self,
            AuthError::Validation(_)
                | AuthError::DuplicateUsername(_)
                | AuthError::InvalidCredentials
        )
    }
}

impl From<rusqlite::Error> for AuthError {
    fn from(e: rusqlite::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}
