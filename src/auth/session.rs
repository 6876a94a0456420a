//! # Session Management
//!
//! Session state and the signed client-side token that carries it
//! between requests. Sessions have no server-side row; each request
//! rebuilds the session from the token it presents.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::store::{User, UserId};

/// Per-request session state
///
/// Holds at most the id of the logged-in user. Empty on first contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<UserId>,
}

impl Session {
    /// An empty session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
    }

    /// Log a user in
    ///
    /// The whole session value is replaced in one assignment, so nothing
    /// from the previous session survives alongside the new id.
    pub fn login(&mut self, user: &User) {
        *self = Session {
            user_id: Some(user.id),
        };
    }

    /// Clear every session field
    pub fn logout(&mut self) {
        *self = Session::default();
    }
}

/// Signed token claims
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Logged-in user id
    uid: UserId,

    /// Issued at (Unix epoch seconds)
    iat: i64,

    /// Expiration (Unix epoch seconds)
    exp: i64,
}

/// Signs sessions into client-held tokens and verifies them back
///
/// Tokens are HS256 JWTs keyed by the application secret; clients cannot
/// read past the signature check with a forged or altered token.
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Sign the session for the client
    ///
    /// An empty session produces no token; there is nothing for the
    /// client to carry.
    pub fn encode(&self, session: &Session) -> AuthResult<Option<String>> {
        let Some(uid) = session.user_id() else {
            return Ok(None);
        };

        let now = Utc::now();
        let claims = SessionClaims {
            uid,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map(Some)
            .map_err(|_| AuthError::TokenEncodingFailed)
    }

    /// Rebuild the session from the client token
    ///
    /// Total: a missing, malformed, tampered, or expired token yields the
    /// empty session rather than an error.
    pub fn decode(&self, token: Option<&str>) -> Session {
        let Some(token) = token else {
            return Session::default();
        };

        let validation = Validation::new(Algorithm::HS256);
        match decode::<SessionClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Session {
                user_id: Some(data.claims.uid),
            },
            Err(e) => {
                tracing::debug!(error = %e, "rejected session token");
                Session::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(id: UserId) -> User {
        User {
            id,
            username: format!("user_{id}"),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn test_codec() -> SessionCodec {
        SessionCodec::new("test_secret", Duration::hours(1))
    }

    #[test]
    fn test_login_replaces_previous_state() {
        let mut session = Session::new();
        session.login(&test_user(1));
        assert_eq!(session.user_id(), Some(1));

        // Logging in as someone else leaves no trace of the old id
        session.login(&test_user(2));
        assert_eq!(session.user_id(), Some(2));
    }

    #[test]
    fn test_logout_clears_session() {
        let mut session = Session::new();
        session.login(&test_user(1));
        session.logout();

        assert!(session.is_empty());
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let codec = test_codec();
        let mut session = Session::new();
        session.login(&test_user(42));

        let token = codec.encode(&session).unwrap().unwrap();
        assert_eq!(codec.decode(Some(token.as_str())), session);
    }

    #[test]
    fn test_empty_session_has_no_token() {
        let codec = test_codec();
        assert!(codec.encode(&Session::new()).unwrap().is_none());
    }

    #[test]
    fn test_missing_token_is_empty_session() {
        let codec = test_codec();
        assert!(codec.decode(None).is_empty());
    }

    #[test]
    fn test_tampered_token_is_empty_session() {
        let codec = test_codec();
        let mut session = Session::new();
        session.login(&test_user(42));

        let token = codec.encode(&session).unwrap().unwrap();
        let tampered = format!("{token}AAAA");
        assert!(codec.decode(Some(tampered.as_str())).is_empty());
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let codec = test_codec();
        let other = SessionCodec::new("other_secret", Duration::hours(1));

        let mut session = Session::new();
        session.login(&test_user(42));
        let token = other.encode(&session).unwrap().unwrap();

        assert!(codec.decode(Some(token.as_str())).is_empty());
    }

    #[test]
    fn test_expired_token_is_empty_session() {
        // Negative ttl puts exp well past the validation leeway
        let codec = SessionCodec::new("test_secret", Duration::hours(-2));

        let mut session = Session::new();
        session.login(&test_user(42));
        let token = codec.encode(&session).unwrap().unwrap();

        assert!(codec.decode(Some(token.as_str())).is_empty());
    }

    #[test]
    fn test_garbage_token_is_empty_session() {
        let codec = test_codec();
        assert!(codec.decode(Some("not.a.token")).is_empty());
    }
}
