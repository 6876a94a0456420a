//! # Credential Store
//!
//! User model and storage. Users live in the `users` table; ids are
//! assigned by SQLite and never reused.

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// Store-assigned user identifier
pub type UserId = i64;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier, assigned on creation
    pub id: UserId,

    /// Unique username, case-sensitive as stored
    pub username: String,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the user registered
    pub created_at: DateTime<Utc>,
}

/// Credential store trait
///
/// Abstracts storage operations for user credentials.
pub trait CredentialStore {
    /// Create a new user, committed durably before returning.
    ///
    /// Uniqueness is decided by the store itself, so two concurrent
    /// registrations of the same username cannot both succeed.
    fn create_user(&self, username: &str, password_hash: &str) -> AuthResult<UserId>;

    /// Find a user by username (case-sensitive)
    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    /// Find a user by id
    fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);";

/// SQLite-backed credential store
///
/// Owns one connection; one instance belongs to one request.
pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    /// Open (or create) the database at the given path
    pub fn open(path: &Path) -> AuthResult<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent readers + crash safety
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )?;

        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> AuthResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> AuthResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AuthError::Storage("lock poisoned".to_string()))
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn create_user(&self, username: &str, password_hash: &str) -> AuthResult<UserId> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let result = tx.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![username, password_hash, Utc::now().to_rfc3339()],
        );

        match result {
            Ok(_) => {
                let id = tx.last_insert_rowid();
                tx.commit()?;
                tracing::info!(username, id, "user registered");
                Ok(id)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(AuthError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let conn = self.lock()?;
        let row = conn.query_row(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
            rusqlite::params![username],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );

        match row {
            Ok(raw) => Ok(Some(user_from_row(raw)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let conn = self.lock()?;
        let row = conn.query_row(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = ?1",
            rusqlite::params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );

        match row {
            Ok(raw) => Ok(Some(user_from_row(raw)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn user_from_row(
    (id, username, password_hash, created_at): (i64, String, String, String),
) -> AuthResult<User> {
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| AuthError::Storage(format!("bad created_at: {e}")))?
        .with_timezone(&Utc);

    Ok(User {
        id,
        username,
        password_hash,
        created_at,
    })
}

/// In-memory credential store for unit tests
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn create_user(&self, username: &str, password_hash: &str) -> AuthResult<UserId> {
        let mut users = self
            .users
            .write()
            .map_err(|_| AuthError::Storage("lock poisoned".to_string()))?;

        // Check and insert happen under one write lock, like the
        // uniqueness constraint in the SQLite store.
        if users.iter().any(|u| u.username == username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        users.push(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AuthError::Storage("lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AuthError::Storage("lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}
