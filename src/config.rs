//! Application Configuration
//!
//! Settings for the database location and session signing.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file (default: "instance/scriblr.sqlite")
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Secret for signing session tokens. The default is a development
    /// value; deployments override it (see [`crate::auth::crypto::generate_secret_key`]).
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Session token lifetime in seconds (default: 31 days)
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,
}

fn default_database() -> PathBuf {
    PathBuf::from("instance/scriblr.sqlite")
}

fn default_secret_key() -> String {
    "dev".to_string()
}

fn default_session_ttl_secs() -> i64 {
    31 * 24 * 3600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            secret_key: default_secret_key(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Load overrides from a JSON config file.
    ///
    /// A missing file is not an error; it means the defaults apply.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Session token lifetime as a duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs)
    }
}
