//! scriblr-auth - authentication and session identity for the scriblr blog engine
//!
//! Registration, credential verification, signed client-side sessions, and
//! per-request identity resolution over a SQLite-backed user store.

pub mod auth;
pub mod config;
