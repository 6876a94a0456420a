//! # Access Guard
//!
//! Wraps protected operations: anonymous callers are redirected to the
//! login form instead of running the operation.

use super::context::Identity;
use super::store::User;

/// Abstract navigation target handed to the routing layer
///
/// The guard and handlers only name the destination; URL construction
/// and response emission live outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// The login form
    Login,
    /// The post-login landing page
    Index,
}

/// Result of running a guarded operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation ran; here is its result
    Done(T),
    /// The operation did not run; send the visitor elsewhere
    Redirect(Redirect),
}

impl<T> Outcome<T> {
    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Redirect(_) => None,
        }
    }
}

/// Run `view` only for an authenticated identity
///
/// Anonymous callers get the login redirect and `view` never executes;
/// authenticated callers run it exactly once with their user record.
pub fn login_required<T, F>(identity: &Identity, view: F) -> Outcome<T>
where
    F: FnOnce(&User) -> T,
{
    match identity.user() {
        Some(user) => Outcome::Done(view(user)),
        None => Outcome::Redirect(Redirect::Login),
    }
}
