//! The authenticated-user context passed to ledger and report functions.

use crate::auth::UserID;

/// Proof that a request was made by a logged-in user.
///
/// The auth middleware builds a `Session` from a valid auth cookie and adds it
/// to the request extensions. Route handlers take it with
/// `Extension(session): Extension<Session>` and pass it on to every function
/// that reads or writes user data, so that all queries are scoped to the
/// session's user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: UserID,
}

impl Session {
    /// Create a session for `user_id`.
    ///
    /// The caller should have authenticated the user, e.g. with
    /// [crate::log_in] or by decrypting the auth cookie.
    pub fn new(user_id: UserID) -> Self {
        Self { user_id }
    }

    /// The ID of the logged-in user.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }
}
