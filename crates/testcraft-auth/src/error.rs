//! Auth error types.

use thiserror::Error;

/// Errors raised by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A session was requested for a user id that does not exist.
    #[error("user not found: {0}")]
    UserNotFound(String),
}
