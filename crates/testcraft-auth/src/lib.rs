//! testcraft-auth: Demo users and login sessions.
//!
//! Everything lives in memory. Passwords are accepted but never checked;
//! this is a stand-in for a real identity provider.

pub mod error;
pub mod service;

pub use error::AuthError;
pub use service::{AuthService, LoginResult, Session, User, SESSION_STORAGE_KEY};
