//! In-memory user registry and session table.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use testcraft_core::config::{TestcraftConfig, UserSeed, MAX_SESSION_TTL_HOURS};

use crate::error::AuthError;

/// Key under which a client keeps its session id.
pub const SESSION_STORAGE_KEY: &str = "auth_session_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub user: User,
    pub session: Session,
}

fn new_session_id() -> String {
    format!("sess_{}", uuid::Uuid::new_v4().simple())
}

/// Registry of users plus their live sessions.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Vec<User>,
    sessions: HashMap<String, Session>,
    ttl: Duration,
}

impl Default for AuthService {
    fn default() -> Self {
        Self::from_config(&TestcraftConfig::default())
    }
}

impl AuthService {
    /// An empty service whose sessions live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            users: Vec::new(),
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// A service seeded with the configured users.
    ///
    /// The session TTL is clamped to `1..=MAX_SESSION_TTL_HOURS` hours.
    pub fn from_config(config: &TestcraftConfig) -> Self {
        let ttl_hours = config.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS);
        if ttl_hours != config.session_ttl_hours {
            tracing::warn!(
                configured = config.session_ttl_hours,
                used = ttl_hours,
                "session TTL out of range, clamped"
            );
        }
        let mut service = Self::new(Duration::hours(ttl_hours));
        for UserSeed {
            username,
            email,
            name,
        } in &config.users
        {
            if service.register_user(username, email, name, "").is_none() {
                tracing::warn!(username = %username, "duplicate seed user ignored");
            }
        }
        service
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Add a user. Returns `None` if the username is taken.
    ///
    /// Ids are assigned sequentially as `user-<n>`.
    pub fn register_user(
        &mut self,
        username: &str,
        email: &str,
        name: &str,
        _password: &str,
    ) -> Option<User> {
        if self.users.iter().any(|u| u.username == username) {
            return None;
        }

        let user = User {
            id: format!("user-{}", self.users.len() + 1),
            username: username.to_string(),
            email: email.to_string(),
            name: name.to_string(),
        };
        tracing::debug!(user_id = %user.id, username, "registered user");
        self.users.push(user.clone());
        Some(user)
    }

    /// Open a session for an existing user.
    pub fn create_session(&mut self, user_id: &str) -> Result<Session, AuthError> {
        self.create_session_at(user_id, Utc::now())
    }

    fn create_session_at(
        &mut self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        if self.user(user_id).is_none() {
            return Err(AuthError::UserNotFound(user_id.to_string()));
        }

        let session = Session {
            id: new_session_id(),
            user_id: user_id.to_string(),
            expires_at: now + self.ttl,
            created_at: now,
        };
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    /// Log in by username. The password is not checked.
    pub fn login(&mut self, username: &str, _password: &str) -> Option<LoginResult> {
        self.login_at(username, Utc::now())
    }

    fn login_at(&mut self, username: &str, now: DateTime<Utc>) -> Option<LoginResult> {
        let user = self.users.iter().find(|u| u.username == username)?.clone();
        let session = self.create_session_at(&user.id, now).ok()?;
        tracing::debug!(user_id = %user.id, session_id = %session.id, "logged in");
        Some(LoginResult { user, session })
    }

    /// Destroy a session. Returns false if it did not exist.
    pub fn logout(&mut self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Look up a live session. An expired session is removed and `None`
    /// returned.
    pub fn session(&mut self, session_id: &str) -> Option<Session> {
        self.session_at(session_id, Utc::now())
    }

    fn session_at(&mut self, session_id: &str, now: DateTime<Utc>) -> Option<Session> {
        let session = self.sessions.get(session_id)?;
        if session.is_expired_at(now) {
            self.sessions.remove(session_id);
            tracing::debug!(session_id, "expired session removed");
            return None;
        }
        Some(session.clone())
    }

    /// The user owning a live session.
    pub fn user_by_session(&mut self, session_id: &str) -> Option<User> {
        self.user_by_session_at(session_id, Utc::now())
    }

    fn user_by_session_at(&mut self, session_id: &str, now: DateTime<Utc>) -> Option<User> {
        let session = self.session_at(session_id, now)?;
        self.user(&session.user_id).cloned()
    }

    /// Sessions that have not yet expired.
    pub fn active_sessions(&self) -> Vec<&Session> {
        self.active_sessions_at(Utc::now())
    }

    fn active_sessions_at(&self, now: DateTime<Utc>) -> Vec<&Session> {
        self.sessions
            .values()
            .filter(|s| !s.is_expired_at(now))
            .collect()
    }
}
