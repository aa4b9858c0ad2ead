//! Identity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::OpsError;
use thiserror::Error;

/// Shortest password accepted at account creation
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Unknown email and wrong password look the same to the caller
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account for '{0}' already exists")]
    EmailTaken(String),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,

    #[error("Session expired or signed out")]
    SessionNotFound,

    #[error("Account storage error: {0}")]
    Storage(String),
}

impl From<IdentityError> for OpsError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::SessionNotFound => OpsError::Unauthenticated,
            IdentityError::Storage(message) => OpsError::Store(message),
            other => OpsError::Auth(other.to_string()),
        }
    }
}

/// A signed-in session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque bearer token
    pub token: String,
    /// Subject id; the user's profile document id
    pub uid: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
}

/// A stored account (never leaves the provider with its digest)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Account {
    pub uid: String,
    pub email: String,
    /// Argon2 PHC string; carries its own salt and parameters
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

/// Identity provider boundary
///
/// This is a PORT: the dashboard only needs sign-in, sign-out and session
/// lookup; how accounts are kept is up to the implementation.
pub trait IdentityProvider: Send + Sync {
    /// Register an email/password account, returning its uid
    fn create_account(&self, email: &str, password: &str) -> Result<String, IdentityError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    fn sign_out(&self, token: &str) -> Result<(), IdentityError>;

    /// Look up a live session by token
    fn session(&self, token: &str) -> Result<Session, IdentityError>;

    /// uid for an email, if an account exists
    fn uid_for_email(&self, email: &str) -> Option<String>;

    /// Remove an account and end its sessions
    ///
    /// Used to undo `create_account` when the matching profile cannot be
    /// stored. Unknown uids are not an error.
    fn delete_account(&self, uid: &str) -> Result<(), IdentityError>;
}
