//! Error types for OpsDesk

use thiserror::Error;

/// Error thrown when the signed-in role may not open a page
#[derive(Debug, Error)]
#[error("Page '{page}' is not accessible for role '{role}'. Allowed roles: {}", allowed_roles.join(", "))]
pub struct PageAccessDeniedError {
    pub page: String,
    pub role: String,
    pub allowed_roles: Vec<String>,
}

/// Error thrown when a document id does not exist in its collection
#[derive(Debug, Error)]
#[error("No document '{id}' in collection '{collection}'")]
pub struct RecordNotFoundError {
    pub collection: String,
    pub id: String,
}

/// General OpsDesk error type
#[derive(Debug, Error)]
pub enum OpsError {
    #[error(transparent)]
    PageAccessDenied(#[from] PageAccessDeniedError),

    #[error(transparent)]
    RecordNotFound(#[from] RecordNotFoundError),

    #[error("Sign in required")]
    Unauthenticated,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not read client details: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl OpsError {
    /// Short user-facing message, used for notifications
    pub fn user_message(&self) -> String {
        match self {
            OpsError::Unauthenticated => "Please sign in to continue".to_string(),
            OpsError::Io(_) | OpsError::Json(_) | OpsError::Yaml(_) | OpsError::Store(_) => {
                "Something went wrong while saving. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OpsError>;
