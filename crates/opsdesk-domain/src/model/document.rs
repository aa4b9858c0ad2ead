//! Document - identity, validation and the collection a record lives in

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::Collection;

/// Opaque identifier of a stored document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record together with the id it is stored under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: DocumentId,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(id: DocumentId, record: T) -> Self {
        Self { id, record }
    }
}

/// Form validation failures
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace
    Blank { field: &'static str },
    /// Amount, price or similar must be greater than zero
    NotPositive { field: &'static str, value: f64 },
    /// Value outside the accepted range
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    /// Not a usable email address
    InvalidEmail { value: String },
    /// Record field that must be set for this kind of record
    Missing { field: &'static str },
    /// Text that names none of the accepted values
    UnknownValue { field: &'static str, value: String },
    /// Status change not allowed from the current status
    InvalidTransition { from: String, to: String },
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationError::Blank { field } => write!(f, "{} is required", field),
            ValidationError::NotPositive { field, value } => {
                write!(f, "{} must be greater than zero (got {})", field, value)
            }
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, value),
            ValidationError::InvalidEmail { value } => {
                write!(f, "'{}' is not a valid email address", value)
            }
            ValidationError::Missing { field } => write!(f, "{} must be set", field),
            ValidationError::UnknownValue { field, value } => {
                write!(f, "'{}' is not a known {}", value, field)
            }
            ValidationError::InvalidTransition { from, to } => {
                write!(f, "cannot change status from {} to {}", from, to)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for shared::OpsError {
    fn from(err: ValidationError) -> Self {
        shared::OpsError::Validation(err.to_string())
    }
}

/// A record type stored as a document in one collection
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection this record type is stored in
    const COLLECTION: Collection;

    /// Form-level validation run before every write
    fn validate(&self) -> Result<(), ValidationError>;

    /// Agent the record is attributed to, if any
    fn agent_name(&self) -> Option<&str> {
        None
    }
}

// ========== Validation helpers ==========

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

pub(crate) fn require_email(value: &str) -> Result<(), ValidationError> {
    if !shared::is_valid_email(value) {
        return Err(ValidationError::InvalidEmail {
            value: value.to_string(),
        });
    }
    Ok(())
}
