//! Error types for the reminder lifecycle engine.

use crate::action::ReminderAction;
use crate::entity::ReminderStatus;
use std::fmt;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the reminder lifecycle engine.
///
/// All board operations return `Result<T>` where `Result` is defined as `std::result::Result<T, Error>`.
/// Nothing in the engine panics; every failure mode surfaces as one of these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// No reminder with the given id exists in the store.
    ///
    /// Returned by every command that addresses a reminder by id.
    /// The store is left untouched.
    NotFound(String),

    /// The action is not legal for the reminder's current status.
    ///
    /// Only raised under `TransitionPolicy::Strict`. Common causes:
    /// - Dragging a paid reminder back to an earlier column
    /// - Escalating a reminder that is already engaged or escalated
    /// - Dropping a reminder on the column it already sits in
    InvalidTransition {
        /// Id of the reminder the action targeted
        id: String,
        /// Status the reminder had when the action was refused
        from: ReminderStatus,
        /// The refused action
        action: ReminderAction,
    },

    /// A reminder violates one of the data model invariants.
    ///
    /// Raised when seeding or replacing a record, e.g.:
    /// - `status == paid` with a non-zero `days_overdue`
    /// - Negative or non-finite amount
    /// - Duplicate history item ids
    ValidationError(String),

    /// Two reminders with the same id were offered to the store.
    DuplicateId(String),

    /// Converting reminders to JSON failed.
    SerializationError(String),

    /// Seed input could not be parsed.
    DeserializationError(String),

    /// Invalid `BoardConfig`.
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(id) => write!(f, "Reminder not found: {}", id),
            Error::InvalidTransition { id, from, action } => write!(
                f,
                "Invalid transition: cannot apply {} to reminder {} in status {}",
                action, id, from
            ),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::DuplicateId(id) => write!(f, "Duplicate reminder id: {}", id),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// True for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True for [`Error::InvalidTransition`].
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Error::InvalidTransition { .. })
    }
}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::Other(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Other(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
