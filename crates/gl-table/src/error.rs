//! Error types for the session layer.

use thiserror::Error;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur while running a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// A row or record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up.
        kind: &'static str,
        /// The id that missed.
        id: String,
    },

    /// The caller's role does not allow the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The backend did not answer in time.
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        /// The operation that was abandoned.
        operation: &'static str,
        /// The limit that was hit.
        seconds: u64,
    },

    /// A roll request was already answered.
    #[error("roll request {0} was already rolled")]
    AlreadyRolled(String),

    /// No session uses this invite code.
    #[error("invalid invite code: {0}")]
    InvalidInviteCode(String),

    /// Sign-up or sign-in failed.
    #[error("auth: {0}")]
    Auth(String),

    /// The backing store refused or failed a request.
    #[error("store: {0}")]
    Store(String),

    /// A configuration value could not be read.
    #[error("config: {0}")]
    Config(String),

    /// A row could not be converted.
    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),

    /// A rules or dice error.
    #[error(transparent)]
    Mechanics(#[from] gl_mechanics::MechError),

    /// An investigator document error.
    #[error(transparent)]
    Core(#[from] gl_core::CoreError),
}

impl TableError {
    /// Shorthand for [`TableError::NotFound`].
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
