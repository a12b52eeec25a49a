//! Error types for investigator documents.

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when reading or mutating an investigator.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An attribute abbreviation did not match any of the nine attributes.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The named skill is not on the sheet.
    #[error("skill not found: \"{0}\"")]
    SkillNotFound(String),

    /// No inventory entry carries the given instance id.
    #[error("inventory item not found: {0}")]
    ItemNotFound(String),

    /// The stored JSON document could not be read or written.
    #[error("invalid investigator document: {0}")]
    Document(#[from] serde_json::Error),
}
