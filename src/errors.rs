use thiserror::Error;

/// Failures reading or writing the durable entry slot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("stored entries could not be read ({0}); refusing to overwrite them")]
    Unreadable(String),
}

/// Rejected candidate entry fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid month `{0}` (expected YYYY-MM or `all`)")]
    InvalidMonth(String),
    #[error("unknown entry type `{0}` (expected income or expense)")]
    UnknownKind(String),
}

/// Error type returned by [`crate::core::entry_store::EntryStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Entry not found: {0}")]
    NotFound(String),
    #[error("Entry reference `{0}` matches more than one entry")]
    AmbiguousId(String),
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
}

impl StoreError {
    /// True when the in-memory collection was changed even though the call failed.
    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Persistence(_))
    }
}

/// Errors that end the shell session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("Invalid input: {0}")]
    Input(String),
}
