//! Common error types for Soundclash

use thiserror::Error;
use uuid::Uuid;

/// Common result type for Soundclash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by the store, ranking pipeline and HTTP service
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corrupt or schema-incompatible stored record
    #[error("Corrupt record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No battle stored under this name
    #[error("Battle not found: {0}")]
    BattleNotFound(String),

    /// Entry id not present in the battle's entry collection
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    /// No ballot recorded for this voter in this battle
    #[error("No votes recorded for voter {voter_id} in battle {battle}")]
    VotesNotFound { battle: String, voter_id: String },

    /// Score outside the accepted range, rejected before any mutation
    #[error("Invalid score: {0} (valid scores are 1..=3)")]
    InvalidScore(i64),
}

impl Error {
    /// True for the distinguished not-found outcomes, which callers may
    /// treat as absence rather than failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::BattleNotFound(_) | Error::EntryNotFound(_) | Error::VotesNotFound { .. }
        )
    }
}
