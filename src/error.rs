//! Error types shared across the crate.
//!
//! All failure classes (transport, upstream status, decode, local database,
//! background task) collapse into one enum at the repository boundary.
//! "Not found" is never an error: lookups return `Ok(None)`.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error for repository operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or transport failure talking to the upstream API.
    #[error("network request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream API answered with a non-success status.
    #[error("upstream API returned HTTP {status}")]
    Api { status: u16 },

    /// JSON decode failure.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local SQLite cache failure.
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// Filesystem failure while opening or creating the cache.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
