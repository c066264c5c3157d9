//! Error types for psar-vis.

use thiserror::Error;

/// Result type for psar-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while presenting a ring.
#[derive(Debug, Error)]
pub enum Error {
    /// The ring itself failed or was misconfigured
    #[error("Ring error: {0}")]
    Ring(#[from] psar_ring::Error),

    /// A ring is already running; wait for it to complete
    #[error("A ring is already running")]
    AlreadyRunning,

    /// Invalid command line or environment input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
