//! Error types for psar-ring.

use thiserror::Error;

use crate::events::ParticipantId;

/// Result type for psar-ring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a ring.
#[derive(Debug, Error)]
pub enum Error {
    /// A ring needs at least two participants to form a cycle.
    #[error("invalid participant count {count}: a ring needs at least 2 participants")]
    InvalidParticipantCount { count: usize },

    /// Ring edges must hold at least one in-flight value.
    #[error("invalid channel capacity {capacity}: must be at least 1")]
    InvalidChannelCapacity { capacity: usize },

    /// A configuration override could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    /// A neighbor dropped its end of a ring edge mid-run.
    #[error("{participant}: ring edge closed during round {round}")]
    ChannelClosed { participant: ParticipantId, round: usize },

    /// The accumulator no longer fits in a u64.
    #[error("{participant}: accumulator overflow in round {round}")]
    AccumulatorOverflow { participant: ParticipantId, round: usize },

    /// A participant task panicked or was aborted before finishing.
    #[error("participant task failed: {0}")]
    ParticipantFailed(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::ParticipantFailed(e.to_string())
    }
}
