//! Events published by a running ring.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a participant on the ring, `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub usize);

impl ParticipantId {
    /// Index of this participant on the ring.
    pub fn index(&self) -> usize {
        self.0
    }

    /// The participant this one sends to.
    pub fn successor(&self, ring_size: usize) -> ParticipantId {
        ParticipantId((self.0 + 1) % ring_size)
    }

    /// The participant this one receives from.
    pub fn predecessor(&self, ring_size: usize) -> ParticipantId {
        ParticipantId((self.0 + ring_size - 1) % ring_size)
    }

    /// Starting accumulator value, `id + 1`.
    pub fn initial_accumulator(&self) -> u64 {
        self.0 as u64 + 1
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Snapshot of one participant's accumulator after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub participant: ParticipantId,
    pub accumulator: u64,
    /// 1-based round number.
    pub round: usize,
}

/// Everything the ring publishes to its observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RingEvent {
    /// A participant finished a round
    Status(StatusEvent),

    /// Every participant finished every round. Published exactly once.
    Completed,
}

impl RingEvent {
    /// The status payload, if this is a status event.
    pub fn status(&self) -> Option<&StatusEvent> {
        match self {
            RingEvent::Status(status) => Some(status),
            RingEvent::Completed => None,
        }
    }

    /// Whether this is the completion marker.
    pub fn is_completed(&self) -> bool {
        matches!(self, RingEvent::Completed)
    }
}

impl From<StatusEvent> for RingEvent {
    fn from(status: StatusEvent) -> Self {
        RingEvent::Status(status)
    }
}
