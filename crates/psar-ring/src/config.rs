//! Ring configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Participant count used when nothing else is specified.
pub const DEFAULT_PARTICIPANTS: usize = 5;

/// Smallest ring that still forms a cycle.
pub const MIN_PARTICIPANTS: usize = 2;

/// In-flight values each ring edge can hold before the sender waits.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

/// Configuration for a ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingConfig {
    /// Number of participants (N). Each runs N - 1 rounds.
    pub participants: usize,

    /// Capacity of every ring edge. Must be at least 1.
    pub channel_capacity: usize,

    /// Delay after each round so an observer can follow along.
    /// Has no effect on the values computed.
    pub pace: Option<Duration>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            participants: DEFAULT_PARTICIPANTS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            pace: None,
        }
    }
}

impl RingConfig {
    /// Set the participant count.
    #[must_use]
    pub fn with_participants(mut self, participants: usize) -> Self {
        self.participants = participants;
        self
    }

    /// Set the capacity of every ring edge.
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Sleep for `pace` after every round.
    #[must_use]
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    /// Run rounds back to back.
    #[must_use]
    pub fn without_pace(mut self) -> Self {
        self.pace = None;
        self
    }

    /// Rounds every participant runs: N - 1.
    pub fn rounds(&self) -> usize {
        self.participants.saturating_sub(1)
    }

    /// Reject configurations that cannot form a working ring.
    pub fn validate(&self) -> Result<()> {
        if self.participants < MIN_PARTICIPANTS {
            return Err(Error::InvalidParticipantCount {
                count: self.participants,
            });
        }
        if self.channel_capacity == 0 {
            return Err(Error::InvalidChannelCapacity {
                capacity: self.channel_capacity,
            });
        }
        Ok(())
    }

    /// Defaults overridden by `PSAR_PARTICIPANTS`, `PSAR_CHANNEL_CAPACITY`
    /// and `PSAR_PACE_MS`. The result is validated.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("PSAR_PARTICIPANTS") {
            config.participants = parse("PSAR_PARTICIPANTS", &value)?;
        }
        if let Some(value) = lookup("PSAR_CHANNEL_CAPACITY") {
            config.channel_capacity = parse("PSAR_CHANNEL_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("PSAR_PACE_MS") {
            let ms: u64 = parse("PSAR_PACE_MS", &value)?;
            config.pace = (ms > 0).then(|| Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfig {
        key,
        value: value.to_string(),
    })
}
