//! Presentation settings.

use std::time::Duration;

use psar_ring::RingConfig;

use crate::error::{Error, Result};
use crate::layout::LayoutConfig;

/// How often the presentation drains the event feed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Delay between rounds when the ring is being watched.
pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

/// Configuration for the console and web presenters.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// Interval between drains of the event feed.
    pub poll_interval: Duration,

    /// Round pacing applied to rings started by a presenter, unless the
    /// ring config already sets one.
    pub pace: Duration,

    /// Ring drawing geometry.
    pub layout: LayoutConfig,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            pace: DEFAULT_PACE,
            layout: LayoutConfig::default(),
        }
    }
}

impl VisConfig {
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Apply the presenter's pacing to a ring that has none of its own.
    pub fn paced(&self, ring: RingConfig) -> RingConfig {
        match ring.pace {
            None if !self.pace.is_zero() => ring.with_pace(self.pace),
            _ => ring,
        }
    }

    /// Defaults overridden by `PSAR_POLL_MS` and `PSAR_PACE_MS`
    /// (`PSAR_PACE_MS=0` turns pacing off).
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(ms) = env_millis("PSAR_POLL_MS")? {
            config.poll_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = env_millis("PSAR_PACE_MS")? {
            config.pace = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

fn env_millis(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidInput(format!("{key}={value}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_desktop_demo() {
        let config = VisConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(300));
        assert_eq!(config.pace, Duration::from_secs(1));
        assert_eq!(config.layout.radius, 130.0);
    }

    #[test]
    fn builder() {
        let config = VisConfig::default()
            .with_poll_interval(Duration::from_millis(10))
            .with_pace(Duration::ZERO);
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.pace, Duration::ZERO);
    }

    #[test]
    fn paced_only_fills_in_missing_pace() {
        let vis = VisConfig::default();
        assert_eq!(vis.paced(RingConfig::default()).pace, Some(DEFAULT_PACE));

        let own = RingConfig::default().with_pace(Duration::from_millis(5));
        assert_eq!(vis.paced(own).pace, Some(Duration::from_millis(5)));

        let off = VisConfig::default().with_pace(Duration::ZERO);
        assert_eq!(off.paced(RingConfig::default()).pace, None);
    }
}
