//! Terminal presenter: the scrolling log, printed as it happens.

use std::io::Write;

use psar_ring::{event_channel, RingConfig, RingCoordinator, RingOutcome};
use tracing::debug;

use crate::config::VisConfig;
use crate::error::Result;
use crate::monitor::RingMonitor;

/// Start a ring and print its log to `out` until it completes.
///
/// The feed is drained every `poll_interval`. After each non-empty batch the
/// one-line ring view is printed below the new log lines.
pub async fn run_console<W: Write>(
    ring: RingConfig,
    vis: &VisConfig,
    out: &mut W,
) -> Result<RingOutcome> {
    let (sink, mut feed) = event_channel();
    let mut monitor = RingMonitor::new(ring.participants, vis.layout);
    let task = RingCoordinator::new(ring, sink)?.start();

    let mut ticker = tokio::time::interval(vis.poll_interval);
    loop {
        ticker.tick().await;

        // Checked before draining so a finished ring's last events are
        // already queued.
        let finished = task.is_finished();

        let events = feed.drain();
        if !events.is_empty() {
            debug!(count = events.len(), "drained events");
            for event in events {
                if let Some(line) = monitor.apply(event) {
                    writeln!(out, "{line}")?;
                }
            }
            writeln!(out, "{}", monitor.render_line())?;
        }

        if monitor.is_completed() || finished {
            break;
        }
    }

    Ok(task.wait().await?)
}
