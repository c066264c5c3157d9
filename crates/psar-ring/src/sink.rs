//! The event queue between a ring and whoever is watching it.
//!
//! Publishing never blocks: the queue is unbounded and grows until the
//! observer drains it. The observer polls on its own schedule, either with
//! [`EventFeed::drain`] from a timer or by awaiting [`EventFeed::next`].

use tokio::sync::mpsc;
use tracing::trace;

use crate::events::RingEvent;

/// Create a connected sink/feed pair.
pub fn event_channel() -> (EventSink, EventFeed) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, EventFeed { rx })
}

/// Producer side, shared by every participant and the coordinator.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<RingEvent>,
}

impl EventSink {
    /// Publish an event without waiting for the observer.
    ///
    /// If the feed has been dropped the event is discarded; the ring does not
    /// depend on anyone listening.
    pub fn publish(&self, event: impl Into<RingEvent>) {
        let event = event.into();
        if self.tx.send(event).is_err() {
            trace!(?event, "event feed dropped, discarding");
        }
    }
}

/// Consumer side, owned by the presentation layer.
#[derive(Debug)]
pub struct EventFeed {
    rx: mpsc::UnboundedReceiver<RingEvent>,
}

impl EventFeed {
    /// Take every event that is currently queued, oldest first.
    pub fn drain(&mut self) -> Vec<RingEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the next event. `None` once every sink is gone and the queue
    /// is empty.
    pub async fn next(&mut self) -> Option<RingEvent> {
        self.rx.recv().await
    }
}
