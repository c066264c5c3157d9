//! PSAR Ring - round-based value exchange around a ring of participants
//!
//! N participants sit on a cycle. Participant `i` owns an accumulator that
//! starts at `i + 1`, and for `N - 1` rounds it sends its accumulator to
//! participant `(i + 1) % N`, receives from `(i - 1) % N`, adds what it
//! received, and publishes a status event.
//!
//! # Overview
//!
//! - [`build_ring`] wires N bounded FIFO channels into a single cycle
//! - [`Participant`] runs the per-round send/receive/update/emit loop
//! - [`RingCoordinator`] spawns every participant, joins them all, then
//!   publishes [`RingEvent::Completed`]
//! - [`EventSink`] / [`EventFeed`] form the non-blocking queue an observer
//!   polls at its own pace
//!
//! Participants share nothing but their edges: no locks, no shared state.
//!
//! # Example
//!
//! ```no_run
//! use psar_ring::{event_channel, RingConfig, RingCoordinator};
//!
//! # async fn demo() -> psar_ring::Result<()> {
//! let (sink, mut feed) = event_channel();
//! let ring = RingCoordinator::new(RingConfig::default(), sink)?;
//! let outcome = ring.run().await?;
//!
//! for event in feed.drain() {
//!     println!("{event:?}");
//! }
//! assert_eq!(outcome.accumulators(), vec![59, 55, 41, 37, 48]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod participant;
pub mod ring;
pub mod sink;

pub use config::{RingConfig, DEFAULT_PARTICIPANTS, MIN_PARTICIPANTS};
pub use error::{Error, Result};
pub use events::{ParticipantId, RingEvent, StatusEvent};
pub use participant::{Participant, ParticipantReport};
pub use ring::{build_ring, RingCoordinator, RingOutcome, RingTask, Wiring};
pub use sink::{event_channel, EventFeed, EventSink};
