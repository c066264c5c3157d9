//! A single ring position running the fixed-round exchange.
//!
//! Each round a participant:
//!
//! 1. sends its current accumulator to its successor
//! 2. waits for its predecessor's value
//! 3. adds the received value to its accumulator
//! 4. publishes `(id, accumulator, round)`
//!
//! The value sent is the already-grown accumulator, not the participant's
//! starting value, so sums compound around the ring: the ring-wide total
//! doubles every round.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::events::{ParticipantId, StatusEvent};
use crate::ring::Wiring;
use crate::sink::EventSink;

/// What a participant reports once it has run all of its rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantReport {
    pub id: ParticipantId,
    /// Accumulator after the final round.
    pub accumulator: u64,
    pub rounds_completed: usize,
    /// Values pushed onto the outbound edge.
    pub sent: usize,
    /// Values taken from the inbound edge.
    pub received: usize,
    /// Values still sitting on the inbound edge after the last round.
    pub residual: usize,
}

/// One position on the ring.
#[derive(Debug)]
pub struct Participant {
    id: ParticipantId,
    accumulator: u64,
    rounds: usize,
    inbound: mpsc::Receiver<u64>,
    outbound: mpsc::Sender<u64>,
    sink: EventSink,
    pace: Option<Duration>,
}

impl Participant {
    /// Bind a participant to its ring edges. The accumulator starts at `id + 1`.
    pub fn new(wiring: Wiring, rounds: usize, sink: EventSink, pace: Option<Duration>) -> Self {
        let Wiring {
            id,
            inbound,
            outbound,
        } = wiring;

        Self {
            id,
            accumulator: id.initial_accumulator(),
            rounds,
            inbound,
            outbound,
            sink,
            pace,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn accumulator(&self) -> u64 {
        self.accumulator
    }

    /// Run every round, then stop. The participant never touches its edges
    /// again after the last round.
    pub async fn run(mut self) -> Result<ParticipantReport> {
        debug!(participant = %self.id, rounds = self.rounds, "participant started");

        let mut sent = 0;
        let mut received = 0;

        for round in 1..=self.rounds {
            self.outbound
                .send(self.accumulator)
                .await
                .map_err(|_| Error::ChannelClosed {
                    participant: self.id,
                    round,
                })?;
            sent += 1;

            let value = self.inbound.recv().await.ok_or(Error::ChannelClosed {
                participant: self.id,
                round,
            })?;
            received += 1;

            self.accumulator = self
                .accumulator
                .checked_add(value)
                .ok_or(Error::AccumulatorOverflow {
                    participant: self.id,
                    round,
                })?;

            trace!(
                participant = %self.id,
                round,
                value,
                accumulator = self.accumulator,
                "round done"
            );
            self.sink.publish(StatusEvent {
                participant: self.id,
                accumulator: self.accumulator,
                round,
            });

            if round < self.rounds {
                if let Some(pace) = self.pace {
                    tokio::time::sleep(pace).await;
                }
            }
        }

        debug!(participant = %self.id, accumulator = self.accumulator, "participant done");

        Ok(ParticipantReport {
            id: self.id,
            accumulator: self.accumulator,
            rounds_completed: self.rounds,
            sent,
            received,
            residual: self.inbound.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RingEvent;
    use crate::sink::event_channel;

    /// A participant whose neighbors are driven by the test.
    struct Harness {
        participant: Participant,
        to_participant: mpsc::Sender<u64>,
        from_participant: mpsc::Receiver<u64>,
    }

    fn harness(id: usize, rounds: usize, sink: EventSink) -> Harness {
        let (to_participant, inbound) = mpsc::channel(1);
        let (outbound, from_participant) = mpsc::channel(1);
        let wiring = Wiring {
            id: ParticipantId(id),
            inbound,
            outbound,
        };
        Harness {
            participant: Participant::new(wiring, rounds, sink, None),
            to_participant,
            from_participant,
        }
    }

    #[test]
    fn starts_at_id_plus_one() {
        let (sink, _feed) = event_channel();
        let h = harness(3, 4, sink);
        assert_eq!(h.participant.id(), ParticipantId(3));
        assert_eq!(h.participant.accumulator(), 4);
    }

    #[tokio::test]
    async fn sends_current_accumulator_each_round() {
        let (sink, mut feed) = event_channel();
        let mut h = harness(0, 3, sink);
        let task = tokio::spawn(h.participant.run());

        // Starts at 1, receives 10, 20, 30
        let mut seen = Vec::new();
        for incoming in [10, 20, 30] {
            seen.push(h.from_participant.recv().await.unwrap());
            h.to_participant.send(incoming).await.unwrap();
        }

        let report = task.await.unwrap().unwrap();
        assert_eq!(seen, vec![1, 11, 31]);
        assert_eq!(report.accumulator, 61);
        assert_eq!(report.rounds_completed, 3);
        assert_eq!(report.sent, 3);
        assert_eq!(report.received, 3);
        assert_eq!(report.residual, 0);

        // Nothing more is ever sent
        assert_eq!(h.from_participant.recv().await, None);

        let events = feed.drain();
        let statuses: Vec<_> = events.iter().filter_map(|e| e.status()).collect();
        let rounds: Vec<_> = statuses.iter().map(|s| s.round).collect();
        let values: Vec<_> = statuses.iter().map(|s| s.accumulator).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
        assert_eq!(values, vec![11, 31, 61]);
        assert!(!events.iter().any(RingEvent::is_completed));
    }

    #[tokio::test]
    async fn zero_rounds_touches_nothing() {
        let (sink, mut feed) = event_channel();
        let mut h = harness(1, 0, sink);

        let report = h.participant.run().await.unwrap();
        assert_eq!(report.accumulator, 2);
        assert_eq!(report.sent, 0);
        assert_eq!(h.from_participant.recv().await, None);
        assert!(feed.drain().is_empty());
    }

    #[tokio::test]
    async fn closed_inbound_edge_is_reported() {
        let (sink, _feed) = event_channel();
        let mut h = harness(2, 2, sink);
        drop(h.to_participant);

        let task = tokio::spawn(h.participant.run());
        assert_eq!(h.from_participant.recv().await, Some(3));

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::ChannelClosed {
                participant: ParticipantId(2),
                round: 1
            }
        ));
    }

    #[tokio::test]
    async fn closed_outbound_edge_is_reported() {
        let (sink, _feed) = event_channel();
        let h = harness(0, 1, sink);
        drop(h.from_participant);

        let err = h.participant.run().await.unwrap_err();
        assert!(matches!(err, Error::ChannelClosed { round: 1, .. }));
    }

    #[tokio::test]
    async fn overflow_is_an_error() {
        let (sink, _feed) = event_channel();
        let mut h = harness(0, 1, sink);
        h.participant.accumulator = u64::MAX;
        h.to_participant.send(1).await.unwrap();

        let err = h.participant.run().await.unwrap_err();
        assert!(matches!(err, Error::AccumulatorOverflow { round: 1, .. }));
    }
}
