//! Ring construction and lifecycle.
//!
//! [`build_ring`] wires N bounded FIFO channels into a single cycle.
//! [`RingCoordinator`] spawns one task per participant on the runtime, waits
//! for all of them, and only then publishes [`RingEvent::Completed`].
//!
//! There is no timeout. If a participant stalls, its successor waits forever
//! and so does [`RingCoordinator::run`].

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::events::{ParticipantId, RingEvent};
use crate::participant::{Participant, ParticipantReport};
use crate::sink::EventSink;

/// The two ring edges owned by one participant.
#[derive(Debug)]
pub struct Wiring {
    pub id: ParticipantId,
    /// Edge from the predecessor.
    pub inbound: mpsc::Receiver<u64>,
    /// Edge to the successor.
    pub outbound: mpsc::Sender<u64>,
}

/// Allocate `participants` channels and wire them into a cycle.
///
/// Channel `i` is the inbox of participant `i`; participant `i` writes to
/// channel `(i + 1) % N`. Every channel therefore has exactly one writer and
/// one reader, and following the writers visits every participant once.
pub fn build_ring(participants: usize, channel_capacity: usize) -> Result<Vec<Wiring>> {
    if participants < crate::config::MIN_PARTICIPANTS {
        return Err(Error::InvalidParticipantCount {
            count: participants,
        });
    }
    if channel_capacity == 0 {
        return Err(Error::InvalidChannelCapacity {
            capacity: channel_capacity,
        });
    }

    let (senders, receivers): (Vec<_>, Vec<_>) = (0..participants)
        .map(|_| mpsc::channel(channel_capacity))
        .unzip();

    let wiring = receivers
        .into_iter()
        .enumerate()
        .map(|(i, inbound)| {
            let id = ParticipantId(i);
            Wiring {
                id,
                inbound,
                outbound: senders[id.successor(participants).index()].clone(),
            }
        })
        .collect();

    // `senders` drops here, leaving each channel with its single writer.
    Ok(wiring)
}

/// Result of a ring that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingOutcome {
    /// One report per participant, ordered by id.
    pub reports: Vec<ParticipantReport>,
}

impl RingOutcome {
    /// Final accumulators ordered by participant id.
    pub fn accumulators(&self) -> Vec<u64> {
        self.reports.iter().map(|r| r.accumulator).collect()
    }

    /// Sum of all final accumulators.
    pub fn total(&self) -> u128 {
        self.reports.iter().map(|r| u128::from(r.accumulator)).sum()
    }
}

/// Builds a ring, runs it, and signals completion.
#[derive(Debug)]
pub struct RingCoordinator {
    config: RingConfig,
    sink: EventSink,
}

impl RingCoordinator {
    /// Create a coordinator. Fails fast on a config that cannot form a ring.
    pub fn new(config: RingConfig, sink: EventSink) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sink })
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Run every participant concurrently and wait for all of them.
    ///
    /// On success exactly one [`RingEvent::Completed`] is published, after
    /// every participant's last status event. On failure nothing is
    /// published and the first error is returned.
    pub async fn run(self) -> Result<RingOutcome> {
        let rounds = self.config.rounds();
        let wiring = build_ring(self.config.participants, self.config.channel_capacity)?;
        info!(
            participants = self.config.participants,
            rounds,
            capacity = self.config.channel_capacity,
            "starting ring"
        );

        let mut tasks = JoinSet::new();
        for edges in wiring {
            let participant = Participant::new(edges, rounds, self.sink.clone(), self.config.pace);
            tasks.spawn(participant.run());
        }

        let mut reports = Vec::with_capacity(self.config.participants);
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined.map_err(Error::from).and_then(|r| r) {
                Ok(report) => {
                    debug!(
                        participant = %report.id,
                        accumulator = report.accumulator,
                        "participant joined"
                    );
                    reports.push(report);
                }
                Err(e) => {
                    warn!(error = %e, "participant failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        reports.sort_by_key(|r| r.id);
        self.sink.publish(RingEvent::Completed);
        info!("ring completed");

        Ok(RingOutcome { reports })
    }

    /// Launch the ring in the background. Consumes the coordinator, so a ring
    /// can only be started once.
    pub fn start(self) -> RingTask {
        RingTask {
            handle: tokio::spawn(self.run()),
        }
    }
}

/// A ring running in the background.
#[derive(Debug)]
pub struct RingTask {
    handle: JoinHandle<Result<RingOutcome>>,
}

impl RingTask {
    /// Whether the ring has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the ring to finish.
    pub async fn wait(self) -> Result<RingOutcome> {
        self.handle.await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::event_channel;

    #[test]
    fn build_ring_rejects_degenerate_sizes() {
        assert!(matches!(
            build_ring(1, 1),
            Err(Error::InvalidParticipantCount { count: 1 })
        ));
        assert!(matches!(
            build_ring(0, 1),
            Err(Error::InvalidParticipantCount { count: 0 })
        ));
        assert!(matches!(
            build_ring(3, 0),
            Err(Error::InvalidChannelCapacity { capacity: 0 })
        ));
    }

    #[tokio::test]
    async fn build_ring_forms_a_single_cycle() {
        let n = 5;
        let mut wiring = build_ring(n, 1).unwrap();
        assert_eq!(wiring.len(), n);

        // Tag each outbound edge with its writer, then read every inbox.
        for w in &wiring {
            w.outbound.send(w.id.index() as u64).await.unwrap();
        }
        for w in &mut wiring {
            let from = w.inbound.recv().await.unwrap() as usize;
            assert_eq!(ParticipantId(from), w.id.predecessor(n));
            assert!(w.inbound.try_recv().is_err());
        }

        // Following successors from 0 visits everyone once.
        let mut seen = vec![false; n];
        let mut at = ParticipantId(0);
        for _ in 0..n {
            assert!(!seen[at.index()]);
            seen[at.index()] = true;
            at = at.successor(n);
        }
        assert_eq!(at, ParticipantId(0));
        assert!(seen.into_iter().all(|s| s));
    }

    #[tokio::test]
    async fn each_edge_has_a_single_writer() {
        let wiring = build_ring(3, 1).unwrap();
        let mut wiring = wiring.into_iter();
        let first = wiring.next().unwrap();
        let rest: Vec<_> = wiring.collect();

        // Dropping participant 0's inbox closes participant 2's outbound edge.
        drop(first.inbound);
        assert!(rest[1].outbound.is_closed());
        assert!(!rest[0].outbound.is_closed());
    }

    #[test]
    fn coordinator_validates_config() {
        let (sink, _feed) = event_channel();
        let err = RingCoordinator::new(RingConfig::default().with_participants(1), sink);
        assert!(matches!(err, Err(Error::InvalidParticipantCount { count: 1 })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn five_participants_golden_values() {
        let (sink, mut feed) = event_channel();
        let coordinator = RingCoordinator::new(RingConfig::default(), sink).unwrap();
        let outcome = coordinator.run().await.unwrap();

        assert_eq!(outcome.accumulators(), vec![59, 55, 41, 37, 48]);
        assert_eq!(outcome.total(), 240);

        let events = feed.drain();
        assert_eq!(events.len(), 5 * 4 + 1);
        assert_eq!(events.last(), Some(&RingEvent::Completed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn two_participants_swap_once() {
        let (sink, mut feed) = event_channel();
        let coordinator =
            RingCoordinator::new(RingConfig::default().with_participants(2), sink).unwrap();
        let outcome = coordinator.run().await.unwrap();

        assert_eq!(outcome.accumulators(), vec![3, 3]);
        for report in &outcome.reports {
            assert_eq!(report.sent, 1);
            assert_eq!(report.received, 1);
            assert_eq!(report.residual, 0);
        }
        assert_eq!(feed.drain().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn start_runs_in_background() {
        let (sink, mut feed) = event_channel();
        let task = RingCoordinator::new(RingConfig::default().with_participants(3), sink)
            .unwrap()
            .start();

        let mut completions = 0;
        let mut statuses = 0;
        while let Some(event) = feed.next().await {
            match event {
                RingEvent::Status(_) => statuses += 1,
                RingEvent::Completed => {
                    completions += 1;
                    break;
                }
            }
        }

        let outcome = task.wait().await.unwrap();
        assert_eq!(outcome.accumulators(), vec![9, 7, 8]);
        assert_eq!(statuses, 3 * 2);
        assert_eq!(completions, 1);
    }
}
