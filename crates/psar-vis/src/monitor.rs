//! Presentation-side view of a ring, rebuilt from drained events.

use psar_ring::{ParticipantId, RingEvent, StatusEvent};
use serde::{Deserialize, Serialize};

use crate::layout::{LayoutConfig, NodePosition, RingLayout};

/// Log line appended once the completion signal arrives.
pub const COMPLETED_LINE: &str = "✔ Prefix-Sum Completed";

/// Format the log line for one status event.
pub fn log_line(status: &StatusEvent) -> String {
    format!(
        "Process {} | Round {} | Prefix Sum = {}",
        status.participant.index(),
        status.round,
        status.accumulator
    )
}

/// Last known state of one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeState {
    pub id: ParticipantId,
    pub position: NodePosition,
    /// Accumulator from the latest event, or the starting value.
    pub accumulator: u64,
    /// Latest round reported, 0 before the first event.
    pub round: usize,
    /// Whether this participant produced the latest event.
    pub active: bool,
}

/// Everything a front end needs to draw the ring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RingSnapshot {
    pub participants: usize,
    pub rounds: usize,
    /// Geometry the node positions were computed from.
    pub layout: LayoutConfig,
    pub nodes: Vec<NodeState>,
    /// Value shown in the centre: the accumulator of the latest event.
    pub value: Option<u64>,
    pub active: Option<ParticipantId>,
    pub event_count: usize,
    pub completed: bool,
}

/// Accumulates drained events into log lines and per-node state.
#[derive(Debug, Clone)]
pub struct RingMonitor {
    layout: RingLayout,
    latest: Vec<Option<StatusEvent>>,
    active: Option<StatusEvent>,
    log: Vec<String>,
    event_count: usize,
    completed: bool,
}

impl RingMonitor {
    /// Monitor for a ring of `participants`.
    pub fn new(participants: usize, layout: LayoutConfig) -> Self {
        Self {
            layout: RingLayout::new(participants, layout),
            latest: vec![None; participants],
            active: None,
            log: Vec::new(),
            event_count: 0,
            completed: false,
        }
    }

    /// Apply one event. Returns the log line it produced, if any.
    ///
    /// Events after completion, or for participants outside the ring, are
    /// ignored.
    pub fn apply(&mut self, event: RingEvent) -> Option<&str> {
        if self.completed {
            return None;
        }

        match event {
            RingEvent::Status(status) => {
                let slot = self.latest.get_mut(status.participant.index())?;
                *slot = Some(status);
                self.active = Some(status);
                self.event_count += 1;
                self.log.push(log_line(&status));
            }
            RingEvent::Completed => {
                self.completed = true;
                self.log.push(COMPLETED_LINE.to_string());
            }
        }

        self.log.last().map(String::as_str)
    }

    /// Apply a batch of events, returning how many log lines were added.
    pub fn apply_all(&mut self, events: impl IntoIterator<Item = RingEvent>) -> usize {
        let before = self.log.len();
        for event in events {
            self.apply(event);
        }
        self.log.len() - before
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn event_count(&self) -> usize {
        self.event_count
    }

    pub fn participants(&self) -> usize {
        self.layout.len()
    }

    /// Current state of the ring.
    pub fn snapshot(&self) -> RingSnapshot {
        let active = self.active.map(|s| s.participant);
        let nodes = self
            .layout
            .nodes
            .iter()
            .zip(&self.latest)
            .map(|(position, latest)| NodeState {
                id: position.id,
                position: *position,
                accumulator: latest
                    .map(|s| s.accumulator)
                    .unwrap_or_else(|| position.id.initial_accumulator()),
                round: latest.map(|s| s.round).unwrap_or(0),
                active: active == Some(position.id),
            })
            .collect();

        RingSnapshot {
            participants: self.layout.len(),
            rounds: self.layout.len().saturating_sub(1),
            layout: self.layout.config,
            nodes,
            value: self.active.map(|s| s.accumulator),
            active,
            event_count: self.event_count,
            completed: self.completed,
        }
    }

    /// One-line text view: `[P0 6] [P1*3] ...`, the active node starred.
    pub fn render_line(&self) -> String {
        self.snapshot()
            .nodes
            .iter()
            .map(|n| {
                let mark = if n.active { '*' } else { ' ' };
                format!("[{}{}{}]", n.id, mark, n.accumulator)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
