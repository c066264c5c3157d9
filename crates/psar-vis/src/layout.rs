//! Circular placement of ring participants.

use std::f64::consts::TAU;

use psar_ring::ParticipantId;
use serde::{Deserialize, Serialize};

/// Geometry of the ring drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub center_x: f64,
    pub center_y: f64,
    /// Distance from the centre to each participant.
    pub radius: f64,
    /// Radius of the circle drawn for each participant.
    pub node_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x: 200.0,
            center_y: 170.0,
            radius: 130.0,
            node_radius: 25.0,
        }
    }
}

/// Where one participant is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: ParticipantId,
    pub x: f64,
    pub y: f64,
}

/// Positions for every participant, evenly spaced clockwise from 3 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingLayout {
    pub config: LayoutConfig,
    pub nodes: Vec<NodePosition>,
}

impl RingLayout {
    /// Lay out `participants` nodes. Participant `i` sits at angle `2πi/N`.
    pub fn new(participants: usize, config: LayoutConfig) -> Self {
        let nodes = (0..participants)
            .map(|i| {
                let angle = TAU / participants as f64 * i as f64;
                NodePosition {
                    id: ParticipantId(i),
                    x: config.center_x + config.radius * angle.cos(),
                    y: config.center_y + config.radius * angle.sin(),
                }
            })
            .collect();

        Self { config, nodes }
    }

    pub fn position(&self, id: ParticipantId) -> Option<&NodePosition> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
