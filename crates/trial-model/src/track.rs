//! Sealed tracks and their derived metric sequences.
//!
//! A `Track` is the product of a finished recording session: the raw
//! position samples plus ten parallel derived sequences, all indexed
//! identically. Derivation happens exactly once (in the processing
//! crate's recorder); from then on a track is read-only.

use serde::{Deserialize, Serialize};

use crate::sample::PositionSample;

/// The closed set of derived metric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    XPos,
    YPos,
    VX,
    VY,
    AX,
    AY,
    VNet,
    ANet,
    Distance,
    Time,
}

impl MetricKind {
    /// Number of leading entries that are placeholders rather than
    /// physically meaningful values: position needs one real sample,
    /// velocity two, acceleration three.
    pub fn placeholder_len(self) -> usize {
        match self {
            MetricKind::VX | MetricKind::VY | MetricKind::VNet => 2,
            MetricKind::AX | MetricKind::AY | MetricKind::ANet => 3,
            _ => 1,
        }
    }

    /// Whether this metric can take negative values. Net magnitudes
    /// are Euclidean norms and never go below zero.
    pub fn is_signed(self) -> bool {
        !matches!(self, MetricKind::VNet | MetricKind::ANet)
    }
}

/// The fixed-shape bundle of derived metric sequences.
///
/// Invariant: all ten sequences have equal length, one entry per raw
/// sample (synthetic anchor included). Index 0 is always zeroed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetrics {
    pub x_pos: Vec<f64>,
    pub y_pos: Vec<f64>,
    pub v_x: Vec<f64>,
    pub v_y: Vec<f64>,
    pub a_x: Vec<f64>,
    pub a_y: Vec<f64>,
    pub v_net: Vec<f64>,
    pub a_net: Vec<f64>,
    pub distance: Vec<f64>,
    pub time: Vec<f64>,
}

impl TrackMetrics {
    /// Borrow a metric sequence by kind.
    pub fn get(&self, kind: MetricKind) -> &[f64] {
        match kind {
            MetricKind::XPos => &self.x_pos,
            MetricKind::YPos => &self.y_pos,
            MetricKind::VX => &self.v_x,
            MetricKind::VY => &self.v_y,
            MetricKind::AX => &self.a_x,
            MetricKind::AY => &self.a_y,
            MetricKind::VNet => &self.v_net,
            MetricKind::ANet => &self.a_net,
            MetricKind::Distance => &self.distance,
            MetricKind::Time => &self.time,
        }
    }

    /// Number of entries per sequence.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Check the equal-length invariant across all sequences.
    pub fn is_consistent(&self) -> bool {
        let n = self.time.len();
        [
            &self.x_pos,
            &self.y_pos,
            &self.v_x,
            &self.v_y,
            &self.a_x,
            &self.a_y,
            &self.v_net,
            &self.a_net,
            &self.distance,
        ]
        .iter()
        .all(|seq| seq.len() == n)
    }
}

/// A sealed recording: raw samples plus derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Raw positions with timesteps, synthetic anchor first.
    pub samples: Vec<PositionSample>,

    /// Derived metric sequences, one entry per raw sample.
    pub metrics: TrackMetrics,
}

impl Track {
    /// Number of recorded frames (raw samples, anchor included).
    pub fn num_frames(&self) -> usize {
        self.metrics.len()
    }

    /// Total path length: the trapezoidal per-step distances summed.
    pub fn total_distance(&self) -> f64 {
        self.metrics.distance.iter().sum()
    }

    /// Total recorded duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.metrics.time.iter().sum()
    }
}
