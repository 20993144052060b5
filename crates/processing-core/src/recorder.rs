//! The track recorder: sample accumulation and the finalize pass.
//!
//! Recording keeps the hot path O(1) per frame: samples are only
//! appended. All nine derived sequences are computed in a single
//! forward pass when the recording is sealed, and sealing happens
//! exactly once.
//!
//! # Derivation
//!
//! With raw positions `x[i]`, `y[i]` and timesteps `dt[i]` (index 0 is
//! the synthetic anchor), for `i >= 1`:
//!
//! - `v_x[i] = (x[i] - x[i-1]) / dt[i]`, same for `v_y`
//! - `v_net[i] = hypot(v_x[i], v_y[i])`, a speed, always non-negative
//! - `a_x[i] = (v_x[i] - v_x[i-1]) / dt[i]`, same for `a_y`
//! - `a_net[i] = hypot(v_x[i], v_y[i])`, from the velocity
//!   components; see the note below
//! - `distance[i] = (v_net[i] + v_net[i-1]) / 2 * dt[i]` (trapezoid)
//!
//! Index 0 of every sequence is a zero placeholder. The `a_net`
//! formula reads the velocity components, not the acceleration
//! components; this reproduces the long-observed behavior of the
//! deployed derivation and is kept intentionally until its semantics
//! are re-decided (see DESIGN.md).

use kinetrack_common::error::{KinetrackError, KinetrackResult};
use kinetrack_trial_model::sample::PositionSample;
use kinetrack_trial_model::track::{Track, TrackMetrics};

/// Lifecycle of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Created, no samples held.
    Idle,
    /// Accepting samples.
    Recording,
}

/// Accumulates raw position samples and seals them into a [`Track`].
#[derive(Debug)]
pub struct TrackRecorder {
    state: RecorderState,
    samples: Vec<PositionSample>,
}

impl Default for TrackRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackRecorder {
    /// Create an idle recorder.
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            samples: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Number of raw samples held (synthetic anchor included).
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Begin recording, seeding the synthetic zero anchor.
    pub fn start(&mut self) -> KinetrackResult<()> {
        if self.state != RecorderState::Idle {
            return Err(KinetrackError::processing(
                "recorder already started; create a new recorder per session",
            ));
        }
        self.samples.push(PositionSample::ANCHOR);
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Append one raw sample. O(1); no derivation happens here.
    ///
    /// Rejects use before `start()` and non-positive timesteps (a
    /// zero timestep would poison the finite differences).
    pub fn add_sample(&mut self, x: f64, y: f64, dt: f64) -> KinetrackResult<()> {
        if self.state != RecorderState::Recording {
            return Err(KinetrackError::processing(
                "add_sample called while not recording",
            ));
        }
        if !(dt > 0.0) {
            return Err(KinetrackError::invalid_input(format!(
                "timestep must be positive, got {dt}"
            )));
        }
        self.samples.push(PositionSample::new(x, y, dt));
        Ok(())
    }

    /// Seal the recording: run the derivation once and yield the
    /// read-only track.
    ///
    /// Consumes the recorder, so a sealed track can neither receive
    /// further samples nor be finalized twice.
    pub fn finalize(self) -> KinetrackResult<Track> {
        if self.state != RecorderState::Recording {
            return Err(KinetrackError::processing(
                "finalize called on a recorder that never started",
            ));
        }

        let metrics = derive_metrics(&self.samples);
        tracing::debug!(
            frames = metrics.len(),
            total_distance = metrics.distance.iter().sum::<f64>(),
            "Track sealed"
        );

        Ok(Track {
            samples: self.samples,
            metrics,
        })
    }
}

/// Single forward pass computing all derived sequences.
fn derive_metrics(samples: &[PositionSample]) -> TrackMetrics {
    let n = samples.len();
    let mut m = TrackMetrics {
        x_pos: Vec::with_capacity(n),
        y_pos: Vec::with_capacity(n),
        v_x: Vec::with_capacity(n),
        v_y: Vec::with_capacity(n),
        a_x: Vec::with_capacity(n),
        a_y: Vec::with_capacity(n),
        v_net: Vec::with_capacity(n),
        a_net: Vec::with_capacity(n),
        distance: Vec::with_capacity(n),
        time: Vec::with_capacity(n),
    };
    if n == 0 {
        return m;
    }

    // Index 0: the anchor's placeholders.
    m.x_pos.push(samples[0].x);
    m.y_pos.push(samples[0].y);
    for seq in [
        &mut m.v_x,
        &mut m.v_y,
        &mut m.a_x,
        &mut m.a_y,
        &mut m.v_net,
        &mut m.a_net,
        &mut m.distance,
        &mut m.time,
    ] {
        seq.push(0.0);
    }

    for i in 1..n {
        let prev = samples[i - 1];
        let curr = samples[i];
        let dt = curr.dt;

        let v_x = (curr.x - prev.x) / dt;
        let v_y = (curr.y - prev.y) / dt;
        let v_net = v_x.hypot(v_y);

        let a_x = (v_x - m.v_x[i - 1]) / dt;
        let a_y = (v_y - m.v_y[i - 1]) / dt;
        // Observed formula: net acceleration from the velocity
        // components. Kept verbatim; do not "fix" without re-deciding
        // the semantics (DESIGN.md).
        let a_net = v_x.hypot(v_y);

        let distance = (v_net + m.v_net[i - 1]) / 2.0 * dt;

        m.x_pos.push(curr.x);
        m.y_pos.push(curr.y);
        m.v_x.push(v_x);
        m.v_y.push(v_y);
        m.a_x.push(a_x);
        m.a_y.push(a_y);
        m.v_net.push(v_net);
        m.a_net.push(a_net);
        m.distance.push(distance);
        m.time.push(dt);
    }

    debug_assert!(m.is_consistent());
    m
}
