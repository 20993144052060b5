//! Deterministic replay composition.
//!
//! Steps frame-by-frame through a sealed track, converting every
//! metric to real units, coloring readouts by each metric's observed
//! outlier range, and drawing the selected overlay. Outlier ranges
//! are computed once over the whole track before playback starts,
//! which is why replay requires a finalized track.

use image::RgbImage;

use kinetrack_common::error::{KinetrackError, KinetrackResult};
use kinetrack_processing_core::outliers::OutlierTable;
use kinetrack_trial_model::track::{MetricKind, Track};
use kinetrack_trial_model::trial::LoadedTrial;
use kinetrack_vision_core::calibrate::Calibration;
use kinetrack_vision_core::color::{scale_color, Polarity, Rgb};
use kinetrack_vision_core::frame::BgrFrame;

use crate::draw::{draw_filled_circle, draw_line};

/// How the trajectory is overlaid during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// A single dot at the current centroid.
    #[default]
    Marker,
    /// Accumulated trajectory segments in the object color.
    Polyline,
    /// Accumulated segments colored by net speed.
    VelocityPath,
    /// Accumulated segments colored by net acceleration.
    AccelerationPath,
}

/// Playback speed slider bounds.
pub const MIN_SLIDER: u16 = 100;
pub const MAX_SLIDER: u16 = 2000;

/// Map a speed slider position to a per-frame wait in milliseconds.
///
/// Inverse mapping so higher slider values play faster:
/// `wait_ms = 2100 - slider`, slider clamped to [100, 2000].
pub fn playback_wait_ms(slider: u16) -> u64 {
    2100 - slider.clamp(MIN_SLIDER, MAX_SLIDER) as u64
}

/// Replay configuration.
#[derive(Debug, Clone, Copy)]
pub struct ReplayConfig {
    pub mode: DisplayMode,

    /// Marker dot radius / path thickness in pixels, [1, 30].
    pub marker_radius: u32,

    /// Color for marker and plain polyline overlays. Ignored by the
    /// metric-colored path modes.
    pub object_color: Rgb,

    /// Speed slider position, [100, 2000].
    pub playback_slider: u16,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Marker,
            marker_radius: 4,
            object_color: Rgb::GREEN,
            playback_slider: 1000,
        }
    }
}

/// One metric's real-unit value and its display color.
#[derive(Debug, Clone, Copy)]
pub struct MetricReadout {
    pub value: f64,
    pub color: Rgb,
}

/// All readouts for one replay step, in real units.
#[derive(Debug, Clone, Copy)]
pub struct StepReadouts {
    pub v_x: MetricReadout,
    pub v_y: MetricReadout,
    pub v_net: MetricReadout,
    pub a_x: MetricReadout,
    pub a_y: MetricReadout,
    pub a_net: MetricReadout,

    /// Distance accumulated since playback (or the last wrap) began.
    pub distance_total: f64,

    /// Fastest net speed seen since the last wrap. Only tracked from
    /// index 4 onward; the first samples are precision-unreliable.
    pub top_speed: f64,
}

/// One composed replay frame.
#[derive(Debug)]
pub struct ReplayStep {
    /// Track index this step rendered.
    pub index: usize,

    /// The frame with overlays applied.
    pub image: RgbImage,

    /// Real-unit readouts with display colors.
    pub readouts: StepReadouts,

    /// True when this step wrapped playback back to the start,
    /// resetting the accumulators and segment history.
    pub wrapped: bool,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    from: (f64, f64),
    to: (f64, f64),
    color: Rgb,
}

/// Steps through a sealed track, composing overlay frames.
pub struct ReplayEngine<'a> {
    track: &'a Track,
    calibration: Calibration,
    config: ReplayConfig,
    outliers: OutlierTable,
    background: BgrFrame,
    frames: Vec<BgrFrame>,
    index: usize,
    segments: Vec<Segment>,
    distance_total: f64,
    top_speed: f64,
}

impl<'a> ReplayEngine<'a> {
    /// Load the trial's images and precompute outlier ranges.
    ///
    /// Fails when the background (or, in full-video mode, any frame
    /// image) is missing or unreadable; a partial replay would
    /// silently desynchronize the overlays.
    pub fn load(trial: &'a LoadedTrial, config: ReplayConfig) -> KinetrackResult<Self> {
        let track = &trial.trial.track;
        if track.num_frames() < 2 {
            return Err(KinetrackError::render(
                "trial has no recorded motion to replay",
            ));
        }

        let background = BgrFrame::load(trial.background_path())?;

        let mut frames = Vec::new();
        if trial.trial.recording.full_video {
            for n in 1..track.num_frames() {
                frames.push(BgrFrame::load(trial.frame_path(n))?);
            }
        }

        Ok(Self {
            track,
            calibration: Calibration::from_factor(trial.trial.recording.conversion_factor),
            config,
            outliers: OutlierTable::from_metrics(&track.metrics),
            background,
            frames,
            index: 1,
            segments: Vec::new(),
            distance_total: 0.0,
            top_speed: 0.0,
        })
    }

    /// Number of track frames (steps run from 1 to this minus one).
    pub fn num_frames(&self) -> usize {
        self.track.num_frames()
    }

    /// Per-frame wait for the configured slider position.
    pub fn wait_ms(&self) -> u64 {
        playback_wait_ms(self.config.playback_slider)
    }

    /// Update the speed slider during playback.
    pub fn set_playback_slider(&mut self, slider: u16) {
        self.config.playback_slider = slider;
    }

    /// Compose the next replay frame.
    ///
    /// Steps the index from 1 to `num_frames - 1`; the step after the
    /// last wraps back to 1, clearing the segment history and the
    /// distance/top-speed accumulators exactly once.
    pub fn step(&mut self) -> ReplayStep {
        let n = self.track.num_frames();

        let mut wrapped = false;
        if self.index > n - 1 {
            self.segments.clear();
            self.distance_total = 0.0;
            self.top_speed = 0.0;
            self.index = 1;
            wrapped = true;
        }

        let i = self.index;
        let m = &self.track.metrics;

        // Accumulators update on data, not on drawing.
        if i > 1 {
            self.distance_total += self.calibration.to_real_units(m.distance[i]);
        }
        let v_net_real = self.calibration.to_real_units(m.v_net[i]);
        if i > 3 && v_net_real.abs() > self.top_speed.abs() {
            self.top_speed = v_net_real;
        }

        let readouts = StepReadouts {
            v_x: self.metric_readout(MetricKind::VX, i),
            v_y: self.metric_readout(MetricKind::VY, i),
            v_net: self.metric_readout(MetricKind::VNet, i),
            a_x: self.metric_readout(MetricKind::AX, i),
            a_y: self.metric_readout(MetricKind::AY, i),
            a_net: self.metric_readout(MetricKind::ANet, i),
            distance_total: self.distance_total,
            top_speed: self.top_speed,
        };

        let mut image = self.base_image(i);
        self.draw_overlay(&mut image, i, &readouts);

        self.index += 1;
        ReplayStep {
            index: i,
            image,
            readouts,
            wrapped,
        }
    }

    fn base_image(&self, i: usize) -> RgbImage {
        match self.frames.get(i - 1) {
            Some(frame) => frame.to_rgb_image(),
            None => self.background.to_rgb_image(),
        }
    }

    fn draw_overlay(&mut self, image: &mut RgbImage, i: usize, readouts: &StepReadouts) {
        let m = &self.track.metrics;
        let (x, y) = (m.x_pos[i], m.y_pos[i]);

        // A centroid off the canvas draws nothing this step.
        let (w, h) = (image.width() as f64, image.height() as f64);
        if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
            return;
        }

        let radius = self.config.marker_radius;
        match self.config.mode {
            DisplayMode::Marker => {
                draw_filled_circle(image, x, y, radius, self.config.object_color);
            }
            DisplayMode::Polyline => {
                self.append_segment(i, self.config.object_color);
                self.redraw_segments(image, radius);
            }
            DisplayMode::VelocityPath => {
                self.append_segment(i, readouts.v_net.color);
                self.redraw_segments(image, radius);
            }
            DisplayMode::AccelerationPath => {
                self.append_segment(i, readouts.a_net.color);
                self.redraw_segments(image, radius);
            }
        }
    }

    fn append_segment(&mut self, i: usize, color: Rgb) {
        if i < 2 {
            return;
        }
        let m = &self.track.metrics;
        let from = (m.x_pos[i - 1], m.y_pos[i - 1]);
        let to = (m.x_pos[i], m.y_pos[i]);
        self.segments.push(Segment { from, to, color });
    }

    fn redraw_segments(&self, image: &mut RgbImage, thickness: u32) {
        for segment in &self.segments {
            draw_line(image, segment.from, segment.to, thickness, segment.color);
        }
    }

    /// Value and color for one metric at one index.
    ///
    /// Negative values scale into the red band against the metric's
    /// negative outlier range, non-negative into the green band; a
    /// missing range falls back to the flat sign color.
    fn metric_readout(&self, kind: MetricKind, i: usize) -> MetricReadout {
        let raw = self.track.metrics.get(kind)[i];
        let value = self.calibration.to_real_units(raw);
        let ranges = self.outliers.get(kind);

        let color = if raw < 0.0 {
            match ranges.and_then(|r| r.neg) {
                Some((min, max)) => scale_color(raw, min, max, Polarity::Negative),
                None => Rgb::RED,
            }
        } else {
            match ranges.and_then(|r| r.pos) {
                Some((min, max)) => scale_color(raw, min, max, Polarity::Positive),
                None => Rgb::GREEN,
            }
        };

        MetricReadout { value, color }
    }
}
