//! Angle measurement session.
//!
//! Tracks three marker colors simultaneously and derives the included
//! angle at the first marker via the law of cosines. The angle is only
//! measured on frames where all three markers are detected; the
//! maximum seen so far is reported for goniometry-style use.

use std::time::Duration;

use tokio::sync::mpsc;

use kinetrack_common::error::KinetrackResult;
use kinetrack_trial_model::sample::HueRange;
use kinetrack_vision_core::angle::measure_angle;
use kinetrack_vision_core::detector::detect;

use crate::source::FrameSource;

/// The three marker colors and their default hue bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Red,
    Yellow,
    Blue,
}

/// Hue bands for the three markers.
#[derive(Debug, Clone, Copy)]
pub struct MarkerBands {
    /// Vertex marker; the reported angle sits here.
    pub red: HueRange,
    pub yellow: HueRange,
    pub blue: HueRange,
}

impl Default for MarkerBands {
    fn default() -> Self {
        Self {
            red: HueRange { low: 0, high: 12 },
            yellow: HueRange { low: 20, high: 30 },
            blue: HueRange { low: 90, high: 110 },
        }
    }
}

impl MarkerBands {
    pub fn set(&mut self, marker: MarkerColor, range: HueRange) {
        match marker {
            MarkerColor::Red => self.red = range,
            MarkerColor::Yellow => self.yellow = range,
            MarkerColor::Blue => self.blue = range,
        }
    }
}

/// Commands for a running angle session.
#[derive(Debug, Clone)]
pub enum AngleCommand {
    /// Adjust one marker's hue band.
    SetBand(MarkerColor, HueRange),
    /// End the session and report.
    Stop,
}

/// Handle for issuing commands to an angle session.
#[derive(Debug, Clone)]
pub struct AngleHandle {
    tx: mpsc::UnboundedSender<AngleCommand>,
}

impl AngleHandle {
    pub fn set_band(&self, marker: MarkerColor, range: HueRange) {
        let _ = self.tx.send(AngleCommand::SetBand(marker, range));
    }

    pub fn stop(&self) {
        let _ = self.tx.send(AngleCommand::Stop);
    }
}

/// What an angle session observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngleReport {
    /// Angle from the last fully detected frame, in degrees.
    pub last_degrees: Option<f64>,

    /// Largest angle observed, rounded to two decimals.
    pub max_degrees: Option<f64>,

    /// Frames where all three markers were found and the geometry was
    /// non-degenerate.
    pub frames_measured: usize,
}

/// A live three-marker angle session.
pub struct AngleSession {
    source: Box<dyn FrameSource>,
    bands: MarkerBands,
    fps: u32,
    rx: mpsc::UnboundedReceiver<AngleCommand>,
}

impl AngleSession {
    pub fn new(source: Box<dyn FrameSource>, bands: MarkerBands, fps: u32) -> (Self, AngleHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                source,
                bands,
                fps,
                rx,
            },
            AngleHandle { tx },
        )
    }

    /// Run until stop or end-of-stream.
    pub async fn run(mut self) -> KinetrackResult<AngleReport> {
        tracing::info!(source = %self.source.name(), "Angle session started");

        let tick = Duration::from_millis(1000 / self.fps.max(1) as u64);
        let mut report = AngleReport::default();
        let mut max_raw = 0.0_f64;

        loop {
            let mut done = false;
            while let Ok(command) = self.rx.try_recv() {
                match command {
                    AngleCommand::SetBand(marker, range) => {
                        tracing::debug!(?marker, low = range.low, high = range.high, "Band updated");
                        self.bands.set(marker, range);
                    }
                    AngleCommand::Stop => done = true,
                }
            }
            if done {
                break;
            }

            let Some(frame) = self.source.next_frame()? else {
                break;
            };

            let red = detect(&frame, self.bands.red);
            let yellow = detect(&frame, self.bands.yellow);
            let blue = detect(&frame, self.bands.blue);

            if red.detected() && yellow.detected() && blue.detected() {
                if let Some(degrees) =
                    measure_angle(red.centroid(), yellow.centroid(), blue.centroid())
                {
                    report.last_degrees = Some(degrees);
                    report.frames_measured += 1;
                    if degrees > max_raw {
                        max_raw = degrees;
                        report.max_degrees = Some((max_raw * 100.0).round() / 100.0);
                    }
                }
            } else {
                tracing::debug!("Markers incomplete; angle not available this frame");
            }

            tokio::time::sleep(tick).await;
        }

        tracing::info!(
            measured = report.frames_measured,
            max = ?report.max_degrees,
            "Angle session finished"
        );
        Ok(report)
    }
}
