//! Calibration capture session.
//!
//! Holds the reference object in front of the frame source and keeps
//! re-detecting it while the hue thresholds are adjusted. The last
//! detected footprint becomes the reference area handed to the
//! calibration engine together with the user-entered diameter.

use std::time::Duration;

use tokio::sync::mpsc;

use kinetrack_common::error::KinetrackResult;
use kinetrack_trial_model::sample::HueRange;
use kinetrack_vision_core::detector::detect;

use crate::session::{SessionCommand, SessionHandle};
use crate::source::FrameSource;

/// What a calibration pass observed.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationMeasurement {
    /// The last detected pixel footprint, if any frame matched.
    pub reference_area: Option<f64>,

    /// Hue band in effect when the session ended.
    pub hue_range: HueRange,

    /// Total frames pulled.
    pub frames_seen: usize,

    /// Frames in which the reference object was detected.
    pub frames_detected: usize,
}

/// A live reference-object measurement session.
pub struct CalibrationSession {
    source: Box<dyn FrameSource>,
    hue_range: HueRange,
    fps: u32,
    rx: mpsc::UnboundedReceiver<SessionCommand>,
}

impl CalibrationSession {
    pub fn new(
        source: Box<dyn FrameSource>,
        hue_range: HueRange,
        fps: u32,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                source,
                hue_range,
                fps,
                rx,
            },
            SessionHandle::from_tx(tx),
        )
    }

    /// Run until stop, quit, or end-of-stream.
    pub async fn run(mut self) -> KinetrackResult<CalibrationMeasurement> {
        tracing::info!(source = %self.source.name(), "Calibration session started");

        let tick = Duration::from_millis(1000 / self.fps.max(1) as u64);
        let mut measurement = CalibrationMeasurement {
            reference_area: None,
            hue_range: self.hue_range,
            frames_seen: 0,
            frames_detected: 0,
        };

        loop {
            let mut done = false;
            while let Ok(command) = self.rx.try_recv() {
                match command {
                    SessionCommand::SetHueRange(range) => {
                        tracing::debug!(low = range.low, high = range.high, "Hue range updated");
                        self.hue_range = range;
                    }
                    SessionCommand::StopRecording | SessionCommand::Quit => done = true,
                    SessionCommand::StartRecording => {
                        tracing::warn!("StartRecording ignored during calibration");
                    }
                }
            }
            if done {
                break;
            }

            let Some(frame) = self.source.next_frame()? else {
                break;
            };

            measurement.frames_seen += 1;
            let sample = detect(&frame, self.hue_range);
            if sample.detected() {
                measurement.frames_detected += 1;
                measurement.reference_area = Some(sample.area);
            }

            tokio::time::sleep(tick).await;
        }

        measurement.hue_range = self.hue_range;
        tracing::info!(
            frames = measurement.frames_seen,
            detected = measurement.frames_detected,
            area = ?measurement.reference_area,
            "Calibration session finished"
        );
        Ok(measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SyntheticSource;
    use kinetrack_trial_model::sample::Point;

    #[tokio::test]
    async fn test_measures_reference_footprint() {
        // A stationary red disk of radius 6: the detected area should
        // be close to pi * 36.
        let source = SyntheticSource::new(
            64,
            64,
            6.0,
            [0, 0, 255],
            Point::new(32.0, 32.0),
            (0.0, 0.0),
            5,
        );
        let (session, _handle) =
            CalibrationSession::new(Box::new(source), HueRange::new(0, 6).unwrap(), 1000);

        let measurement = session.run().await.unwrap();
        assert_eq!(measurement.frames_seen, 5);
        assert_eq!(measurement.frames_detected, 5);

        let area = measurement.reference_area.unwrap();
        assert!((area - std::f64::consts::PI * 36.0).abs() < 25.0);
    }

    #[tokio::test]
    async fn test_no_detection_yields_no_area() {
        // Blue disk, red band: never detected.
        let source = SyntheticSource::new(
            32,
            32,
            5.0,
            [255, 0, 0],
            Point::new(16.0, 16.0),
            (0.0, 0.0),
            3,
        );
        let (session, _handle) =
            CalibrationSession::new(Box::new(source), HueRange::new(0, 6).unwrap(), 1000);

        let measurement = session.run().await.unwrap();
        assert_eq!(measurement.frames_detected, 0);
        assert!(measurement.reference_area.is_none());
    }
}
