//! Recording session management.
//!
//! One cooperative loop: pull a frame, detect, maybe record a sample,
//! sleep until the next tick. Control arrives as discrete commands
//! drained between frames, so a parameter update (like a hue-range
//! change) is never observed mid-frame. The session owns its frame
//! source exclusively; starting another session requires dropping this
//! one first.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use kinetrack_common::clock::{RecordingClock, TimestepClock};
use kinetrack_common::error::{KinetrackError, KinetrackResult};
use kinetrack_processing_core::recorder::TrackRecorder;
use kinetrack_trial_model::sample::HueRange;
use kinetrack_trial_model::trial::{LoadedTrial, RecordingInfo, Trial};
use kinetrack_vision_core::detector::detect;
use kinetrack_vision_core::frame::BgrFrame;

use crate::source::FrameSource;

/// Configuration for a recording session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Trial name (also the output directory name).
    pub name: String,

    /// Directory to create the trial in.
    pub output_dir: PathBuf,

    /// Hue band to track.
    pub hue_range: HueRange,

    /// Target frame rate; sets the per-iteration wait bound.
    pub fps: u32,

    /// Persist every frame (vs. background + trajectory only).
    pub full_video: bool,

    /// Pixel-to-real-unit factor from a prior calibration.
    pub conversion_factor: f64,
}

/// Discrete commands a presentation layer can issue against a session.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Begin tracking; the next frame becomes the background.
    StartRecording,
    /// Stop tracking, seal the track, persist the trial.
    StopRecording,
    /// Adjust the hue band. Applied between frames, never mid-frame.
    SetHueRange(HueRange),
    /// Abandon the session without persisting anything.
    Quit,
}

/// Handle for issuing commands to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn from_tx(tx: mpsc::UnboundedSender<SessionCommand>) -> Self {
        Self { tx }
    }

    pub fn command(&self, command: SessionCommand) {
        // A closed channel just means the session already ended.
        let _ = self.tx.send(command);
    }

    pub fn start_recording(&self) {
        self.command(SessionCommand::StartRecording);
    }

    pub fn stop_recording(&self) {
        self.command(SessionCommand::StopRecording);
    }

    pub fn set_hue_range(&self, range: HueRange) {
        self.command(SessionCommand::SetHueRange(range));
    }

    pub fn quit(&self) {
        self.command(SessionCommand::Quit);
    }
}

/// State of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Watching frames, not yet tracking.
    Idle,
    /// Tracking and accumulating samples.
    Recording,
    /// Sealed and persisted.
    Stopped,
}

/// A live tracking session over an exclusively owned frame source.
pub struct RecordingSession {
    config: SessionConfig,
    source: Box<dyn FrameSource>,
    state: SessionState,
    rx: mpsc::UnboundedReceiver<SessionCommand>,
    recorder: TrackRecorder,
    timestep: Option<TimestepClock>,
    background: Option<BgrFrame>,
    frames: Vec<BgrFrame>,
    start_pending: bool,
    stop_requested: bool,
    quit_requested: bool,
}

impl RecordingSession {
    /// Create a session and the handle that drives it.
    pub fn new(config: SessionConfig, source: Box<dyn FrameSource>) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                config,
                source,
                state: SessionState::Idle,
                rx,
                recorder: TrackRecorder::new(),
                timestep: None,
                background: None,
                frames: Vec::new(),
                start_pending: false,
                stop_requested: false,
                quit_requested: false,
            },
            SessionHandle { tx },
        )
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to completion.
    ///
    /// Returns the persisted trial directory, or `None` when the
    /// session ended without a recording (quit, or end-of-stream
    /// before anything was tracked).
    pub async fn run(mut self) -> KinetrackResult<Option<PathBuf>> {
        tracing::info!(
            name = %self.config.name,
            source = %self.source.name(),
            fps = self.config.fps,
            "Capture session started"
        );

        let tick = Duration::from_millis(1000 / self.config.fps.max(1) as u64);

        loop {
            self.drain_commands();

            if self.quit_requested {
                tracing::info!("Capture session quit without saving");
                return Ok(None);
            }

            if self.stop_requested {
                if self.state == SessionState::Recording {
                    let dir = self.seal_and_save()?;
                    return Ok(Some(dir));
                }
                tracing::info!("Stop requested before recording began");
                return Ok(None);
            }

            let Some(frame) = self.source.next_frame()? else {
                if self.state == SessionState::Recording {
                    tracing::info!("Frame source ended; sealing recording");
                    let dir = self.seal_and_save()?;
                    return Ok(Some(dir));
                }
                tracing::info!("Frame source ended before recording began");
                return Ok(None);
            };

            self.process_frame(frame)?;

            tokio::time::sleep(tick).await;
        }
    }

    /// Apply all pending commands. This is the only point where
    /// parameters change, so a frame is always processed under one
    /// consistent configuration.
    fn drain_commands(&mut self) {
        while let Ok(command) = self.rx.try_recv() {
            match command {
                SessionCommand::StartRecording => {
                    if self.state == SessionState::Idle {
                        self.start_pending = true;
                    } else {
                        tracing::warn!("StartRecording ignored: session not idle");
                    }
                }
                SessionCommand::StopRecording => {
                    self.stop_requested = true;
                }
                SessionCommand::SetHueRange(range) => {
                    tracing::debug!(low = range.low, high = range.high, "Hue range updated");
                    self.config.hue_range = range;
                }
                SessionCommand::Quit => {
                    self.quit_requested = true;
                }
            }
        }
    }

    fn process_frame(&mut self, frame: BgrFrame) -> KinetrackResult<()> {
        if self.start_pending {
            // The starting frame becomes the background; sampling
            // begins with the next frame.
            return self.begin_recording(&frame);
        }

        if self.state != SessionState::Recording {
            return Ok(());
        }

        let sample = detect(&frame, self.config.hue_range);
        if !sample.detected() {
            // A miss is a per-frame sentinel, not an error: skip the
            // kinematics update and let the timestep widen.
            tracing::debug!("No blob in frame; skipping sample");
            return Ok(());
        }

        let dt = self
            .timestep
            .as_mut()
            .expect("timestep clock exists while recording")
            .split();
        if dt <= 0.0 {
            tracing::debug!(dt, "Discarding sample with non-positive timestep");
            return Ok(());
        }

        self.recorder.add_sample(sample.x, sample.y, dt)?;
        if self.config.full_video {
            self.frames.push(frame);
        }
        Ok(())
    }

    fn begin_recording(&mut self, frame: &BgrFrame) -> KinetrackResult<()> {
        self.start_pending = false;

        let clock = RecordingClock::start();
        tracing::info!(epoch_wall = %clock.epoch_wall(), "Recording started");

        self.recorder.start()?;
        self.timestep = Some(TimestepClock::new(clock));
        self.background = Some(frame.clone());
        self.state = SessionState::Recording;
        Ok(())
    }

    fn seal_and_save(&mut self) -> KinetrackResult<PathBuf> {
        let recorder = std::mem::take(&mut self.recorder);
        let track = recorder.finalize()?;

        let background = self
            .background
            .take()
            .ok_or_else(|| KinetrackError::capture("recording has no background frame"))?;

        let recording = RecordingInfo {
            capture_width: background.width(),
            capture_height: background.height(),
            fps: self.config.fps,
            hue_range: self.config.hue_range,
            full_video: self.config.full_video,
            conversion_factor: self.config.conversion_factor,
        };

        let trial_dir = self.config.output_dir.join(&self.config.name);
        let trial = Trial::new(&self.config.name, recording, track);
        let loaded = LoadedTrial::create(&trial_dir, trial)
            .map_err(|e| KinetrackError::trial(format!("failed to persist trial: {e}")))?;

        background.save(loaded.background_path())?;
        for (n, frame) in self.frames.iter().enumerate() {
            frame.save(loaded.frame_path(n + 1))?;
        }

        self.state = SessionState::Stopped;
        tracing::info!(
            dir = %loaded.root.display(),
            frames = loaded.trial.track.num_frames(),
            "Trial saved"
        );

        Ok(loaded.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SyntheticSource;

    fn test_config(dir: &std::path::Path, full_video: bool) -> SessionConfig {
        SessionConfig {
            name: "test_trial".to_string(),
            output_dir: dir.to_path_buf(),
            hue_range: HueRange::new(0, 6).unwrap(),
            fps: 1000,
            full_video,
            conversion_factor: 1.0,
        }
    }

    #[tokio::test]
    async fn test_records_synthetic_drift_to_trial_dir() {
        let dir = std::env::temp_dir().join("kinetrack_test_session_full");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let source = SyntheticSource::red_drift(64, 48, 6);
        let (session, handle) = RecordingSession::new(test_config(&dir, true), Box::new(source));
        handle.start_recording();

        let trial_dir = session.run().await.unwrap().expect("trial persisted");
        let loaded = LoadedTrial::load(&trial_dir).unwrap();

        // Background + one sample per remaining frame.
        assert_eq!(loaded.trial.track.num_frames(), 6);
        assert!(loaded.trial.track.metrics.is_consistent());
        assert!(loaded.validate_sources().is_empty());
        // The disk drifts right, so x positions increase.
        let x = &loaded.trial.track.metrics.x_pos;
        assert!(x[2] < x[5]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_movement_only_mode_skips_frame_files() {
        let dir = std::env::temp_dir().join("kinetrack_test_session_bg");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let source = SyntheticSource::red_drift(64, 48, 4);
        let (session, handle) = RecordingSession::new(test_config(&dir, false), Box::new(source));
        handle.start_recording();

        let trial_dir = session.run().await.unwrap().expect("trial persisted");
        let loaded = LoadedTrial::load(&trial_dir).unwrap();

        assert!(loaded.background_path().exists());
        assert!(!loaded.frame_path(1).exists());
        assert!(loaded.validate_sources().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_quit_persists_nothing() {
        let dir = std::env::temp_dir().join("kinetrack_test_session_quit");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let source = SyntheticSource::red_drift(64, 48, 100);
        let (session, handle) = RecordingSession::new(test_config(&dir, true), Box::new(source));
        handle.start_recording();
        handle.quit();

        let result = session.run().await.unwrap();
        assert!(result.is_none());
        assert!(!dir.join("test_trial").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_end_of_stream_without_start_saves_nothing() {
        let dir = std::env::temp_dir().join("kinetrack_test_session_idle");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let source = SyntheticSource::red_drift(32, 32, 3);
        let (session, _handle) = RecordingSession::new(test_config(&dir, true), Box::new(source));

        let result = session.run().await.unwrap();
        assert!(result.is_none());

        std::fs::remove_dir_all(&dir).ok();
    }
}
