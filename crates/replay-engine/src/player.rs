//! Paced playback over a replay engine.
//!
//! The player owns the frame-synchronous loop: drain pending commands,
//! compose one step, hand it to a sink, sleep for the playback wait.
//! Pause keeps the loop alive at a short poll interval without
//! advancing the engine.

use std::path::PathBuf;

use tokio::sync::mpsc;

use kinetrack_common::error::{KinetrackError, KinetrackResult};

use crate::renderer::{ReplayEngine, ReplayStep};

/// Poll interval while paused, mirroring the per-frame key poll of an
/// interactive viewer.
const PAUSE_POLL_MS: u64 = 10;

/// Where composed replay frames go.
pub trait FrameSink: Send {
    /// Receive one composed step.
    fn write_step(&mut self, step: &ReplayStep) -> KinetrackResult<()>;
}

/// Writes each composed frame as a sequentially numbered PNG.
pub struct PngDirSink {
    dir: PathBuf,
    written: usize,
}

impl PngDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> KinetrackResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    /// Number of frames written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for PngDirSink {
    fn write_step(&mut self, step: &ReplayStep) -> KinetrackResult<()> {
        let path = self.dir.join(format!("replay_{:05}.png", self.written));
        step.image
            .save(&path)
            .map_err(|e| KinetrackError::render(format!("failed to write {}: {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }
}

/// A sink that discards frames; useful when only readouts matter.
pub struct NullSink;

impl FrameSink for NullSink {
    fn write_step(&mut self, _step: &ReplayStep) -> KinetrackResult<()> {
        Ok(())
    }
}

/// Discrete playback commands.
#[derive(Debug, Clone, Copy)]
pub enum PlaybackCommand {
    Play,
    Pause,
    /// Adjust the speed slider, [100, 2000].
    SetSpeed(u16),
    Quit,
}

/// Handle for driving a running player.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    tx: mpsc::UnboundedSender<PlaybackCommand>,
}

impl PlayerHandle {
    pub fn play(&self) {
        let _ = self.tx.send(PlaybackCommand::Play);
    }

    pub fn pause(&self) {
        let _ = self.tx.send(PlaybackCommand::Pause);
    }

    pub fn set_speed(&self, slider: u16) {
        let _ = self.tx.send(PlaybackCommand::SetSpeed(slider));
    }

    pub fn quit(&self) {
        let _ = self.tx.send(PlaybackCommand::Quit);
    }
}

/// Summary of a finished playback run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackSummary {
    /// Steps composed and delivered to the sink.
    pub steps_rendered: usize,

    /// Full passes over the trial.
    pub loops_completed: usize,
}

/// The paced playback loop.
pub struct ReplayPlayer<'a> {
    engine: ReplayEngine<'a>,
    sink: Box<dyn FrameSink>,
    rx: mpsc::UnboundedReceiver<PlaybackCommand>,
    playing: bool,
    /// Stop after this many full passes; `None` plays until quit.
    max_loops: Option<usize>,
}

impl<'a> ReplayPlayer<'a> {
    pub fn new(
        engine: ReplayEngine<'a>,
        sink: Box<dyn FrameSink>,
        max_loops: Option<usize>,
    ) -> (Self, PlayerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                engine,
                sink,
                rx,
                playing: true,
                max_loops,
            },
            PlayerHandle { tx },
        )
    }

    /// Run playback to completion (loop limit or quit).
    pub async fn run(mut self) -> KinetrackResult<PlaybackSummary> {
        tracing::info!(
            frames = self.engine.num_frames(),
            wait_ms = self.engine.wait_ms(),
            "Replay started"
        );

        let mut summary = PlaybackSummary::default();

        loop {
            let mut quit = false;
            while let Ok(command) = self.rx.try_recv() {
                match command {
                    PlaybackCommand::Play => self.playing = true,
                    PlaybackCommand::Pause => self.playing = false,
                    PlaybackCommand::SetSpeed(slider) => {
                        self.engine.set_playback_slider(slider);
                        tracing::debug!(slider, wait_ms = self.engine.wait_ms(), "Speed updated");
                    }
                    PlaybackCommand::Quit => quit = true,
                }
            }
            if quit {
                break;
            }

            if !self.playing {
                tokio::time::sleep(std::time::Duration::from_millis(PAUSE_POLL_MS)).await;
                continue;
            }

            let step = self.engine.step();
            if step.wrapped {
                summary.loops_completed += 1;
                if let Some(max) = self.max_loops {
                    if summary.loops_completed >= max {
                        break;
                    }
                }
            }

            tracing::debug!(
                index = step.index,
                v_net = step.readouts.v_net.value,
                a_net = step.readouts.a_net.value,
                distance = step.readouts.distance_total,
                top_speed = step.readouts.top_speed,
                "Replay step"
            );
            self.sink.write_step(&step)?;
            summary.steps_rendered += 1;

            tokio::time::sleep(std::time::Duration::from_millis(self.engine.wait_ms())).await;
        }

        tracing::info!(
            steps = summary.steps_rendered,
            loops = summary.loops_completed,
            "Replay finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DisplayMode, ReplayConfig};
    use kinetrack_processing_core::recorder::TrackRecorder;
    use kinetrack_trial_model::sample::HueRange;
    use kinetrack_trial_model::trial::{LoadedTrial, RecordingInfo, Trial};
    use kinetrack_vision_core::frame::BgrFrame;

    fn make_trial(dir: &std::path::Path) -> LoadedTrial {
        let _ = std::fs::remove_dir_all(dir);

        let mut recorder = TrackRecorder::new();
        recorder.start().unwrap();
        for (x, y) in [(5.0, 5.0), (10.0, 5.0), (15.0, 5.0)] {
            recorder.add_sample(x, y, 0.5).unwrap();
        }
        let track = recorder.finalize().unwrap();

        let trial = Trial::new(
            "player_test",
            RecordingInfo {
                capture_width: 32,
                capture_height: 24,
                fps: 30,
                hue_range: HueRange::new(0, 6).unwrap(),
                full_video: false,
                conversion_factor: 1.0,
            },
            track,
        );
        let loaded = LoadedTrial::create(dir, trial).unwrap();
        BgrFrame::new(32, 24).save(loaded.background_path()).unwrap();
        loaded
    }

    fn fast_config() -> ReplayConfig {
        ReplayConfig {
            mode: DisplayMode::Polyline,
            playback_slider: 2000, // 100ms waits
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_single_loop_renders_every_step_once() {
        let dir = std::env::temp_dir().join("kinetrack_test_player_loop");
        let trial = make_trial(&dir);

        let engine = ReplayEngine::load(&trial, fast_config()).unwrap();
        let out_dir = dir.join("out");
        let sink = PngDirSink::new(&out_dir).unwrap();
        let (player, _handle) = ReplayPlayer::new(engine, Box::new(sink), Some(1));

        let summary = player.run().await.unwrap();
        assert_eq!(summary.loops_completed, 1);
        assert_eq!(summary.steps_rendered, 3);

        // 4 track frames: indices 1..=3 rendered, wrap ends the run.
        let rendered = std::fs::read_dir(&out_dir).unwrap().count();
        assert_eq!(rendered, 3);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_quit_stops_playback() {
        let dir = std::env::temp_dir().join("kinetrack_test_player_quit");
        let trial = make_trial(&dir);

        let engine = ReplayEngine::load(&trial, fast_config()).unwrap();
        let (player, handle) = ReplayPlayer::new(engine, Box::new(NullSink), None);
        handle.quit();

        let summary = player.run().await.unwrap();
        assert_eq!(summary.loops_completed, 0);

        std::fs::remove_dir_all(&dir).ok();
    }
}
