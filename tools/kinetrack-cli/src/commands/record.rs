//! Track an object through a frame source and save a trial.

use std::path::PathBuf;

use kinetrack_capture_engine::session::{RecordingSession, SessionConfig};
use kinetrack_capture_engine::source::{FrameSource, ImageDirSource, SyntheticSource};
use kinetrack_common::config::AppConfig;
use kinetrack_trial_model::sample::HueRange;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    name: String,
    source: Option<PathBuf>,
    synthetic_frames: usize,
    output: Option<PathBuf>,
    fps: Option<u32>,
    hue_low: Option<u8>,
    hue_high: Option<u8>,
    movement_only: bool,
    conversion_factor: f64,
) -> anyhow::Result<()> {
    let app_config = AppConfig::load();

    let hue_range = HueRange::new(
        hue_low.unwrap_or(app_config.recording.hue_low),
        hue_high.unwrap_or(app_config.recording.hue_high),
    )
    .map_err(|e| anyhow::anyhow!("Invalid hue thresholds: {e}"))?;

    let source: Box<dyn FrameSource> = match source {
        Some(dir) => {
            println!("Recording from frames in: {}", dir.display());
            Box::new(ImageDirSource::new(&dir)?)
        }
        None => {
            println!("Recording from the synthetic source ({synthetic_frames} frames)");
            Box::new(SyntheticSource::red_drift(640, 480, synthetic_frames))
        }
    };

    let config = SessionConfig {
        name,
        output_dir: output.unwrap_or_else(|| app_config.trials_dir.clone()),
        hue_range,
        fps: fps.unwrap_or(app_config.recording.fps),
        full_video: !movement_only && app_config.recording.full_video,
        conversion_factor,
    };

    let (session, handle) = RecordingSession::new(config, source);
    // Headless run: start immediately, stop at end-of-stream.
    handle.start_recording();

    match session.run().await? {
        Some(dir) => {
            println!("Trial saved to: {}", dir.display());
        }
        None => {
            println!("Session ended without a recording.");
        }
    }

    Ok(())
}
