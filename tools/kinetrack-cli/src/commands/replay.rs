//! Replay a recorded trial with overlays.

use std::path::PathBuf;

use kinetrack_common::config::AppConfig;
use kinetrack_replay_engine::player::{FrameSink, NullSink, PngDirSink, ReplayPlayer};
use kinetrack_replay_engine::renderer::{DisplayMode, ReplayConfig, ReplayEngine};
use kinetrack_trial_model::trial::LoadedTrial;
use kinetrack_vision_core::color::Rgb;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    path: PathBuf,
    mode: String,
    speed: Option<u16>,
    marker_radius: Option<u32>,
    color: String,
    out: Option<PathBuf>,
    loops: usize,
) -> anyhow::Result<()> {
    let app_config = AppConfig::load();
    let speed = speed.unwrap_or(app_config.replay.playback_slider);
    let marker_radius = marker_radius.unwrap_or(app_config.replay.marker_radius);

    let mode = match mode.as_str() {
        "marker" => DisplayMode::Marker,
        "line" => DisplayMode::Polyline,
        "v-path" => DisplayMode::VelocityPath,
        "a-path" => DisplayMode::AccelerationPath,
        other => anyhow::bail!("Unknown mode '{other}' (expected marker|line|v-path|a-path)"),
    };

    let object_color = match color.as_str() {
        "red" => Rgb::RED,
        "yellow" => Rgb::YELLOW,
        "green" => Rgb::GREEN,
        "blue" => Rgb::BLUE,
        other => anyhow::bail!("Unknown color '{other}' (expected red|yellow|green|blue)"),
    };

    if !(1..=30).contains(&marker_radius) {
        anyhow::bail!("Marker radius must be in [1, 30], got {marker_radius}");
    }

    let trial =
        LoadedTrial::load(&path).map_err(|e| anyhow::anyhow!("Failed to load trial: {e}"))?;
    println!("Replaying trial: {}", trial.trial.name);
    println!(
        "  {} frames, {:.2}s recorded, {:.1} px traveled",
        trial.trial.track.num_frames(),
        trial.trial.track.duration_secs(),
        trial.trial.track.total_distance()
    );

    let config = ReplayConfig {
        mode,
        marker_radius,
        object_color,
        playback_slider: speed,
    };
    let engine = ReplayEngine::load(&trial, config)
        .map_err(|e| anyhow::anyhow!("Failed to prepare replay: {e}"))?;

    let sink: Box<dyn FrameSink> = match &out {
        Some(dir) => {
            println!("  Writing frames to: {}", dir.display());
            Box::new(PngDirSink::new(dir)?)
        }
        None => Box::new(NullSink),
    };

    let (player, _handle) = ReplayPlayer::new(engine, sink, Some(loops.max(1)));
    let summary = player.run().await?;

    println!(
        "\nReplay complete: {} steps over {} loop(s).",
        summary.steps_rendered, summary.loops_completed
    );

    Ok(())
}
