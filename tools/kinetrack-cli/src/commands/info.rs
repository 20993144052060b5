//! Show trial information.

use std::path::PathBuf;

use kinetrack_trial_model::trial::LoadedTrial;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let trial =
        LoadedTrial::load(&path).map_err(|e| anyhow::anyhow!("Failed to load trial: {e}"))?;

    let t = &trial.trial;

    println!("Trial: {}", t.name);
    println!("  ID: {}", t.id);
    println!("  Created: {}", t.created_at);
    println!();

    println!("Recording:");
    println!(
        "  Resolution: {}x{} @ {}fps",
        t.recording.capture_width, t.recording.capture_height, t.recording.fps
    );
    println!(
        "  Hue band: [{}, {}]",
        t.recording.hue_range.low, t.recording.hue_range.high
    );
    println!("  Full video: {}", t.recording.full_video);
    println!("  Conversion factor: {}", t.recording.conversion_factor);
    println!();

    let track = &t.track;
    println!("Track:");
    println!("  Frames: {}", track.num_frames());
    println!("  Duration: {:.2}s", track.duration_secs());
    println!("  Distance: {:.1} px", track.total_distance());

    let top_speed = track
        .metrics
        .v_net
        .iter()
        .skip(4)
        .cloned()
        .fold(0.0_f64, f64::max);
    println!("  Top speed: {top_speed:.1} px/s");

    Ok(())
}
