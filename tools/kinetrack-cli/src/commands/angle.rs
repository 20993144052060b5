//! Three-marker angle measurement.

use std::path::PathBuf;

use kinetrack_capture_engine::angle::{AngleSession, MarkerBands};
use kinetrack_capture_engine::source::ImageDirSource;
use kinetrack_trial_model::sample::HueRange;

pub async fn run(
    source: PathBuf,
    red: (u8, u8),
    yellow: (u8, u8),
    blue: (u8, u8),
    fps: u32,
) -> anyhow::Result<()> {
    let band = |label: &str, (low, high): (u8, u8)| {
        HueRange::new(low, high).map_err(|e| anyhow::anyhow!("Invalid {label} band: {e}"))
    };
    let bands = MarkerBands {
        red: band("red", red)?,
        yellow: band("yellow", yellow)?,
        blue: band("blue", blue)?,
    };

    println!("Measuring marker angle from: {}", source.display());

    let source = ImageDirSource::new(&source)?;
    let (session, _handle) = AngleSession::new(Box::new(source), bands, fps);
    let report = session.run().await?;

    println!("  Frames measured: {}", report.frames_measured);
    match report.last_degrees {
        Some(degrees) => println!("  Last angle: {degrees:.2} degrees"),
        None => println!("  Last angle: N/A"),
    }
    match report.max_degrees {
        Some(degrees) => println!("  Max angle: {degrees:.2} degrees"),
        None => println!("  Max angle: N/A"),
    }

    Ok(())
}
