//! Measure the reference object and compute a conversion factor.

use std::path::PathBuf;

use kinetrack_capture_engine::calibrate::CalibrationSession;
use kinetrack_capture_engine::source::ImageDirSource;
use kinetrack_trial_model::sample::HueRange;
use kinetrack_vision_core::calibrate::Calibration;

pub async fn run(
    source: PathBuf,
    diameter: f64,
    hue_low: u8,
    hue_high: u8,
    fps: u32,
) -> anyhow::Result<()> {
    let hue_range = HueRange::new(hue_low, hue_high)
        .map_err(|e| anyhow::anyhow!("Invalid hue thresholds: {e}"))?;

    println!("Measuring reference object from: {}", source.display());

    let source = ImageDirSource::new(&source)?;
    let (session, _handle) = CalibrationSession::new(Box::new(source), hue_range, fps);
    let measurement = session.run().await?;

    println!(
        "  Frames: {} seen, {} with the object detected",
        measurement.frames_seen, measurement.frames_detected
    );

    let Some(area) = measurement.reference_area else {
        anyhow::bail!("Reference object was never detected; adjust the hue thresholds");
    };
    println!("  Reference area: {area:.1} px^2");

    let mut calibration = Calibration::default();
    let factor = calibration.calibrate(area, diameter)?;

    println!("  Object diameter: {diameter:.2} cm");
    println!("  Conversion factor: {factor:.6} m/px");
    println!("\nPass --conversion-factor {factor:.6} to `kinetrack record`.");

    Ok(())
}
