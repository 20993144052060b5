//! Suggest a hue band from an image's dominant color.

use std::path::PathBuf;

use kinetrack_vision_core::frame::BgrFrame;
use kinetrack_vision_core::histogram::{dominant_hue, Region};

pub fn run(image: PathBuf, rect: Option<Vec<u32>>) -> anyhow::Result<()> {
    let frame = BgrFrame::load(&image)?;

    let region = rect.map(|r| Region {
        x: r[0],
        y: r[1],
        width: r[2],
        height: r[3],
    });

    let Some(dominant) = dominant_hue(&frame, region) else {
        anyhow::bail!("Selected region is empty");
    };

    let range = dominant.suggested_range();
    println!("Dominant hue: {}", dominant.hue);
    println!(
        "Swatch (RGB): #{:02x}{:02x}{:02x}",
        dominant.swatch.r, dominant.swatch.g, dominant.swatch.b
    );
    println!(
        "Suggested thresholds: --hue-low {} --hue-high {}",
        range.low, range.high
    );

    Ok(())
}
