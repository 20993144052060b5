//! Dominant-hue estimation from a hue/saturation histogram.
//!
//! Used by the color-pick workflow: the user frames the object (or a
//! sub-rectangle of it) and the dominant histogram bin suggests the
//! hue band to track.

use kinetrack_trial_model::sample::{HueRange, MAX_HUE};

use crate::color::{hue_to_rgb, Rgb};
use crate::frame::BgrFrame;
use crate::hsv::bgr_to_hsv;

/// Hue bins spanning [0, 179] in intervals of 6.
const HUE_BINS: usize = 30;
const HUE_INTERVAL: usize = 6;

/// Saturation bins spanning [0, 255] in intervals of 8.
const SAT_BINS: usize = 32;
const SAT_INTERVAL: usize = 8;

/// Half-width of the suggested hue band around the dominant hue.
const SUGGESTED_SPREAD: u8 = 5;

/// A rectangular region of a frame, clamped at use.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The dominant hue of a frame region and its feedback swatch.
#[derive(Debug, Clone, Copy)]
pub struct DominantHue {
    /// Dominant hue in the 8-bit encoding [0, 179].
    pub hue: u8,
    /// Full-saturation swatch color for user feedback.
    pub swatch: Rgb,
}

impl DominantHue {
    /// The hue band to track, centered on the dominant hue.
    pub fn suggested_range(&self) -> HueRange {
        HueRange::around(self.hue, SUGGESTED_SPREAD)
    }
}

/// Find the dominant hue of a frame (or of a sub-rectangle).
///
/// Builds a 2D hue/saturation histogram and takes the hue of the
/// fullest bin. Returns `None` for an empty region.
pub fn dominant_hue(frame: &BgrFrame, region: Option<Region>) -> Option<DominantHue> {
    let (x0, y0, x1, y1) = match region {
        Some(r) => (
            r.x.min(frame.width()),
            r.y.min(frame.height()),
            (r.x + r.width).min(frame.width()),
            (r.y + r.height).min(frame.height()),
        ),
        None => (0, 0, frame.width(), frame.height()),
    };
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let mut bins = [[0u32; SAT_BINS]; HUE_BINS];
    for y in y0..y1 {
        for x in x0..x1 {
            let [b, g, r] = frame.bgr_at(x, y);
            let hsv = bgr_to_hsv(b, g, r);
            let h_bin = (hsv.h as usize / HUE_INTERVAL).min(HUE_BINS - 1);
            let s_bin = (hsv.s as usize / SAT_INTERVAL).min(SAT_BINS - 1);
            bins[h_bin][s_bin] += 1;
        }
    }

    let mut best = (0usize, 0u32);
    for (h_bin, sats) in bins.iter().enumerate() {
        for &count in sats.iter() {
            if count > best.1 {
                best = (h_bin, count);
            }
        }
    }

    let hue = ((best.0 * HUE_INTERVAL) as u8).min(MAX_HUE);
    Some(DominantHue {
        hue,
        swatch: hue_to_rgb(hue),
    })
}
