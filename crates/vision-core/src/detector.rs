//! Hue-band blob detection via image moments.
//!
//! A frame is converted to HSV, thresholded to a binary mask, and the
//! mask's zeroth and first-order moments give the blob's area and
//! centroid. "Not found" is a zero-area sample, never an error.

use image::GrayImage;

use kinetrack_trial_model::sample::{BlobSample, HueRange, MAX_SV, MED_SV};

use crate::frame::BgrFrame;
use crate::hsv::bgr_to_hsv;

/// Detect the largest hue-band blob in a frame.
///
/// Thresholds pixels whose hue lies inside `range` and whose
/// saturation and value both lie in `[MED_SV, MAX_SV]`, then computes
/// raw image moments over the mask: the zeroth moment is the area
/// (count of set pixels), the first-order moments are the coordinate
/// sums. Centroid = (Σx/area, Σy/area) when area > 0, else the
/// zero-area miss sentinel.
pub fn detect(frame: &BgrFrame, range: HueRange) -> BlobSample {
    let mut area = 0.0_f64;
    let mut sum_x = 0.0_f64;
    let mut sum_y = 0.0_f64;

    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let [b, g, r] = frame.bgr_at(x, y);
            if matches_threshold(b, g, r, range) {
                area += 1.0;
                sum_x += x as f64;
                sum_y += y as f64;
            }
        }
    }

    if area > 0.0 {
        BlobSample::new(sum_x / area, sum_y / area, area)
    } else {
        BlobSample::MISS
    }
}

/// Render the binary threshold mask for presentation/debugging.
///
/// Set pixels are white, the rest black. Detection itself never needs
/// this buffer; it exists so callers can show what the detector sees.
pub fn threshold_mask(frame: &BgrFrame, range: HueRange) -> GrayImage {
    let mut mask = GrayImage::new(frame.width(), frame.height());
    for (x, y, pixel) in mask.enumerate_pixels_mut() {
        let [b, g, r] = frame.bgr_at(x, y);
        *pixel = if matches_threshold(b, g, r, range) {
            image::Luma([255])
        } else {
            image::Luma([0])
        };
    }
    mask
}

fn matches_threshold(b: u8, g: u8, r: u8, range: HueRange) -> bool {
    let hsv = bgr_to_hsv(b, g, r);
    range.contains(hsv.h) && (MED_SV..=MAX_SV).contains(&hsv.s) && (MED_SV..=MAX_SV).contains(&hsv.v)
}
