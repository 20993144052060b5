//! Per-frame sample types and detection thresholds.
//!
//! A `BlobSample` is what the detector reports for one frame; a
//! `PositionSample` is what the recorder keeps. Zero area is the
//! "not detected" sentinel, never an error; consumers must branch on
//! `detected()` before trusting the centroid.

use serde::{Deserialize, Serialize};

/// Lower saturation/value bound for color-intensity thresholding.
pub const MED_SV: u8 = 110;

/// Upper saturation/value bound for color-intensity thresholding.
pub const MAX_SV: u8 = 255;

/// Largest valid hue in the 8-bit HSV encoding (hue degrees halved).
pub const MAX_HUE: u8 = 179;

/// An inclusive band of hue values selecting the tracked color.
///
/// Saturation/value bounds are fixed constants ([`MED_SV`], [`MAX_SV`])
/// and are not part of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueRange {
    /// Low end of the band, in [0, 179].
    pub low: u8,
    /// High end of the band, in [0, 179]. Always >= `low`.
    pub high: u8,
}

impl HueRange {
    /// Create a hue range, rejecting out-of-bounds or inverted bands.
    pub fn new(low: u8, high: u8) -> Result<Self, HueRangeError> {
        if low > MAX_HUE {
            return Err(HueRangeError::OutOfBounds { value: low });
        }
        if high > MAX_HUE {
            return Err(HueRangeError::OutOfBounds { value: high });
        }
        if low > high {
            return Err(HueRangeError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    /// A band of `spread` hues on either side of `hue`, clamped to the
    /// valid domain. Used to suggest a range from a dominant-hue pick.
    pub fn around(hue: u8, spread: u8) -> Self {
        Self {
            low: hue.saturating_sub(spread),
            high: hue.saturating_add(spread).min(MAX_HUE),
        }
    }

    /// Whether a hue value falls inside this band.
    pub fn contains(&self, hue: u8) -> bool {
        self.low <= hue && hue <= self.high
    }
}

/// Errors from hue range construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HueRangeError {
    #[error("hue {value} exceeds maximum of {MAX_HUE}")]
    OutOfBounds { value: u8 },

    #[error("inverted hue range: low {low} > high {high}")]
    Inverted { low: u8, high: u8 },
}

/// One frame's blob detection result, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobSample {
    /// Centroid X in pixels. Meaningless unless `detected()`.
    pub x: f64,
    /// Centroid Y in pixels. Meaningless unless `detected()`.
    pub y: f64,
    /// Mask area in pixels squared. Zero means "not detected".
    pub area: f64,
}

impl BlobSample {
    /// The sentinel returned when no pixel matched the hue band.
    pub const MISS: BlobSample = BlobSample {
        x: 0.0,
        y: 0.0,
        area: 0.0,
    };

    pub fn new(x: f64, y: f64, area: f64) -> Self {
        Self { x, y, area }
    }

    /// Whether the detector found the object in this frame.
    pub fn detected(&self) -> bool {
        self.area > 0.0
    }

    /// Centroid as a point.
    pub fn centroid(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A raw recorded position with its timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// X position in pixels.
    pub x: f64,
    /// Y position in pixels.
    pub y: f64,
    /// Seconds elapsed since the previous sample.
    pub dt: f64,
}

impl PositionSample {
    pub fn new(x: f64, y: f64, dt: f64) -> Self {
        Self { x, y, dt }
    }

    /// The synthetic zero anchor every recording starts with.
    pub const ANCHOR: PositionSample = PositionSample {
        x: 0.0,
        y: 0.0,
        dt: 0.0,
    };
}

/// A 2D point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_range_accepts_valid_band() {
        let range = HueRange::new(2, 6).unwrap();
        assert!(range.contains(2));
        assert!(range.contains(6));
        assert!(!range.contains(7));
    }

    #[test]
    fn test_hue_range_rejects_inverted_band() {
        assert_eq!(
            HueRange::new(10, 5),
            Err(HueRangeError::Inverted { low: 10, high: 5 })
        );
    }

    #[test]
    fn test_hue_range_rejects_out_of_bounds() {
        assert_eq!(
            HueRange::new(0, 180),
            Err(HueRangeError::OutOfBounds { value: 180 })
        );
    }

    #[test]
    fn test_hue_range_around_clamps() {
        let low_end = HueRange::around(2, 5);
        assert_eq!((low_end.low, low_end.high), (0, 7));

        let high_end = HueRange::around(177, 5);
        assert_eq!((high_end.low, high_end.high), (172, 179));
    }

    #[test]
    fn test_blob_miss_is_not_detected() {
        assert!(!BlobSample::MISS.detected());
        assert!(BlobSample::new(10.0, 20.0, 42.0).detected());
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_sample_roundtrip() {
        let sample = PositionSample::new(12.5, 7.25, 0.033);
        let json = serde_json::to_string(&sample).unwrap();
        let parsed: PositionSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, parsed);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_around_always_yields_a_valid_band(hue in 0u8..=MAX_HUE, spread in 0u8..=90) {
                let range = HueRange::around(hue, spread);
                prop_assert!(range.low <= range.high);
                prop_assert!(range.high <= MAX_HUE);
                prop_assert!(range.contains(hue));
            }

            #[test]
            fn prop_new_accepts_exactly_ordered_in_bounds_pairs(low in 0u8..=255, high in 0u8..=255) {
                let result = HueRange::new(low, high);
                let valid = low <= high && high <= MAX_HUE;
                prop_assert_eq!(result.is_ok(), valid);
            }
        }
    }
}
