//! Pixel-to-real-unit calibration.
//!
//! The reference object is treated as a circle: its pixel footprint
//! gives a pixel radius, its known physical diameter gives a radius in
//! meters, and the ratio is the conversion factor applied to every
//! downstream pixel-space metric.

use std::f64::consts::PI;

use kinetrack_common::error::{KinetrackError, KinetrackResult};

/// Empirically reasonable pixel footprint of a ping-pong ball held at
/// arm's length from a webcam. Used as the default reference area
/// until a live calibration pass measures one.
pub const DEFAULT_REFERENCE_AREA: f64 = 6650.0;

/// Accepted physical diameter bounds, in centimeters.
pub const MIN_DIAMETER_CM: f64 = 1.0;
pub const MAX_DIAMETER_CM: f64 = 20.0;

/// Pixel-to-real-unit conversion state.
///
/// The factor stays at the identity (1.0) until a calibration
/// succeeds; a rejected calibration leaves the previous factor intact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    conversion_factor: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            conversion_factor: 1.0,
        }
    }
}

impl Calibration {
    /// Restore a calibration from a persisted factor.
    pub fn from_factor(conversion_factor: f64) -> Self {
        Self { conversion_factor }
    }

    /// The current meters-per-pixel factor.
    pub fn conversion_factor(&self) -> f64 {
        self.conversion_factor
    }

    /// Derive and store the conversion factor from a reference object.
    ///
    /// Returns the new factor, or an error (leaving the stored factor
    /// unchanged) when the diameter is outside [1, 20] cm or the pixel
    /// area is non-positive.
    pub fn calibrate(
        &mut self,
        reference_area_px: f64,
        real_diameter_cm: f64,
    ) -> KinetrackResult<f64> {
        let factor = conversion_factor(reference_area_px, real_diameter_cm)?;
        self.conversion_factor = factor;
        Ok(factor)
    }

    /// Convert a pixel-space value to real units.
    ///
    /// The single conversion entry point for every consumer of
    /// pixel-space metrics.
    pub fn to_real_units(&self, value_px: f64) -> f64 {
        value_px * self.conversion_factor
    }
}

/// Pure conversion-factor computation.
///
/// `pixel_radius = sqrt(area / π)`, `real_radius_m = diameter_cm / 200`,
/// factor = real radius over pixel radius.
pub fn conversion_factor(reference_area_px: f64, real_diameter_cm: f64) -> KinetrackResult<f64> {
    if !real_diameter_cm.is_finite()
        || !(MIN_DIAMETER_CM..=MAX_DIAMETER_CM).contains(&real_diameter_cm)
    {
        return Err(KinetrackError::calibration(format!(
            "object diameter must be between {MIN_DIAMETER_CM} and {MAX_DIAMETER_CM} cm, got {real_diameter_cm}"
        )));
    }
    if !(reference_area_px > 0.0) {
        return Err(KinetrackError::calibration(format!(
            "reference area must be positive, got {reference_area_px} px^2"
        )));
    }

    let radius_in_pixels = (reference_area_px / PI).sqrt();
    let radius_in_m = real_diameter_cm / 200.0;
    Ok(radius_in_m / radius_in_pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_calibration_is_deterministic() {
        let a = conversion_factor(DEFAULT_REFERENCE_AREA, 4.0).unwrap();
        let b = conversion_factor(DEFAULT_REFERENCE_AREA, 4.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_known_factor() {
        // Area π px^2 -> pixel radius exactly 1, so the factor equals
        // the real radius in meters.
        let factor = conversion_factor(std::f64::consts::PI, 10.0).unwrap();
        assert!((factor - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_out_of_range_diameter() {
        assert!(conversion_factor(6650.0, 0.5).is_err());
        assert!(conversion_factor(6650.0, 25.0).is_err());
        assert!(conversion_factor(6650.0, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_non_positive_area() {
        assert!(conversion_factor(0.0, 4.0).is_err());
        assert!(conversion_factor(-10.0, 4.0).is_err());
    }

    #[test]
    fn test_failed_calibration_keeps_previous_factor() {
        let mut calibration = Calibration::default();
        calibration.calibrate(6650.0, 4.0).unwrap();
        let before = calibration.conversion_factor();

        assert!(calibration.calibrate(0.0, 4.0).is_err());
        assert_eq!(calibration.conversion_factor(), before);
    }

    #[test]
    fn test_identity_until_calibrated() {
        let calibration = Calibration::default();
        assert_eq!(calibration.to_real_units(123.0), 123.0);
    }

    proptest! {
        #[test]
        fn prop_to_real_units_is_linear(
            area in 1.0_f64..1e7,
            diameter in MIN_DIAMETER_CM..MAX_DIAMETER_CM,
            v in -1e6_f64..1e6,
        ) {
            let mut calibration = Calibration::default();
            calibration.calibrate(area, diameter).unwrap();
            let double = calibration.to_real_units(2.0 * v);
            let single = calibration.to_real_units(v);
            prop_assert!((double - 2.0 * single).abs() <= 1e-9 * single.abs().max(1.0));
        }
    }
}
