//! Three-marker angle measurement via the law of cosines.
//!
//! Combines three simultaneous marker centroids into a triangle and
//! reports the included angle at the first vertex. Degenerate
//! geometry yields `None` rather than an error or a NaN.

use kinetrack_trial_model::sample::Point;

/// Measure the angle at vertex `a` between edges a-b and a-c, in
/// degrees.
///
/// Returns `None` when any edge has zero length (coincident markers)
/// or when float drift pushes the cosine argument out of acos's
/// domain, leaving the angle outside [0, 360]. Each call is
/// independent; no state persists between measurements.
pub fn measure_angle(a: Point, b: Point, c: Point) -> Option<f64> {
    let d_ab = a.distance_to(&b);
    let d_ac = a.distance_to(&c);
    let d_bc = b.distance_to(&c);

    if d_ab == 0.0 || d_ac == 0.0 || d_bc == 0.0 {
        return None;
    }

    let cos_arg = (d_ab.powi(2) + d_ac.powi(2) - d_bc.powi(2)) / (2.0 * d_ab * d_ac);
    let degs = cos_arg.acos().to_degrees();

    // NaN from an out-of-domain acos fails this containment check.
    if (0.0..=360.0).contains(&degs) {
        Some(degs)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_right_angle() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let c = Point::new(0.0, 10.0);
        let angle = measure_angle(a, b, c).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line_is_180() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(5.0, 0.0);
        let c = Point::new(-5.0, 0.0);
        let angle = measure_angle(a, b, c).unwrap();
        assert!((angle - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_equilateral_is_60() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(0.5, 3.0_f64.sqrt() / 2.0);
        let angle = measure_angle(a, b, c).unwrap();
        assert!((angle - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_markers_are_not_available() {
        let p = Point::new(3.0, 4.0);
        let q = Point::new(7.0, 1.0);
        assert_eq!(measure_angle(p, p, q), None);
        assert_eq!(measure_angle(p, q, p), None);
        assert_eq!(measure_angle(q, p, p), None);
        assert_eq!(measure_angle(p, p, p), None);
    }

    proptest! {
        #[test]
        fn prop_angle_is_in_range_or_none(
            ax in -1e3_f64..1e3, ay in -1e3_f64..1e3,
            bx in -1e3_f64..1e3, by in -1e3_f64..1e3,
            cx in -1e3_f64..1e3, cy in -1e3_f64..1e3,
        ) {
            let angle = measure_angle(
                Point::new(ax, ay),
                Point::new(bx, by),
                Point::new(cx, cy),
            );
            if let Some(degs) = angle {
                prop_assert!((0.0..=360.0).contains(&degs));
            }
        }
    }
}
