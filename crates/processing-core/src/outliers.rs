//! Per-metric outlier ranges for visualization scaling.
//!
//! Replay colors each metric readout by how extreme the current value
//! is relative to that metric's own observed range, computed once over
//! the whole sealed track. Positive and negative samples get
//! independent ranges, and the leading placeholder entries are skipped
//! (position isn't meaningful until the first real sample, velocity
//! until the second, acceleration until the third).

use kinetrack_trial_model::track::{MetricKind, TrackMetrics};

/// Which sign class of samples a range covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

/// Observed (min, max) for one sign class of one metric.
///
/// For positives this is the ordinary (smallest, largest). For
/// negatives the pair is (closest-to-zero, most-negative) — the
/// ordering the color scaler was written against.
pub type Range = (f64, f64);

/// Compute the outlier range of one metric's values.
///
/// Returns `None` when no sample of the requested sign exists past
/// the placeholder prefix.
pub fn outlier_range(values: &[f64], kind: MetricKind, sign: Sign) -> Option<Range> {
    let offset = kind.placeholder_len().min(values.len());
    let candidates = &values[offset..];

    match sign {
        Sign::Positive => {
            let mut iter = candidates.iter().copied().filter(|v| *v > 0.0);
            let first = iter.next()?;
            let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
            Some((min, max))
        }
        Sign::Negative => {
            let mut iter = candidates.iter().copied().filter(|v| *v <= 0.0);
            let first = iter.next()?;
            let (closest, extreme) =
                iter.fold((first, first), |(lo, hi), v| (lo.max(v), hi.min(v)));
            Some((closest, extreme))
        }
    }
}

/// Outlier ranges for one metric, both sign classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricOutliers {
    pub pos: Option<Range>,
    pub neg: Option<Range>,
}

/// Precomputed ranges for every colored metric of a sealed track.
///
/// Net magnitudes are Euclidean norms, so only their positive range
/// exists.
#[derive(Debug, Clone, Default)]
pub struct OutlierTable {
    pub v_x: MetricOutliers,
    pub v_y: MetricOutliers,
    pub a_x: MetricOutliers,
    pub a_y: MetricOutliers,
    pub v_net: MetricOutliers,
    pub a_net: MetricOutliers,
}

impl OutlierTable {
    /// Build the table from sealed metrics. Runs once before playback.
    pub fn from_metrics(metrics: &TrackMetrics) -> Self {
        let both = |kind: MetricKind| MetricOutliers {
            pos: outlier_range(metrics.get(kind), kind, Sign::Positive),
            neg: outlier_range(metrics.get(kind), kind, Sign::Negative),
        };
        let pos_only = |kind: MetricKind| MetricOutliers {
            pos: outlier_range(metrics.get(kind), kind, Sign::Positive),
            neg: None,
        };

        Self {
            v_x: both(MetricKind::VX),
            v_y: both(MetricKind::VY),
            a_x: both(MetricKind::AX),
            a_y: both(MetricKind::AY),
            v_net: pos_only(MetricKind::VNet),
            a_net: pos_only(MetricKind::ANet),
        }
    }

    /// Ranges for a metric kind; `None` for kinds that aren't colored.
    pub fn get(&self, kind: MetricKind) -> Option<&MetricOutliers> {
        match kind {
            MetricKind::VX => Some(&self.v_x),
            MetricKind::VY => Some(&self.v_y),
            MetricKind::AX => Some(&self.a_x),
            MetricKind::AY => Some(&self.a_y),
            MetricKind::VNet => Some(&self.v_net),
            MetricKind::ANet => Some(&self.a_net),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_range_skips_velocity_placeholders() {
        // Indices 0 and 1 are placeholders for velocity metrics.
        let values = [0.0, 99.0, 3.0, 7.0, 5.0];
        let range = outlier_range(&values, MetricKind::VX, Sign::Positive).unwrap();
        assert_eq!(range, (3.0, 7.0));
    }

    #[test]
    fn test_acceleration_skips_three() {
        let values = [0.0, 50.0, 60.0, 2.0, 4.0];
        let range = outlier_range(&values, MetricKind::AX, Sign::Positive).unwrap();
        assert_eq!(range, (2.0, 4.0));
    }

    #[test]
    fn test_negative_range_ordering() {
        // (closest-to-zero, most-negative), zero counted as negative.
        let values = [0.0, 0.0, -1.0, -9.0, -4.0];
        let range = outlier_range(&values, MetricKind::VX, Sign::Negative).unwrap();
        assert_eq!(range, (-1.0, -9.0));
    }

    #[test]
    fn test_empty_candidate_set_is_none() {
        let values = [0.0, 0.0, 5.0, 6.0];
        assert!(outlier_range(&values, MetricKind::VX, Sign::Negative).is_none());

        let all_placeholder = [0.0, 1.0];
        assert!(outlier_range(&all_placeholder, MetricKind::AX, Sign::Positive).is_none());
    }

    #[test]
    fn test_table_has_no_negative_net_ranges() {
        let metrics = TrackMetrics {
            x_pos: vec![0.0; 5],
            y_pos: vec![0.0; 5],
            v_x: vec![0.0, 0.0, 1.0, -2.0, 3.0],
            v_y: vec![0.0; 5],
            a_x: vec![0.0, 0.0, 0.0, -4.0, 5.0],
            a_y: vec![0.0; 5],
            v_net: vec![0.0, 0.0, 1.0, 2.0, 3.0],
            a_net: vec![0.0, 0.0, 1.0, 2.0, 3.0],
            distance: vec![0.0; 5],
            time: vec![0.0, 1.0, 1.0, 1.0, 1.0],
        };

        let table = OutlierTable::from_metrics(&metrics);
        assert!(table.v_net.neg.is_none());
        assert!(table.a_net.neg.is_none());
        assert_eq!(table.v_x.pos, Some((1.0, 3.0)));
        assert_eq!(table.v_x.neg, Some((-2.0, -2.0)));
        assert_eq!(table.a_x.neg, Some((-4.0, -4.0)));
        assert!(table.get(MetricKind::XPos).is_none());
    }
}
