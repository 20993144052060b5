//! Kinetrack Processing Core
//!
//! Pure kinematics derivation:
//! - **Recorder:** O(1) sample accumulation, sealed into a Track by a
//!   single finalize pass (velocity, acceleration, net magnitudes,
//!   trapezoidal distance)
//! - **Outliers:** Per-metric, per-sign observed ranges used to
//!   normalize color-coded visualization
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod outliers;
pub mod recorder;

pub use outliers::OutlierTable;
pub use recorder::TrackRecorder;
