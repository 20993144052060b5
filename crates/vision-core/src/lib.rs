//! Kinetrack Vision Core
//!
//! Pixel-space computation for the tracker:
//! - **Frames:** Owned BGR buffers with a PNG boundary
//! - **Detection:** Hue-band thresholding and image moments
//! - **Calibration:** Reference-object pixel-to-real-unit scaling
//! - **Angle:** Three-marker law-of-cosines measurement
//! - **Color:** Metric-to-color scaling and hue swatches
//!
//! Everything here is a pure function of its inputs; presenting masks
//! or swatches to a user is a caller concern.

pub mod angle;
pub mod calibrate;
pub mod color;
pub mod detector;
pub mod frame;
pub mod histogram;
pub mod hsv;

pub use angle::measure_angle;
pub use calibrate::Calibration;
pub use detector::detect;
pub use frame::BgrFrame;
