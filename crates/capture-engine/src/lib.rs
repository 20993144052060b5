//! Kinetrack Capture Engine
//!
//! Live session orchestration over an exclusively owned frame source:
//!
//! - **Recording:** track a hue band frame-by-frame, accumulate
//!   position samples, seal and persist the trial on stop
//! - **Calibration:** measure the reference object's pixel footprint
//!   under adjustable thresholds
//! - **Angle:** three-marker law-of-cosines measurement with live
//!   band adjustment
//!
//! Each session runs one cooperative loop: drain pending commands,
//! process one frame, sleep until the next tick. Commands come from a
//! presentation layer over a channel; this crate has no UI types.

pub mod angle;
pub mod calibrate;
pub mod session;
pub mod source;

pub use angle::{AngleSession, MarkerBands};
pub use calibrate::CalibrationSession;
pub use session::{RecordingSession, SessionCommand, SessionConfig, SessionHandle};
pub use source::{FrameSource, ImageDirSource, SyntheticSource};
