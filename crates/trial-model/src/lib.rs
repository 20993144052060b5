//! Kinetrack Trial Model
//!
//! Defines the core data contracts for Kinetrack trials:
//! - **Samples:** Hue ranges, per-frame blob detections, raw positions
//! - **Tracks:** Sealed recordings with their derived metric sequences
//! - **Trials:** Top-level metadata and the on-disk trial bundle
//!
//! All positions are in pixel space; conversion to real units happens
//! at presentation time via the recorded conversion factor.

pub mod sample;
pub mod track;
pub mod trial;

pub use sample::*;
pub use track::*;
pub use trial::*;
