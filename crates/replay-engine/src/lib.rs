//! Kinetrack Replay Engine
//!
//! Deterministic, frame-synchronous replay of a sealed trial:
//!
//! ```text
//! trial dir ──┐
//!             ├── ReplayEngine::step() ── overlay frame + readouts
//! track ──────┘          │
//!                        ├── ReplayPlayer (pacing, play/pause/quit)
//!                        │
//!                        ▼
//!                   FrameSink (PNG directory, ...)
//! ```
//!
//! The engine composes one frame per step — trajectory overlay in the
//! selected display mode plus real-unit, outlier-colored readouts.
//! The player adds wall-clock pacing via the inverse speed-slider
//! mapping and consumes discrete playback commands.

pub mod draw;
pub mod player;
pub mod renderer;

pub use player::{FrameSink, NullSink, PlayerHandle, PngDirSink, ReplayPlayer};
pub use renderer::{DisplayMode, ReplayConfig, ReplayEngine};
