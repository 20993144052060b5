//! Trial metadata and the on-disk trial bundle.
//!
//! A trial is one complete recording session's persisted artifacts:
//! the background image, optionally every captured frame, and the
//! sealed track with its derived metrics.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sample::HueRange;
use crate::track::Track;

/// Top-level trial file (`meta/trial.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    /// Schema version.
    pub version: String,

    /// Human-readable trial name.
    pub name: String,

    /// Unique trial identifier (UUID).
    pub id: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Recording configuration that was used.
    pub recording: RecordingInfo,

    /// The sealed track: raw samples plus derived metrics.
    pub track: Track,
}

/// Configuration captured at recording time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingInfo {
    /// Capture resolution in pixels.
    pub capture_width: u32,
    pub capture_height: u32,

    /// Target frame rate during capture.
    pub fps: u32,

    /// Hue band the object was tracked with.
    pub hue_range: HueRange,

    /// Whether every frame was persisted (vs. background-only).
    pub full_video: bool,

    /// Pixel-to-real-unit conversion factor at recording time.
    /// 1.0 means uncalibrated (raw pixels).
    #[serde(default = "default_conversion_factor")]
    pub conversion_factor: f64,
}

fn default_conversion_factor() -> f64 {
    1.0
}

/// A trial loaded from (or bound to) a directory on disk.
#[derive(Debug, Clone)]
pub struct LoadedTrial {
    /// Filesystem path to the trial directory.
    pub root: PathBuf,

    /// Trial metadata and track.
    pub trial: Trial,
}

impl Trial {
    /// Create trial metadata around a sealed track.
    pub fn new(
        name: impl Into<String>,
        recording: RecordingInfo,
        track: Track,
    ) -> Self {
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            id: uuid_v4(),
            created_at: chrono::Utc::now().to_rfc3339(),
            recording,
            track,
        }
    }
}

impl LoadedTrial {
    /// Load a trial from a directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, TrialError> {
        let root = root.as_ref().to_path_buf();

        let trial_path = root.join("meta").join("trial.json");
        let trial_json =
            std::fs::read_to_string(&trial_path).map_err(|e| TrialError::IoError {
                path: trial_path.clone(),
                source: e,
            })?;

        let trial: Trial =
            serde_json::from_str(&trial_json).map_err(|e| TrialError::ParseError {
                path: trial_path,
                source: e,
            })?;

        if !trial.track.metrics.is_consistent() {
            return Err(TrialError::ValidationError {
                message: "derived metric sequences have unequal lengths".to_string(),
            });
        }

        Ok(Self { root, trial })
    }

    /// Save trial metadata and track to disk.
    pub fn save(&self) -> Result<(), TrialError> {
        let meta_dir = self.root.join("meta");
        std::fs::create_dir_all(&meta_dir).map_err(|e| TrialError::IoError {
            path: meta_dir.clone(),
            source: e,
        })?;

        let trial_path = meta_dir.join("trial.json");
        let trial_json =
            serde_json::to_string_pretty(&self.trial).map_err(|e| TrialError::ParseError {
                path: trial_path.clone(),
                source: e,
            })?;
        std::fs::write(&trial_path, trial_json).map_err(|e| TrialError::IoError {
            path: trial_path,
            source: e,
        })?;

        Ok(())
    }

    /// Bind a trial to a new directory on disk and persist it.
    pub fn create(
        root: impl AsRef<Path>,
        trial: Trial,
    ) -> Result<Self, TrialError> {
        let root = root.as_ref().to_path_buf();

        std::fs::create_dir_all(root.join("meta")).map_err(|e| TrialError::IoError {
            path: root.join("meta"),
            source: e,
        })?;

        let loaded = Self { root, trial };
        loaded.save()?;
        Ok(loaded)
    }

    /// Path of the background image (the first captured frame).
    pub fn background_path(&self) -> PathBuf {
        self.root.join("background.png")
    }

    /// Path of the n-th captured frame, n >= 1.
    pub fn frame_path(&self, n: usize) -> PathBuf {
        self.root.join(format!("frame_{n}.png"))
    }

    /// Validate that all image files the trial references exist.
    pub fn validate_sources(&self) -> Vec<String> {
        let mut errors = vec![];

        if !self.background_path().exists() {
            errors.push("Background image missing: background.png".to_string());
        }

        if self.trial.recording.full_video {
            let num_frames = self.trial.track.num_frames();
            for n in 1..num_frames {
                let path = self.frame_path(n);
                if !path.exists() {
                    errors.push(format!("Frame image missing: frame_{n}.png"));
                }
            }
        }

        errors
    }
}

/// Errors that can occur when working with trials.
#[derive(Debug, thiserror::Error)]
pub enum TrialError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid trial: {message}")]
    ValidationError { message: String },
}

/// Generate a simple UUID v4 without external dependency.
fn uuid_v4() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (seed & 0xFFFFFFFF) as u32,
        ((seed >> 32) & 0xFFFF) as u16,
        ((seed >> 48) & 0x0FFF) as u16,
        (((seed >> 60) & 0x3F) | 0x80) as u16 | (((seed >> 66) & 0x3FF) as u16) << 6,
        (seed >> 76) & 0xFFFFFFFFFFFF,
    )
}
