//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where trials are stored.
    pub trials_dir: PathBuf,

    /// Default recording settings.
    pub recording: RecordingDefaults,

    /// Default replay settings.
    #[serde(default)]
    pub replay: ReplayDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default recording parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingDefaults {
    /// Default frame rate.
    pub fps: u32,

    /// Default hue threshold band (low, high), both in [0, 179].
    pub hue_low: u8,
    pub hue_high: u8,

    /// Whether to persist every frame by default (vs. background-only).
    pub full_video: bool,
}

/// Default replay parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayDefaults {
    /// Slider position for playback speed, in [100, 2000].
    pub playback_slider: u16,

    /// Marker/line thickness in pixels, in [1, 30].
    pub marker_radius: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "kinetrack=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            trials_dir: dirs_default_trials(),
            recording: RecordingDefaults::default(),
            replay: ReplayDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RecordingDefaults {
    fn default() -> Self {
        Self {
            fps: 30,
            hue_low: 2,
            hue_high: 6,
            full_video: true,
        }
    }
}

impl Default for ReplayDefaults {
    fn default() -> Self {
        Self {
            playback_slider: 1000,
            marker_radius: 4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("kinetrack").join("config.json")
}

/// Default trials directory.
fn dirs_default_trials() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("kinetrack").join("trials")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_documented_ranges() {
        let config = AppConfig::default();
        assert!(config.recording.hue_low <= config.recording.hue_high);
        assert!(config.recording.hue_high <= 179);
        assert!((100..=2000).contains(&config.replay.playback_slider));
        assert!((1..=30).contains(&config.replay.marker_radius));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.recording.fps, config.recording.fps);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_replay_defaults_fill_in_for_legacy_files() {
        let mut value = serde_json::to_value(AppConfig::default()).unwrap();
        value.as_object_mut().unwrap().remove("replay");
        let parsed: AppConfig = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.replay.playback_slider, 1000);
        assert_eq!(parsed.replay.marker_radius, 4);
    }
}
