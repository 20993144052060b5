//! Kinetrack CLI — Command-line interface for tracking, calibration,
//! and replay.
//!
//! Usage:
//!   kinetrack record [OPTIONS]      Track an object and save a trial
//!   kinetrack calibrate [OPTIONS]   Measure the reference object
//!   kinetrack angle [OPTIONS]       Three-marker angle measurement
//!   kinetrack pick-color <IMAGE>    Suggest a hue band from an image
//!   kinetrack replay <PATH>         Replay a trial with overlays
//!   kinetrack info <PATH>           Show trial information
//!   kinetrack export <PATH>         Export trial metrics to CSV
//!   kinetrack validate <PATH>       Validate a trial bundle

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "kinetrack",
    about = "Colored-object tracking with kinematic replay",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track an object through a frame source and save a trial
    Record {
        /// Trial name
        #[arg(short, long, default_value = "trial")]
        name: String,

        /// Directory of input frames (omit to use the synthetic source)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Synthetic source frame count, used when --source is omitted
        #[arg(long, default_value = "60")]
        synthetic_frames: usize,

        /// Output directory (default: the configured trials directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target frame rate (default from config)
        #[arg(long)]
        fps: Option<u32>,

        /// Low hue threshold [0, 179] (default from config)
        #[arg(long)]
        hue_low: Option<u8>,

        /// High hue threshold [0, 179] (default from config)
        #[arg(long)]
        hue_high: Option<u8>,

        /// Save movement only (background + trajectory, no frames)
        #[arg(long)]
        movement_only: bool,

        /// Pixel-to-real-unit conversion factor from a calibration
        #[arg(long, default_value = "1.0")]
        conversion_factor: f64,
    },

    /// Measure the reference object and compute a conversion factor
    Calibrate {
        /// Directory of input frames
        #[arg(short, long)]
        source: PathBuf,

        /// Reference object diameter in centimeters [1, 20]
        #[arg(short, long)]
        diameter: f64,

        /// Low hue threshold [0, 179]
        #[arg(long, default_value = "2")]
        hue_low: u8,

        /// High hue threshold [0, 179]
        #[arg(long, default_value = "6")]
        hue_high: u8,

        /// Frame rate for the measurement loop
        #[arg(long, default_value = "30")]
        fps: u32,
    },

    /// Measure the angle between three colored markers
    Angle {
        /// Directory of input frames
        #[arg(short, long)]
        source: PathBuf,

        /// Red (vertex) marker band
        #[arg(long, default_value = "0")]
        red_low: u8,
        #[arg(long, default_value = "12")]
        red_high: u8,

        /// Yellow marker band
        #[arg(long, default_value = "20")]
        yellow_low: u8,
        #[arg(long, default_value = "30")]
        yellow_high: u8,

        /// Blue marker band
        #[arg(long, default_value = "90")]
        blue_low: u8,
        #[arg(long, default_value = "110")]
        blue_high: u8,

        /// Frame rate for the measurement loop
        #[arg(long, default_value = "30")]
        fps: u32,
    },

    /// Suggest a hue band from an image's dominant color
    PickColor {
        /// Image to analyze
        image: PathBuf,

        /// Optional sub-rectangle: x y width height
        #[arg(long, num_args = 4, value_names = ["X", "Y", "W", "H"])]
        rect: Option<Vec<u32>>,
    },

    /// Replay a recorded trial with overlays
    Replay {
        /// Path to the trial directory
        path: PathBuf,

        /// Overlay mode: marker|line|v-path|a-path
        #[arg(long, default_value = "marker")]
        mode: String,

        /// Playback speed slider [100, 2000]; higher is faster
        /// (default from config)
        #[arg(long)]
        speed: Option<u16>,

        /// Marker/path thickness in pixels [1, 30] (default from config)
        #[arg(long)]
        marker_radius: Option<u32>,

        /// Object color for marker/line modes: red|yellow|green|blue
        #[arg(long, default_value = "green")]
        color: String,

        /// Directory for rendered frames
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Number of full playback loops
        #[arg(long, default_value = "1")]
        loops: usize,
    },

    /// Show trial information
    Info {
        /// Path to the trial directory
        path: PathBuf,
    },

    /// Export trial metrics to CSV
    Export {
        /// Path to the trial directory
        path: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a trial bundle
    Validate {
        /// Path to the trial directory
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    kinetrack_common::logging::init_logging(&kinetrack_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Record {
            name,
            source,
            synthetic_frames,
            output,
            fps,
            hue_low,
            hue_high,
            movement_only,
            conversion_factor,
        } => {
            commands::record::run(
                name,
                source,
                synthetic_frames,
                output,
                fps,
                hue_low,
                hue_high,
                movement_only,
                conversion_factor,
            )
            .await
        }
        Commands::Calibrate {
            source,
            diameter,
            hue_low,
            hue_high,
            fps,
        } => commands::calibrate::run(source, diameter, hue_low, hue_high, fps).await,
        Commands::Angle {
            source,
            red_low,
            red_high,
            yellow_low,
            yellow_high,
            blue_low,
            blue_high,
            fps,
        } => {
            commands::angle::run(
                source,
                (red_low, red_high),
                (yellow_low, yellow_high),
                (blue_low, blue_high),
                fps,
            )
            .await
        }
        Commands::PickColor { image, rect } => commands::pick_color::run(image, rect),
        Commands::Replay {
            path,
            mode,
            speed,
            marker_radius,
            color,
            out,
            loops,
        } => commands::replay::run(path, mode, speed, marker_radius, color, out, loops).await,
        Commands::Info { path } => commands::info::run(path),
        Commands::Export { path, output } => commands::export::run(path, output),
        Commands::Validate { path } => commands::validate::run(path),
    }
}
