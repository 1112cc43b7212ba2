use std::path::PathBuf;

use clap::Parser;

use crate::config;

/// Sonar-style interference scope for a single-room floor plan.
#[derive(Parser, Debug, Clone)]
#[command(name = "sonarscope", version, about, long_about = None)]
pub struct Cli {
    /// Seed for event rolls, demo detections and waveform texture.
    #[arg(long, default_value_t = config::DEFAULT_SEED)]
    pub seed: u64,

    /// Detection sensitivity, 0..100. Out-of-range values are clamped.
    #[arg(long, default_value_t = config::DEFAULT_SENSITIVITY)]
    pub sensitivity: f32,

    /// JSON floor plan to load instead of the built-in apartment.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Run the disturbance soak without opening a window.
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Engine ticks for the headless soak.
    #[arg(long, default_value_t = config::DEFAULT_SOAK_TICKS)]
    pub soak_ticks: u64,

    /// Write the soak report as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Start scanning immediately. The sweep always animates from launch.
    #[arg(long, default_value_t = false)]
    pub autostart: bool,

    /// Debug-level logging.
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    pub fn clamped_sensitivity(&self) -> f32 {
        if self.sensitivity.is_nan() {
            config::DEFAULT_SENSITIVITY
        } else {
            self.sensitivity.clamp(0.0, 100.0)
        }
    }
}
