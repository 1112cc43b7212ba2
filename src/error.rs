use std::io;
use thiserror::Error;

/// Geometry problems that make the signal field impossible to build.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("signal grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("room size must be positive and finite, got {width}x{height} m")]
    InvalidRoom { width: f32, height: f32 },

    #[error("emitter at ({x}, {y}) lies outside the room")]
    EmitterOutsideRoom { x: f32, y: f32 },

    #[error("obstacle #{index} '{label}' is malformed: {reason}")]
    InvalidObstacle {
        index: usize,
        label: String,
        reason: &'static str,
    },

    #[error("zone '{name}' at ({x}, {y}) lies outside the room")]
    ZoneOutsideRoom { name: String, x: f32, y: f32 },
}

/// Failures while loading a floor plan from disk.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("failed to read layout file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse layout JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid layout: {0}")]
    Field(#[from] FieldError),
}

/// Failures while writing a soak report.
#[derive(Error, Debug)]
pub enum SoakError {
    #[error("failed to write soak report: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize soak report: {0}")]
    Serialize(#[from] serde_json::Error),
}
