use std::path::Path;

use macroquad::prelude::*;
use serde::Deserialize;

use crate::config;
use crate::error::LayoutError;
use crate::obstacles::Obstacle;
use crate::room::{FloorPlan, Room, Zone};

// Serde-friendly mirror of a floor plan. Colors are [r, g, b] bytes.

#[derive(Clone, Debug, Deserialize)]
struct LayoutObstacle {
    label: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    attenuation: f32,
    #[serde(default = "default_echo_color")]
    echo_color: [u8; 3],
}

#[derive(Clone, Debug, Deserialize)]
struct LayoutZone {
    name: String,
    x: f32,
    y: f32,
}

#[derive(Clone, Debug, Deserialize)]
struct LayoutFile {
    width: f32,
    height: f32,
    emitter: [f32; 2],
    #[serde(default)]
    obstacles: Vec<LayoutObstacle>,
    #[serde(default)]
    zones: Vec<LayoutZone>,
    #[serde(default)]
    grid: Option<[usize; 2]>,
}

fn default_echo_color() -> [u8; 3] {
    [90, 255, 140]
}

impl From<LayoutFile> for FloorPlan {
    fn from(file: LayoutFile) -> Self {
        let [grid_width, grid_height] = file
            .grid
            .unwrap_or([config::FIELD_GRID_WIDTH, config::FIELD_GRID_HEIGHT]);
        FloorPlan {
            width: file.width,
            height: file.height,
            emitter: vec2(file.emitter[0], file.emitter[1]),
            obstacles: file
                .obstacles
                .into_iter()
                .map(|o| {
                    let [r, g, b] = o.echo_color;
                    Obstacle::new(&o.label, o.x, o.y, o.width, o.height, o.attenuation)
                        .with_echo_color(Color::from_rgba(r, g, b, 255))
                })
                .collect(),
            zones: file
                .zones
                .into_iter()
                .map(|z| Zone {
                    name: z.name,
                    pos: vec2(z.x, z.y),
                })
                .collect(),
            grid_width,
            grid_height,
        }
    }
}

pub fn parse_floor_plan(json: &str) -> Result<FloorPlan, LayoutError> {
    let file: LayoutFile = serde_json::from_str(json)?;
    Ok(file.into())
}

/// Load a floor plan from a JSON file and build the room from it.
pub fn load_room(path: &Path) -> Result<Room, LayoutError> {
    let json = std::fs::read_to_string(path)?;
    let plan = parse_floor_plan(&json)?;
    Ok(Room::build(plan)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;

    const STUDIO: &str = r#"{
        "width": 6.0,
        "height": 4.0,
        "emitter": [1.0, 2.0],
        "obstacles": [
            { "label": "Partition", "x": 3.0, "y": 0.0, "width": 0.1, "height": 3.0,
              "attenuation": 0.8, "echo_color": [255, 0, 0] },
            { "label": "Desk", "x": 4.5, "y": 3.0, "width": 1.2, "height": 0.6, "attenuation": 0.3 }
        ],
        "zones": [ { "name": "Desk", "x": 5.0, "y": 3.2 } ],
        "grid": [30, 20]
    }"#;

    #[test]
    fn parses_layout_with_defaults() {
        let plan = parse_floor_plan(STUDIO).unwrap();
        assert_eq!(plan.obstacles.len(), 2);
        assert_eq!(plan.obstacles[0].echo_color, Color::from_rgba(255, 0, 0, 255));
        assert_eq!(plan.obstacles[1].echo_color, Color::from_rgba(90, 255, 140, 255));
        assert_eq!((plan.grid_width, plan.grid_height), (30, 20));

        let room = Room::build(plan).unwrap();
        assert_eq!(room.field().width, 30);
        assert!(room.zone_quality("Desk").is_some());
    }

    #[test]
    fn missing_grid_uses_the_configured_resolution() {
        let plan = parse_floor_plan(r#"{ "width": 3.0, "height": 3.0, "emitter": [1.5, 1.5] }"#).unwrap();
        assert_eq!(plan.grid_width, config::FIELD_GRID_WIDTH);
        assert!(plan.obstacles.is_empty());
    }

    #[test]
    fn broken_json_is_a_parse_error() {
        assert!(matches!(parse_floor_plan("{ not json"), Err(LayoutError::Parse(_))));
    }

    #[test]
    fn invalid_geometry_surfaces_as_field_error() {
        let json = r#"{ "width": 3.0, "height": 3.0, "emitter": [1.5, 1.5],
            "obstacles": [ { "label": "Slab", "x": 1.0, "y": 1.0, "width": 1.0, "height": 1.0,
                             "attenuation": 2.0 } ] }"#;
        let plan = parse_floor_plan(json).unwrap();
        let err: LayoutError = Room::build(plan).map(|_| ()).unwrap_err().into();
        assert!(matches!(err, LayoutError::Field(FieldError::InvalidObstacle { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_room(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(LayoutError::Io(_))));
    }
}
