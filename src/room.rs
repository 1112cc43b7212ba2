use macroquad::prelude::*;
use tracing::warn;

use crate::config;
use crate::error::FieldError;
use crate::obstacles::{Obstacle, ObstacleMap};
use crate::signal_field::SignalField;

/// Named spot in the room with a signal-quality readout.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub name: String,
    pub pos: Vec2,
}

/// Unvalidated description of a room, as written by hand or loaded from disk.
#[derive(Clone, Debug)]
pub struct FloorPlan {
    pub width: f32,
    pub height: f32,
    pub emitter: Vec2,
    pub obstacles: Vec<Obstacle>,
    pub zones: Vec<Zone>,
    pub grid_width: usize,
    pub grid_height: usize,
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba(r, g, b, 255)
}

impl FloorPlan {
    pub fn empty(width: f32, height: f32, emitter: Vec2) -> Self {
        Self {
            width,
            height,
            emitter,
            obstacles: Vec::new(),
            zones: Vec::new(),
            grid_width: config::FIELD_GRID_WIDTH,
            grid_height: config::FIELD_GRID_HEIGHT,
        }
    }

    /// Two-bedroom apartment used when no layout file is given.
    pub fn default_apartment() -> Self {
        let mut plan = Self::empty(12.0, 9.0, vec2(6.3, 4.2));
        plan.obstacles = vec![
            Obstacle::new("Bedroom wall", 4.0, 0.0, 0.15, 5.2, 0.82).with_echo_color(rgb(120, 200, 255)),
            Obstacle::new("Bathroom wall", 8.6, 0.0, 0.15, 4.0, 0.86).with_echo_color(rgb(120, 200, 255)),
            Obstacle::new("Refrigerator", 10.6, 6.9, 0.8, 0.7, 0.95).with_echo_color(rgb(255, 110, 90)),
            Obstacle::new("Kitchen counter", 8.8, 8.2, 3.0, 0.6, 0.5).with_echo_color(rgb(255, 190, 80)),
            Obstacle::new("Sofa", 5.0, 6.4, 2.4, 0.9, 0.35).with_echo_color(rgb(110, 255, 140)),
            Obstacle::new("Bookshelf", 0.3, 6.0, 0.5, 2.2, 0.6).with_echo_color(rgb(210, 150, 255)),
            Obstacle::new("Bed", 0.6, 0.8, 2.0, 2.2, 0.3).with_echo_color(rgb(255, 140, 220)),
            Obstacle::new("Aquarium", 6.9, 1.2, 1.1, 0.45, 0.7).with_echo_color(rgb(80, 255, 240)),
        ];
        plan.zones = vec![
            Zone { name: "Living Room".into(), pos: vec2(6.2, 5.6) },
            Zone { name: "Bedroom".into(), pos: vec2(1.8, 2.4) },
            Zone { name: "Kitchen".into(), pos: vec2(10.3, 6.2) },
            Zone { name: "Bathroom".into(), pos: vec2(10.3, 1.8) },
            Zone { name: "Study".into(), pos: vec2(1.8, 7.0) },
        ];
        plan
    }
}

/// Validated room: obstacles, emitter, zones and the signal field computed
/// from them at construction. Nothing here changes after startup.
pub struct Room {
    size: Vec2,
    emitter: Vec2,
    obstacles: ObstacleMap,
    zones: Vec<Zone>,
    bearings: Vec<f32>,
    field: SignalField,
}

impl Room {
    pub fn build(plan: FloorPlan) -> Result<Self, FieldError> {
        let FloorPlan {
            width,
            height,
            emitter,
            obstacles,
            zones,
            grid_width,
            grid_height,
        } = plan;

        let inside = |p: Vec2| p.x >= 0.0 && p.x <= width && p.y >= 0.0 && p.y <= height;
        if !(emitter.x.is_finite() && emitter.y.is_finite()) || !inside(emitter) {
            return Err(FieldError::EmitterOutsideRoom {
                x: emitter.x,
                y: emitter.y,
            });
        }
        if let Some(zone) = zones.iter().find(|z| !inside(z.pos)) {
            return Err(FieldError::ZoneOutsideRoom {
                name: zone.name.clone(),
                x: zone.pos.x,
                y: zone.pos.y,
            });
        }

        let obstacles = ObstacleMap::new(obstacles)?;
        if obstacles.is_empty() {
            warn!("floor plan has no obstacles; the sweep will find no echoes");
        }
        let field = SignalField::compute(emitter, &obstacles, grid_width, grid_height, width, height)?;
        let bearings = obstacles.bearings_from(emitter);

        Ok(Self {
            size: vec2(width, height),
            emitter,
            obstacles,
            zones,
            bearings,
            field,
        })
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn emitter(&self) -> Vec2 {
        self.emitter
    }

    pub fn obstacles(&self) -> &ObstacleMap {
        &self.obstacles
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Bearing of each obstacle center from the emitter, in obstacle order.
    pub fn bearings(&self) -> &[f32] {
        &self.bearings
    }

    pub fn field(&self) -> &SignalField {
        &self.field
    }

    /// Signal quality (0-100) averaged around a named zone.
    pub fn zone_quality(&self, name: &str) -> Option<f32> {
        self.zones
            .iter()
            .find(|z| z.name.eq_ignore_ascii_case(name))
            .map(|z| self.field.zone_average_pct(z.pos))
    }

    pub fn zone_readouts(&self) -> Vec<(&str, f32)> {
        self.zones
            .iter()
            .map(|z| (z.name.as_str(), self.field.zone_average_pct(z.pos)))
            .collect()
    }
}
