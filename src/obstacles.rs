use macroquad::prelude::*;

use crate::error::FieldError;

/// Axis-aligned piece of furniture or wall that attenuates the signal.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub attenuation: f32, // [0, 1]
    pub echo_color: Color,
}

impl Obstacle {
    pub fn new(label: &str, x: f32, y: f32, width: f32, height: f32, attenuation: f32) -> Self {
        Self {
            label: label.to_string(),
            x,
            y,
            width,
            height,
            attenuation,
            echo_color: Color::new(0.35, 1.0, 0.55, 1.0),
        }
    }

    pub fn with_echo_color(mut self, color: Color) -> Self {
        self.echo_color = color;
        self
    }

    pub fn min(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        vec2(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Multiplier applied to a ray that passes through this obstacle.
    pub fn transmission(&self) -> f32 {
        1.0 - self.attenuation * crate::config::FIELD_ATTENUATION_SCALE
    }

    /// Does the segment `a -> b` touch this rectangle?
    pub fn blocks_segment(&self, a: Vec2, b: Vec2) -> bool {
        segment_intersects_aabb(a, b, self.min(), self.max())
    }

    fn validate(&self, index: usize) -> Result<(), FieldError> {
        let malformed = |reason| FieldError::InvalidObstacle {
            index,
            label: self.label.clone(),
            reason,
        };
        let coords = [self.x, self.y, self.width, self.height, self.attenuation];
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(malformed("non-finite geometry"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(malformed("width and height must be positive"));
        }
        if !(0.0..=1.0).contains(&self.attenuation) {
            return Err(malformed("attenuation must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Immutable set of obstacles, validated once at startup.
#[derive(Clone, Debug, Default)]
pub struct ObstacleMap {
    obstacles: Vec<Obstacle>,
}

impl ObstacleMap {
    pub fn new(obstacles: Vec<Obstacle>) -> Result<Self, FieldError> {
        for (index, obstacle) in obstacles.iter().enumerate() {
            obstacle.validate(index)?;
        }
        Ok(Self { obstacles })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Combined transmission factor along the line of sight `from -> to`.
    pub fn line_of_sight_factor(&self, from: Vec2, to: Vec2) -> f32 {
        self.obstacles
            .iter()
            .filter(|o| o.blocks_segment(from, to))
            .map(Obstacle::transmission)
            .product()
    }

    /// Bearing of every obstacle center as seen from `origin`, in [0, TAU).
    pub fn bearings_from(&self, origin: Vec2) -> Vec<f32> {
        self.obstacles
            .iter()
            .map(|o| bearing(origin, o.center()))
            .collect()
    }
}

/// Angle from `from` to `to`, normalised to [0, TAU).
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    let angle = d.y.atan2(d.x).rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if angle >= std::f32::consts::TAU {
        0.0
    } else {
        angle
    }
}

/// Slab test: clip the parametric segment `a + t(b - a)`, `t` in [0, 1],
/// against both axis slabs of the box and report whether anything is left.
pub fn segment_intersects_aabb(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> bool {
    let d = b - a;
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for (origin, dir, lo, hi) in [(a.x, d.x, min.x, max.x), (a.y, d.y, min.y, max.y)] {
        if dir.abs() <= f32::EPSILON {
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn unit_box() -> (Vec2, Vec2) {
        (vec2(1.0, 1.0), vec2(2.0, 2.0))
    }

    #[test]
    fn segment_through_box_intersects() {
        let (min, max) = unit_box();
        assert!(segment_intersects_aabb(vec2(0.0, 1.5), vec2(3.0, 1.5), min, max));
        assert!(segment_intersects_aabb(vec2(0.0, 0.0), vec2(3.0, 3.0), min, max));
    }

    #[test]
    fn segment_stopping_short_of_box_misses() {
        let (min, max) = unit_box();
        assert!(!segment_intersects_aabb(vec2(0.0, 1.5), vec2(0.9, 1.5), min, max));
    }

    #[test]
    fn segment_passing_beside_box_misses() {
        let (min, max) = unit_box();
        assert!(!segment_intersects_aabb(vec2(0.0, 2.5), vec2(3.0, 2.5), min, max));
        assert!(!segment_intersects_aabb(vec2(0.0, 1.0), vec2(1.0, -0.5), min, max));
    }

    #[test]
    fn axis_parallel_segment_outside_slab_misses() {
        let (min, max) = unit_box();
        assert!(!segment_intersects_aabb(vec2(2.5, 0.0), vec2(2.5, 3.0), min, max));
        assert!(segment_intersects_aabb(vec2(1.5, 0.0), vec2(1.5, 3.0), min, max));
    }

    #[test]
    fn segment_ending_inside_box_intersects() {
        let (min, max) = unit_box();
        assert!(segment_intersects_aabb(vec2(0.0, 0.0), vec2(1.5, 1.5), min, max));
    }

    #[test]
    fn bearing_is_normalised() {
        let o = vec2(0.0, 0.0);
        assert!((bearing(o, vec2(1.0, 0.0)) - 0.0).abs() < 1e-6);
        assert!((bearing(o, vec2(0.0, 1.0)) - FRAC_PI_2).abs() < 1e-6);
        assert!((bearing(o, vec2(-1.0, 0.0)) - PI).abs() < 1e-6);
        assert!((bearing(o, vec2(0.0, -1.0)) - 3.0 * FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn malformed_obstacles_are_rejected() {
        let negative = Obstacle::new("shelf", 1.0, 1.0, -0.5, 1.0, 0.5);
        assert!(ObstacleMap::new(vec![negative]).is_err());

        let too_dense = Obstacle::new("vault", 1.0, 1.0, 1.0, 1.0, 1.5);
        let err = ObstacleMap::new(vec![too_dense]).unwrap_err();
        assert!(err.to_string().contains("vault"));

        let nan = Obstacle::new("ghost", f32::NAN, 1.0, 1.0, 1.0, 0.5);
        assert!(ObstacleMap::new(vec![nan]).is_err());
    }

    #[test]
    fn line_of_sight_compounds_blocking_obstacles() {
        let map = ObstacleMap::new(vec![
            Obstacle::new("a", 1.0, -1.0, 0.2, 2.0, 0.5),
            Obstacle::new("b", 2.0, -1.0, 0.2, 2.0, 1.0),
            Obstacle::new("off-axis", 1.0, 5.0, 1.0, 1.0, 1.0),
        ])
        .unwrap();
        let factor = map.line_of_sight_factor(vec2(0.0, 0.0), vec2(3.0, 0.0));
        let expected = (1.0 - 0.5 * 0.88) * (1.0 - 1.0 * 0.88);
        assert!((factor - expected).abs() < 1e-6);

        let clear = map.line_of_sight_factor(vec2(0.0, 0.0), vec2(0.5, 0.0));
        assert_eq!(clear, 1.0);
    }
}
