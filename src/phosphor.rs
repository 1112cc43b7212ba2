use macroquad::prelude::*;

use crate::config;
use crate::obstacles::Obstacle;

/// Low-resolution accumulate-and-decay buffer that gives the sweep its
/// fading phosphor trail. Each tick the whole buffer is faded, then the
/// current beam and obstacle glows are stamped on top.
pub struct PhosphorBuffer {
    pub cells: Vec<f32>,
    pub width: usize,
    pub height: usize,
    cell_size: Vec2,
}

impl PhosphorBuffer {
    pub fn new(room_size: Vec2, width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            cells: vec![0.0; width * height],
            width,
            height,
            cell_size: vec2(room_size.x / width as f32, room_size.y / height as f32),
        }
    }

    fn cell_center(&self, x: usize, y: usize) -> Vec2 {
        vec2(
            (x as f32 + 0.5) * self.cell_size.x,
            (y as f32 + 0.5) * self.cell_size.y,
        )
    }

    pub fn sample(&self, pos: Vec2) -> f32 {
        let cx = ((pos.x / self.cell_size.x).max(0.0) as usize).min(self.width - 1);
        let cy = ((pos.y / self.cell_size.y).max(0.0) as usize).min(self.height - 1);
        self.cells[cy * self.width + cx]
    }

    /// Exponential fade toward the background.
    pub fn fade(&mut self, dt: f32) {
        let factor = config::PHOSPHOR_RETENTION_PER_SEC.powf(dt.max(0.0));
        for cell in &mut self.cells {
            *cell *= factor;
        }
    }

    /// Stamp the beam wedge trailing behind `angle`: full intensity on the
    /// leading edge, falling to zero `width` radians behind it.
    pub fn stamp_beam(&mut self, origin: Vec2, angle: f32, width: f32, range: f32) {
        let width = width.max(1e-3);
        for y in 0..self.height {
            for x in 0..self.width {
                let center = self.cell_center(x, y);
                let offset = center - origin;
                if offset.length() > range {
                    continue;
                }
                let cell_angle = offset.y.atan2(offset.x);
                let behind = (angle - cell_angle).rem_euclid(std::f32::consts::TAU);
                if behind <= width {
                    let intensity = 1.0 - behind / width;
                    let cell = &mut self.cells[y * self.width + x];
                    *cell = cell.max(intensity);
                }
            }
        }
    }

    /// Stamp a glowing obstacle footprint.
    pub fn stamp_obstacle(&mut self, obstacle: &Obstacle, intensity: f32) {
        if intensity <= 0.0 {
            return;
        }
        let value = intensity * config::GLOW_STAMP_SCALE;
        for y in 0..self.height {
            for x in 0..self.width {
                if obstacle.contains(self.cell_center(x, y)) {
                    let cell = &mut self.cells[y * self.width + x];
                    *cell = cell.max(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn buffer() -> PhosphorBuffer {
        PhosphorBuffer::new(vec2(10.0, 10.0), 40, 40)
    }

    #[test]
    fn beam_lights_cells_just_behind_the_leading_edge() {
        let mut buf = buffer();
        let origin = vec2(5.0, 5.0);
        buf.stamp_beam(origin, 0.2, 0.35, 10.0);

        assert!(buf.sample(vec2(8.0, 5.3)) > 0.5);
        // ahead of the beam and on the opposite side stay dark
        assert_eq!(buf.sample(vec2(5.0, 8.0)), 0.0);
        assert_eq!(buf.sample(vec2(2.0, 5.0)), 0.0);
    }

    #[test]
    fn trail_stays_visible_for_a_full_rotation() {
        let mut buf = buffer();
        buf.stamp_beam(vec2(5.0, 5.0), FRAC_PI_2, 0.35, 10.0);
        let spot = vec2(5.05, 8.0);
        let start = buf.sample(spot);
        assert!(start > 0.5);

        let dt = 1.0 / 60.0;
        let frames = (config::SWEEP_PERIOD_SECS / dt).ceil() as usize;
        let mut previous = start;
        for _ in 0..frames {
            buf.fade(dt);
            let now = buf.sample(spot);
            assert!(now < previous);
            previous = now;
        }
        assert!(previous > config::PHOSPHOR_VISIBLE_THRESHOLD);
    }

    #[test]
    fn obstacle_glow_is_stamped_inside_its_rectangle() {
        let mut buf = buffer();
        let sofa = Obstacle::new("sofa", 1.0, 1.0, 2.0, 1.0, 0.4);
        buf.stamp_obstacle(&sofa, 1.0);
        assert!((buf.sample(vec2(2.0, 1.5)) - config::GLOW_STAMP_SCALE).abs() < 1e-6);
        assert_eq!(buf.sample(vec2(6.0, 6.0)), 0.0);
    }
}
