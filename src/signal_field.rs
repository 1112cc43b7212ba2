use macroquad::prelude::*;

use crate::config;
use crate::error::FieldError;
use crate::obstacles::ObstacleMap;

/// Normalised signal-strength grid over the room, row-major.
/// Built once from the emitter and obstacles; read-only afterwards.
#[derive(Clone, Debug)]
pub struct SignalField {
    pub cells: Vec<f32>,
    pub width: usize,
    pub height: usize,
    cell_size: Vec2,
}

/// Unnormalised intensity seen at `point`: inverse-power falloff from the
/// emitter, attenuated by every obstacle on the line of sight.
pub fn raw_intensity(emitter: Vec2, point: Vec2, obstacles: &ObstacleMap) -> f32 {
    let distance = emitter.distance(point).max(config::FIELD_MIN_DISTANCE);
    let falloff = 1.0 / distance.powf(config::FIELD_FALLOFF_EXPONENT);
    falloff * obstacles.line_of_sight_factor(emitter, point)
}

impl SignalField {
    pub fn compute(
        emitter: Vec2,
        obstacles: &ObstacleMap,
        grid_w: usize,
        grid_h: usize,
        room_w: f32,
        room_h: f32,
    ) -> Result<Self, FieldError> {
        if grid_w == 0 || grid_h == 0 {
            return Err(FieldError::EmptyGrid {
                width: grid_w,
                height: grid_h,
            });
        }
        if !(room_w.is_finite() && room_h.is_finite()) || room_w <= 0.0 || room_h <= 0.0 {
            return Err(FieldError::InvalidRoom {
                width: room_w,
                height: room_h,
            });
        }

        let cell_size = vec2(room_w / grid_w as f32, room_h / grid_h as f32);
        let mut field = Self {
            cells: Vec::with_capacity(grid_w * grid_h),
            width: grid_w,
            height: grid_h,
            cell_size,
        };

        for y in 0..grid_h {
            for x in 0..grid_w {
                let center = field.cell_center(x, y);
                field.cells.push(raw_intensity(emitter, center, obstacles));
            }
        }

        field.normalize();
        Ok(field)
    }

    /// Divide every cell by the strongest one, so the peak is exactly 1.0.
    /// Running this on an already normalised grid leaves it unchanged.
    pub fn normalize(&mut self) {
        let max = self.max_value();
        if max > 0.0 {
            for cell in &mut self.cells {
                *cell /= max;
            }
        }
    }

    pub fn max_value(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }

    /// Room-space center of grid cell (x, y).
    pub fn cell_center(&self, x: usize, y: usize) -> Vec2 {
        vec2(
            (x as f32 + 0.5) * self.cell_size.x,
            (y as f32 + 0.5) * self.cell_size.y,
        )
    }

    pub fn cell_of(&self, pos: Vec2) -> (usize, usize) {
        let cx = ((pos.x / self.cell_size.x).max(0.0) as usize).min(self.width - 1);
        let cy = ((pos.y / self.cell_size.y).max(0.0) as usize).min(self.height - 1);
        (cx, cy)
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.cells[y * self.width + x]
    }

    /// Sample the field at a room position (nearest cell).
    pub fn sample(&self, pos: Vec2) -> f32 {
        let (cx, cy) = self.cell_of(pos);
        self.get(cx, cy)
    }

    /// Mean field strength over a square window of cells centered on `pos`,
    /// clipped to the grid, as a 0-100 percentage.
    pub fn window_average_pct(&self, pos: Vec2, window: usize) -> f32 {
        let (cx, cy) = self.cell_of(pos);
        let half = window / 2;
        let x0 = cx.saturating_sub(half);
        let y0 = cy.saturating_sub(half);
        let x1 = (cx + half).min(self.width - 1);
        let y1 = (cy + half).min(self.height - 1);

        let mut total = 0.0f32;
        let mut count = 0u32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                total += self.get(x, y);
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            (total / count as f32 * 100.0).clamp(0.0, 100.0)
        }
    }

    /// Zone readout using the standard 11x11 window.
    pub fn zone_average_pct(&self, pos: Vec2) -> f32 {
        self.window_average_pct(pos, config::ZONE_WINDOW)
    }
}
