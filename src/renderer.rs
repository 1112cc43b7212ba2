use macroquad::prelude::*;

use crate::config;
use crate::markers::DetectionMarker;
use crate::obstacles::ObstacleMap;
use crate::phosphor::PhosphorBuffer;
use crate::room::Room;
use crate::signal_field::SignalField;
use crate::simulation::SimState;
use crate::sonar::{self, EchoView, SonarSnapshot};

const BG_COLOR: Color = Color::new(0.01, 0.03, 0.02, 1.0);
const GRID_COLOR: Color = Color::new(0.06, 0.16, 0.09, 1.0);
const SCOPE_GREEN: Color = Color::new(0.35, 1.0, 0.55, 1.0);
pub const PANEL_WIDTH: f32 = 340.0;
const MARGIN: f32 = 24.0;
// meters per second
const PING_SPEED: f32 = 3.2;

/// Maps room meters onto the scope area left of the side panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomView {
    pub origin: Vec2,
    pub scale: f32,
}

impl RoomView {
    pub fn fit(room_size: Vec2, area: Rect) -> Self {
        let usable = vec2(area.w - 2.0 * MARGIN, area.h - 2.0 * MARGIN).max(Vec2::ONE);
        let scale = (usable.x / room_size.x).min(usable.y / room_size.y).max(f32::EPSILON);
        let extent = room_size * scale;
        let origin = vec2(area.x, area.y) + (vec2(area.w, area.h) - extent) * 0.5;
        Self { origin, scale }
    }

    pub fn to_screen(&self, room_pos: Vec2) -> Vec2 {
        self.origin + room_pos * self.scale
    }

    pub fn length(&self, meters: f32) -> f32 {
        meters * self.scale
    }
}

/// Scope area for the current window size.
pub fn scope_area() -> Rect {
    Rect::new(0.0, 0.0, (screen_width() - PANEL_WIDTH).max(200.0), screen_height())
}

/// Signal strength ramp: deep blue for dead spots through green to warm red
/// next to the router.
pub fn heat_color(strength: f32) -> Color {
    let t = strength.clamp(0.0, 1.0);
    let stops = [
        (0.0, Color::new(0.05, 0.08, 0.30, 1.0)),
        (0.35, Color::new(0.05, 0.45, 0.55, 1.0)),
        (0.6, Color::new(0.20, 0.80, 0.35, 1.0)),
        (0.8, Color::new(0.95, 0.85, 0.20, 1.0)),
        (1.0, Color::new(0.95, 0.30, 0.15, 1.0)),
    ];
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let k = (t - t0) / (t1 - t0);
            return Color::new(
                c0.r + (c1.r - c0.r) * k,
                c0.g + (c1.g - c0.g) * k,
                c0.b + (c1.b - c0.b) * k,
                1.0,
            );
        }
    }
    stops[stops.len() - 1].1
}

/// GPU-side copies of the two grids. The heatmap is uploaded once; the
/// phosphor buffer is re-uploaded every frame.
pub struct ScopeRenderer {
    heatmap: Texture2D,
    phosphor_image: Image,
    phosphor: Texture2D,
}

impl ScopeRenderer {
    pub fn new(room: &Room) -> Self {
        let heatmap = Texture2D::from_image(&heatmap_image(room.field()));
        heatmap.set_filter(FilterMode::Linear);

        let phosphor_image = Image::gen_image_color(
            config::PHOSPHOR_GRID_WIDTH as u16,
            config::PHOSPHOR_GRID_HEIGHT as u16,
            Color::new(0.0, 0.0, 0.0, 0.0),
        );
        let phosphor = Texture2D::from_image(&phosphor_image);
        phosphor.set_filter(FilterMode::Linear);

        Self {
            heatmap,
            phosphor_image,
            phosphor,
        }
    }

    pub fn draw(&mut self, sim: &SimState) {
        clear_background(BG_COLOR);

        let room = &sim.room;
        let view = RoomView::fit(room.size(), scope_area());
        let snapshot = sim.sonar();
        let disturbance = sim.disturbance();

        self.draw_textured(&self.heatmap, room.size(), &view, 0.55);
        draw_room_grid(room.size(), &view);

        self.upload_phosphor(sim.clock.phosphor());
        self.draw_textured(&self.phosphor, room.size(), &view, 1.0);

        draw_obstacles(room.obstacles(), &snapshot.glows, &view);
        draw_zones(room, &view);
        draw_pings(room.emitter(), &snapshot, &view);
        draw_beam(room.emitter(), room.size(), snapshot.sweep.angle, &view);
        draw_echoes(&snapshot.echoes, &view);
        draw_emitter(room.emitter(), snapshot.time, &view);
        draw_markers(sim.markers.live(), room.size(), &view);

        draw_hud(&snapshot, sim.clock.is_running(), disturbance.scanning);

        if disturbance.flash_intensity > 0.0 {
            let area = scope_area();
            let pulse = 0.6 + 0.4 * (snapshot.time * 9.0).sin().abs() as f32;
            draw_rectangle(
                area.x,
                area.y,
                area.w,
                area.h,
                Color::new(0.9, 0.05, 0.05, 0.22 * disturbance.flash_intensity * pulse),
            );
        }
    }

    fn upload_phosphor(&mut self, buffer: &PhosphorBuffer) {
        for y in 0..buffer.height {
            for x in 0..buffer.width {
                let v = buffer.cells[y * buffer.width + x];
                let color = if v < config::PHOSPHOR_VISIBLE_THRESHOLD {
                    Color::new(0.0, 0.0, 0.0, 0.0)
                } else {
                    Color::new(SCOPE_GREEN.r, SCOPE_GREEN.g, SCOPE_GREEN.b, v.min(1.0) * 0.7)
                };
                self.phosphor_image.set_pixel(x as u32, y as u32, color);
            }
        }
        self.phosphor.update(&self.phosphor_image);
    }

    fn draw_textured(&self, texture: &Texture2D, room_size: Vec2, view: &RoomView, alpha: f32) {
        let top_left = view.to_screen(Vec2::ZERO);
        draw_texture_ex(
            texture,
            top_left.x,
            top_left.y,
            Color::new(1.0, 1.0, 1.0, alpha),
            DrawTextureParams {
                dest_size: Some(room_size * view.scale),
                ..Default::default()
            },
        );
    }
}

fn heatmap_image(field: &SignalField) -> Image {
    let mut image = Image::gen_image_color(field.width as u16, field.height as u16, BLACK);
    for y in 0..field.height {
        for x in 0..field.width {
            image.set_pixel(x as u32, y as u32, heat_color(field.get(x, y)));
        }
    }
    image
}

fn draw_room_grid(room_size: Vec2, view: &RoomView) {
    let top_left = view.to_screen(Vec2::ZERO);
    let extent = room_size * view.scale;
    draw_rectangle_lines(top_left.x, top_left.y, extent.x, extent.y, 2.0, SCOPE_GREEN);

    let mut x = 1.0;
    while x < room_size.x {
        let a = view.to_screen(vec2(x, 0.0));
        draw_line(a.x, a.y, a.x, a.y + extent.y, 1.0, GRID_COLOR);
        x += 1.0;
    }
    let mut y = 1.0;
    while y < room_size.y {
        let a = view.to_screen(vec2(0.0, y));
        draw_line(a.x, a.y, a.x + extent.x, a.y, 1.0, GRID_COLOR);
        y += 1.0;
    }
}

fn draw_obstacles(obstacles: &ObstacleMap, glows: &[f32], view: &RoomView) {
    for (i, obstacle) in obstacles.iter().enumerate() {
        let p = view.to_screen(obstacle.min());
        let w = view.length(obstacle.width);
        let h = view.length(obstacle.height);
        let glow = glows.get(i).copied().unwrap_or(0.0);
        let c = obstacle.echo_color;

        draw_rectangle(p.x, p.y, w, h, Color::new(0.04, 0.08, 0.06, 0.55 + obstacle.attenuation * 0.4));
        if glow > 0.0 {
            draw_rectangle(p.x, p.y, w, h, Color::new(c.r, c.g, c.b, glow * 0.45));
        }
        draw_rectangle_lines(p.x, p.y, w, h, 1.5, Color::new(c.r, c.g, c.b, 0.35 + glow * 0.65));
        if w > 36.0 || h > 36.0 {
            draw_text(&obstacle.label, p.x + 3.0, p.y + 13.0, 14.0, Color::new(c.r, c.g, c.b, 0.7));
        }
    }
}

fn draw_zones(room: &Room, view: &RoomView) {
    for (zone, (_, quality)) in room.zones().iter().zip(room.zone_readouts()) {
        let p = view.to_screen(zone.pos);
        draw_circle_lines(p.x, p.y, 5.0, 1.0, Color::new(0.8, 0.9, 0.85, 0.6));
        let text = format!("{} {:.0}%", zone.name, quality);
        draw_text(&text, p.x + 8.0, p.y + 4.0, 15.0, Color::new(0.85, 0.95, 0.9, 0.85));
    }
}

fn draw_beam(emitter: Vec2, room_size: Vec2, angle: f32, view: &RoomView) {
    let center = view.to_screen(emitter);
    let range = view.length(room_size.length());
    // trailing wedge, brightest on the leading edge
    let slices = 12;
    for i in 0..slices {
        let a0 = angle - config::BEAM_WIDTH_RAD * (i as f32 / slices as f32);
        let a1 = angle - config::BEAM_WIDTH_RAD * ((i + 1) as f32 / slices as f32);
        let alpha = 0.28 * (1.0 - i as f32 / slices as f32);
        draw_triangle(
            center,
            center + Vec2::from_angle(a0) * range,
            center + Vec2::from_angle(a1) * range,
            Color::new(SCOPE_GREEN.r, SCOPE_GREEN.g, SCOPE_GREEN.b, alpha),
        );
    }
    let tip = center + Vec2::from_angle(angle) * range;
    draw_line(center.x, center.y, tip.x, tip.y, 2.0, SCOPE_GREEN);
}

fn draw_echoes(echoes: &[EchoView], view: &RoomView) {
    for echo in echoes {
        let t = (echo.age / config::ECHO_LIFETIME_SECS).clamp(0.0, 1.0);
        let p = view.to_screen(echo.origin);
        let radius = 4.0 + t * 28.0;
        let c = echo.color;
        draw_circle(p.x, p.y, 3.0, Color::new(c.r, c.g, c.b, (1.0 - t) * 0.9));
        draw_circle_lines(p.x, p.y, radius, 1.5, Color::new(c.r, c.g, c.b, (1.0 - t) * 0.7));
    }
}

fn draw_pings(emitter: Vec2, snapshot: &SonarSnapshot, view: &RoomView) {
    let center = view.to_screen(emitter);
    for &age in &snapshot.ping_ages {
        for ring_age in sonar::ping_ring_ages(age) {
            let fade = 1.0 - (ring_age / config::PING_MAX_AGE_SECS).clamp(0.0, 1.0);
            if fade <= 0.0 {
                continue;
            }
            let radius = view.length(ring_age * PING_SPEED);
            draw_circle_lines(
                center.x,
                center.y,
                radius,
                1.2,
                Color::new(SCOPE_GREEN.r, SCOPE_GREEN.g, SCOPE_GREEN.b, fade * 0.45),
            );
        }
    }
}

fn draw_emitter(emitter: Vec2, time: f64, view: &RoomView) {
    let p = view.to_screen(emitter);
    let pulse = 0.5 + 0.5 * (time * 3.0).sin() as f32;
    draw_circle(p.x, p.y, 9.0 + pulse * 3.0, Color::new(0.4, 1.0, 0.6, 0.18));
    draw_circle(p.x, p.y, 5.0, Color::new(0.85, 1.0, 0.9, 1.0));
}

fn draw_markers(markers: &[DetectionMarker], room_size: Vec2, view: &RoomView) {
    for marker in markers {
        if marker.is_expired() {
            continue;
        }
        let p = view.to_screen(vec2(marker.x * room_size.x, marker.y * room_size.y));
        let a = marker.alpha;
        draw_circle(p.x, p.y, 7.0, Color::new(1.0, 0.75, 0.2, 0.35 * a));
        draw_circle_lines(p.x, p.y, 11.0, 1.5, Color::new(1.0, 0.8, 0.3, a));
        let text = format!("{} {:.2}m", marker.kind.label(), marker.metrics.height_m);
        draw_text(&text, p.x + 13.0, p.y - 6.0, 15.0, Color::new(1.0, 0.9, 0.6, a));
    }
}

fn draw_hud(snapshot: &SonarSnapshot, animating: bool, scanning: bool) {
    let tc = Color::new(0.7, 0.9, 0.75, 1.0);
    let sh = Color::new(0.0, 0.0, 0.0, 0.5);

    let lines = [
        format!("FPS: {}", get_fps()),
        format!("Sweep: {:.0} deg  lap {}", snapshot.sweep.angle.to_degrees(), snapshot.sweep.lap_count),
        format!("Echoes: {}  Pings: {}", snapshot.echoes.len(), snapshot.ping_ages.len()),
    ];
    for (i, line) in lines.iter().enumerate() {
        let y = 20.0 + i as f32 * 20.0;
        draw_text(line, 11.0, y + 1.0, 18.0, sh);
        draw_text(line, 10.0, y, 18.0, tc);
    }

    if !animating || !scanning {
        let text = match (animating, scanning) {
            (false, false) => "STANDBY (Space to scan, P to animate)",
            (false, true) => "SWEEP PAUSED (P to resume)",
            _ => "SCAN OFF (Space to start)",
        };
        let tw = measure_text(text, None, 22, 1.0).width;
        let x = scope_area().w * 0.5 - tw * 0.5;
        draw_text(text, x + 1.0, screen_height() - 19.0, 22.0, sh);
        draw_text(text, x, screen_height() - 20.0, 22.0, Color::new(1.0, 0.8, 0.2, 0.9));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_fits_and_centers_the_room() {
        let view = RoomView::fit(vec2(12.0, 9.0), Rect::new(0.0, 0.0, 1000.0, 800.0));
        let top_left = view.to_screen(Vec2::ZERO);
        let bottom_right = view.to_screen(vec2(12.0, 9.0));
        assert!(top_left.x >= MARGIN - 1e-3 && top_left.y >= MARGIN - 1e-3);
        assert!(bottom_right.x <= 1000.0 - MARGIN + 1e-3);
        assert!(bottom_right.y <= 800.0 - MARGIN + 1e-3);
        assert!((top_left.x + bottom_right.x - 1000.0).abs() < 1e-3);
        assert!((view.length(2.0) - 2.0 * view.scale).abs() < 1e-6);
    }

    #[test]
    fn heat_ramp_is_continuous_and_clamped() {
        assert_eq!(heat_color(-1.0), heat_color(0.0));
        assert_eq!(heat_color(2.0), heat_color(1.0));
        let a = heat_color(0.5);
        let b = heat_color(0.5001);
        assert!((a.g - b.g).abs() < 0.01);
        assert!(heat_color(1.0).r > heat_color(0.0).r);
    }
}
