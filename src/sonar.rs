use std::collections::VecDeque;
use std::f32::consts::TAU;

use macroquad::prelude::*;

use crate::arena::SlotArena;
use crate::config;
use crate::obstacles::Obstacle;
use crate::phosphor::PhosphorBuffer;
use crate::room::Room;

/// Rotating sweep: angle in [0, TAU) plus the number of completed laps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SweepState {
    pub angle: f32,
    pub last_angle: f32,
    pub lap_count: u64,
}

impl SweepState {
    /// Advance by `delta` radians (expected below one full turn).
    /// Returns true when the angle wrapped past zero.
    pub fn advance(&mut self, delta: f32) -> bool {
        self.last_angle = self.angle;
        let mut next = (self.angle + delta).rem_euclid(TAU);
        if next >= TAU {
            next = 0.0;
        }
        self.angle = next;
        let wrapped = self.last_angle > self.angle;
        if wrapped {
            self.lap_count += 1;
        }
        wrapped
    }
}

/// Does the arc swept from `from` to `to` (counter-clockwise in angle
/// space) contain `bearing`? The start is exclusive and the end inclusive,
/// so consecutive arcs never report the same bearing twice.
pub fn arc_contains(from: f32, to: f32, bearing: f32) -> bool {
    if from <= to {
        bearing > from && bearing <= to
    } else {
        // wrapped through zero: (from, TAU) and [0, to]
        bearing > from || bearing <= to
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EchoEffect {
    pub origin: Vec2,
    pub start_time: f64,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PingWave {
    pub start_time: f64,
}

/// Echo as handed to the renderer: age instead of absolute start time.
#[derive(Clone, Copy, Debug)]
pub struct EchoView {
    pub origin: Vec2,
    pub age: f32,
    pub color: Color,
}

/// Everything the renderer needs from the clock for one frame.
#[derive(Clone, Debug)]
pub struct SonarSnapshot {
    pub time: f64,
    pub sweep: SweepState,
    pub echoes: Vec<EchoView>,
    pub ping_ages: Vec<f32>,
    pub glows: Vec<f32>,
}

/// Ring radii phases for one ping: the ages of each staggered ring that has
/// already been emitted.
pub fn ping_ring_ages(age: f32) -> impl Iterator<Item = f32> {
    (0..config::PING_RING_COUNT)
        .map(move |k| age - k as f32 * config::PING_RING_STAGGER_SECS)
        .filter(|ring_age| *ring_age >= 0.0)
}

/// Events produced by a single clock tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameEvents {
    pub lap_completed: bool,
    pub crossings: Vec<usize>,
    pub ping_spawned: bool,
}

/// Per-frame scheduler for the sonar display. Time only moves through
/// `tick(dt)`, so tests can drive it with synthetic frame times.
pub struct SonarClock {
    emitter: Vec2,
    obstacles: Vec<Obstacle>,
    bearings: Vec<f32>,
    glows: Vec<f32>,
    sweep: SweepState,
    echoes: SlotArena<EchoEffect>,
    pings: VecDeque<PingWave>,
    phosphor: PhosphorBuffer,
    beam_range: f32,
    angular_velocity: f32,
    time: f64,
    running: bool,
    echoes_spawned: u64,
}

impl SonarClock {
    pub fn new(room: &Room) -> Self {
        let obstacles = room.obstacles().as_slice().to_vec();
        let size = room.size();
        Self {
            emitter: room.emitter(),
            glows: vec![0.0; obstacles.len()],
            bearings: room.bearings().to_vec(),
            obstacles,
            sweep: SweepState::default(),
            echoes: SlotArena::new(),
            pings: VecDeque::with_capacity(4),
            phosphor: PhosphorBuffer::new(size, config::PHOSPHOR_GRID_WIDTH, config::PHOSPHOR_GRID_HEIGHT),
            beam_range: size.length(),
            angular_velocity: config::SWEEP_ANGULAR_VELOCITY,
            time: 0.0,
            running: false,
            echoes_spawned: 0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Freeze the display; a stopped clock ignores ticks.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds of animated time. Kept in f64 so ages stay exact over long
    /// uptimes.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn sweep(&self) -> SweepState {
        self.sweep
    }

    pub fn glows(&self) -> &[f32] {
        &self.glows
    }

    pub fn echo_count(&self) -> usize {
        self.echoes.len()
    }

    pub fn echoes_spawned(&self) -> u64 {
        self.echoes_spawned
    }

    pub fn phosphor(&self) -> &PhosphorBuffer {
        &self.phosphor
    }

    /// Advance the display by one frame of `dt` seconds.
    ///
    /// Order within a tick: sweep, glow decay, pruning, crossings, pings,
    /// phosphor. Glows decay before crossings so a re-trigger resets to 1.0
    /// instead of stacking, and pruning precedes spawning.
    pub fn tick(&mut self, dt: f32) -> FrameEvents {
        let mut events = FrameEvents::default();
        if !self.running || !(dt > 0.0) {
            return events;
        }
        let dt = dt.min(config::MAX_FRAME_DT);
        self.time += dt as f64;

        events.lap_completed = self.sweep.advance(self.angular_velocity * dt);

        for glow in &mut self.glows {
            *glow = (*glow - config::GLOW_DECAY_PER_TICK).max(0.0);
        }

        let now = self.time;
        self.echoes
            .retain(|echo| now - echo.start_time <= config::ECHO_LIFETIME_SECS as f64);
        while let Some(oldest) = self.pings.front() {
            if now - oldest.start_time > config::PING_MAX_AGE_SECS as f64 {
                self.pings.pop_front();
            } else {
                break;
            }
        }

        // declaration order settles ties between obstacles on the same bearing
        for (idx, bearing) in self.bearings.iter().enumerate() {
            if arc_contains(self.sweep.last_angle, self.sweep.angle, *bearing) {
                events.crossings.push(idx);
            }
        }
        for &idx in &events.crossings {
            let obstacle = &self.obstacles[idx];
            self.echoes.insert(EchoEffect {
                origin: obstacle.center(),
                start_time: now,
                color: obstacle.echo_color,
            });
            self.glows[idx] = 1.0;
            self.echoes_spawned += 1;
        }

        let needs_ping = match self.pings.back() {
            None => true,
            Some(newest) => now - newest.start_time > config::PING_INTERVAL_SECS as f64,
        };
        if needs_ping {
            self.pings.push_back(PingWave { start_time: now });
            events.ping_spawned = true;
        }

        self.phosphor.fade(dt);
        self.phosphor
            .stamp_beam(self.emitter, self.sweep.angle, config::BEAM_WIDTH_RAD, self.beam_range);
        for (obstacle, glow) in self.obstacles.iter().zip(&self.glows) {
            self.phosphor.stamp_obstacle(obstacle, *glow);
        }

        events
    }

    pub fn snapshot(&self) -> SonarSnapshot {
        SonarSnapshot {
            time: self.time,
            sweep: self.sweep,
            echoes: self
                .echoes
                .iter()
                .map(|(_, echo)| EchoView {
                    origin: echo.origin,
                    age: (self.time - echo.start_time) as f32,
                    color: echo.color,
                })
                .collect(),
            ping_ages: self.pings.iter().map(|p| (self.time - p.start_time) as f32).collect(),
            glows: self.glows.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::FloorPlan;

    const DT: f32 = 1.0 / 60.0;

    fn plan_with_bearings(angles: &[f32]) -> FloorPlan {
        let mut plan = FloorPlan::empty(20.0, 20.0, vec2(10.0, 10.0));
        for (i, angle) in angles.iter().enumerate() {
            let center = vec2(10.0, 10.0) + Vec2::from_angle(*angle) * 6.0;
            plan.obstacles.push(Obstacle::new(
                &format!("crate-{i}"),
                center.x - 0.25,
                center.y - 0.25,
                0.5,
                0.5,
                0.5,
            ));
        }
        plan
    }

    fn running_clock(angles: &[f32]) -> SonarClock {
        let room = Room::build(plan_with_bearings(angles)).unwrap();
        let mut clock = SonarClock::new(&room);
        clock.start();
        clock
    }

    #[test]
    fn arc_test_handles_wraparound() {
        assert!(arc_contains(0.5, 1.0, 0.75));
        assert!(arc_contains(0.5, 1.0, 1.0));
        assert!(!arc_contains(0.5, 1.0, 0.5));
        assert!(arc_contains(6.2, 0.1, 6.25));
        assert!(arc_contains(6.2, 0.1, 0.0));
        assert!(arc_contains(6.2, 0.1, 0.05));
        assert!(!arc_contains(6.2, 0.1, 3.0));
    }

    #[test]
    fn one_rotation_is_one_lap_and_one_echo_per_obstacle() {
        let angles = [0.3, 1.9, 3.2, 4.4, 5.9];
        let mut clock = running_clock(&angles);
        let mut per_obstacle = vec![0u32; angles.len()];
        let mut swept = 0.0f32;
        while swept < TAU {
            let events = clock.tick(DT);
            swept += config::SWEEP_ANGULAR_VELOCITY * DT;
            for idx in events.crossings {
                per_obstacle[idx] += 1;
            }
        }
        assert_eq!(clock.sweep().lap_count, 1);
        assert_eq!(per_obstacle, vec![1; angles.len()]);
        assert_eq!(clock.echoes_spawned(), angles.len() as u64);
    }

    #[test]
    fn shared_bearings_fire_in_declaration_order() {
        let mut clock = running_clock(&[1.0, 1.0]);
        let mut seen = Vec::new();
        for _ in 0..120 {
            seen.extend(clock.tick(DT).crossings);
        }
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn echoes_and_pings_are_pruned_past_their_lifetimes() {
        let mut clock = running_clock(&[0.2, 2.0, 4.0]);
        for _ in 0..(60 * 20) {
            clock.tick(DT);
            let snap = clock.snapshot();
            assert!(snap.echoes.iter().all(|e| e.age <= config::ECHO_LIFETIME_SECS));
            assert!(snap.ping_ages.iter().all(|age| *age <= config::PING_MAX_AGE_SECS));
            assert!(snap.ping_ages.len() <= 2);
        }
    }

    #[test]
    fn pings_spawn_on_the_interval() {
        let mut clock = running_clock(&[]);
        let first = clock.tick(DT);
        assert!(first.ping_spawned);
        let mut spawned_at = Vec::new();
        for _ in 0..(60 * 8) {
            if clock.tick(DT).ping_spawned {
                spawned_at.push(clock.time());
            }
        }
        assert_eq!(spawned_at.len(), 2);
        let expected = (DT + config::PING_INTERVAL_SECS) as f64;
        assert!((spawned_at[0] - expected).abs() < 2.0 * DT as f64);
    }

    #[test]
    fn glow_resets_on_crossing_then_decays_linearly() {
        let mut clock = running_clock(&[0.05]);
        let mut crossed = false;
        for _ in 0..10 {
            if !clock.tick(DT).crossings.is_empty() {
                crossed = true;
                break;
            }
        }
        assert!(crossed);
        assert_eq!(clock.glows()[0], 1.0);
        clock.tick(DT);
        assert!((clock.glows()[0] - (1.0 - config::GLOW_DECAY_PER_TICK)).abs() < 1e-6);
        for _ in 0..100 {
            clock.tick(DT);
        }
        assert_eq!(clock.glows()[0], 0.0);
    }

    #[test]
    fn stopped_clock_does_not_advance() {
        let mut clock = running_clock(&[1.0]);
        clock.tick(DT);
        let before = clock.sweep();
        clock.stop();
        let events = clock.tick(DT);
        assert_eq!(events, FrameEvents::default());
        assert_eq!(clock.sweep(), before);
        clock.start();
        clock.tick(DT);
        assert!(clock.sweep().angle > before.angle);
    }

    #[test]
    fn oversized_frames_are_clamped_below_a_full_turn() {
        let mut clock = running_clock(&[2.0]);
        clock.tick(10.0);
        assert!((clock.time() - config::MAX_FRAME_DT as f64).abs() < 1e-6);
        assert_eq!(clock.sweep().lap_count, 0);
    }

    #[test]
    fn ring_ages_are_staggered() {
        let ages: Vec<f32> = ping_ring_ages(0.5).collect();
        assert_eq!(ages.len(), 2);
        assert!((ages[1] - (0.5 - config::PING_RING_STAGGER_SECS)).abs() < 1e-6);
        assert_eq!(ping_ring_ages(2.0).count(), config::PING_RING_COUNT);
    }

    #[test]
    fn clock_keeps_advancing_after_days_of_uptime() {
        let angles = [0.2, 2.0, 4.0];
        let mut clock = running_clock(&angles);
        clock.time = 600_000.0;
        let start = clock.time();
        let mut pings_seen = 0;
        for _ in 0..(60 * 20) {
            if clock.tick(DT).ping_spawned {
                pings_seen += 1;
            }
            assert!(clock.echo_count() <= angles.len());
        }
        let advanced = clock.time() - start;
        assert!((advanced - 20.0).abs() < 0.05, "advanced {advanced} s");
        assert!(pings_seen >= 5);
        assert!(clock.snapshot().echoes.iter().all(|e| e.age <= config::ECHO_LIFETIME_SECS));
    }
}
