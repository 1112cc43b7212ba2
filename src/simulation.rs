use ::rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config;
use crate::disturbance::{DisturbanceEngine, DisturbanceSnapshot};
use crate::event_log::{EventLog, LogSink, Severity};
use crate::markers::{self, DetectionMarker, MarkerTracker};
use crate::room::Room;
use crate::sonar::{FrameEvents, SonarClock, SonarSnapshot};
use crate::waveform::WaveformSampler;

/// Everything behind the surveillance display, advanced once per frame.
pub struct SimState {
    pub room: Room,
    pub engine: DisturbanceEngine,
    pub clock: SonarClock,
    pub markers: MarkerTracker,
    pub log: EventLog,
    pub waveform: WaveformSampler,
    pub rng: ChaCha8Rng,
    pub elapsed: f64,
}

impl SimState {
    /// The sweep animates from the start; scanning stays off until asked.
    pub fn new(room: Room, seed: u64, sensitivity: f32) -> Self {
        let mut clock = SonarClock::new(&room);
        clock.start();
        info!(
            obstacles = room.obstacles().len(),
            zones = room.zones().len(),
            seed,
            "room ready"
        );
        Self {
            room,
            engine: DisturbanceEngine::new(sensitivity),
            clock,
            markers: MarkerTracker::default(),
            log: EventLog::new(config::EVENT_LOG_CAPACITY),
            waveform: WaveformSampler::new(seed as u32),
            rng: ChaCha8Rng::seed_from_u64(seed),
            elapsed: 0.0,
        }
    }

    /// Advance one display frame: the disturbance timer catches up on its
    /// own 50 ms cadence, the sonar clock and markers step once. Log lines
    /// from each engine tick carry that tick's own time.
    pub fn frame(&mut self, dt: f32) -> FrameEvents {
        let frame_start = self.elapsed;
        for offset in self.engine.due_ticks(dt) {
            self.log.set_clock(frame_start + offset as f64);
            self.engine.tick(&mut self.rng, &mut self.log);
        }
        self.elapsed += dt.max(0.0) as f64;
        self.log.set_clock(self.elapsed);

        let events = self.clock.tick(dt);
        if events.lap_completed {
            debug!(lap = self.clock.sweep().lap_count, "sweep lap");
        }
        if self.clock.is_running() {
            self.markers.tick();
            self.markers.take_expired();
        }
        events
    }

    pub fn set_scanning(&mut self, on: bool) {
        self.log.set_clock(self.elapsed);
        self.engine.set_scanning(on, &mut self.rng, &mut self.log);
    }

    pub fn toggle_scanning(&mut self) {
        let on = !self.engine.is_scanning();
        self.set_scanning(on);
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        let before = self.engine.sensitivity();
        self.engine.set_sensitivity(sensitivity);
        if (self.engine.sensitivity() - before).abs() >= 1.0 {
            debug!(sensitivity = self.engine.sensitivity(), "sensitivity changed");
        }
    }

    pub fn trigger_manual_event(&mut self) {
        self.log.set_clock(self.elapsed);
        self.engine.trigger_manual_event(&mut self.log);
    }

    pub fn toggle_animation(&mut self) {
        if self.clock.is_running() {
            self.clock.stop();
        } else {
            self.clock.start();
        }
    }

    pub fn inject_demo_detection(&mut self) -> DetectionMarker {
        let marker = markers::demo_detection(&mut self.rng);
        self.markers.push(marker);
        self.log.set_clock(self.elapsed);
        self.log.emit(
            &format!(
                "{} detected at {:.1} m ({:.0}% confidence)",
                marker.kind.label(),
                marker.metrics.distance_m,
                marker.metrics.confidence_pct
            ),
            Severity::Info,
        );
        marker
    }

    pub fn disturbance(&self) -> DisturbanceSnapshot {
        self.engine.snapshot()
    }

    pub fn sonar(&self) -> SonarSnapshot {
        self.clock.snapshot()
    }

    pub fn waveform_samples(&self) -> Vec<f32> {
        self.waveform
            .samples(self.elapsed, self.engine.value(), config::WAVEFORM_SAMPLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::FloorPlan;

    fn sim() -> SimState {
        let room = Room::build(FloorPlan::default_apartment()).unwrap();
        SimState::new(room, 42, 65.0)
    }

    #[test]
    fn fresh_display_sweeps_without_any_toggle() {
        let mut sim = sim();
        assert!(sim.clock.is_running());
        assert!(!sim.engine.is_scanning());
        for _ in 0..30 {
            sim.frame(1.0 / 60.0);
        }
        assert!(sim.clock.sweep().angle > 0.0);
        assert!(sim.clock.time() > 0.45);
        assert_eq!(sim.engine.ticks(), 0);
    }

    #[test]
    fn frames_drive_both_timers() {
        let mut sim = sim();
        sim.set_scanning(true);
        for _ in 0..60 {
            sim.frame(1.0 / 60.0);
        }
        assert!(sim.clock.time() > 0.9);
        assert!(sim.engine.ticks() >= 19 && sim.engine.ticks() <= 20);
        assert_eq!(sim.disturbance().history.len(), config::HISTORY_LEN);
    }

    #[test]
    fn scan_toggle_is_logged_and_resets() {
        let mut sim = sim();
        sim.toggle_scanning();
        sim.trigger_manual_event();
        assert!(sim.engine.value() >= 60.0);

        sim.toggle_scanning();
        assert_eq!(sim.engine.value(), 0.0);
        assert_eq!(sim.log.count(Severity::Success), 1);
        assert_eq!(sim.log.count(Severity::Danger), 1);
        assert_eq!(sim.log.count(Severity::System), 1);
    }

    #[test]
    fn catch_up_ticks_are_stamped_with_their_own_time() {
        let mut sim = sim();
        sim.set_scanning(true);
        let frame = 0.5f32;
        for _ in 0..240 {
            sim.frame(frame);
        }
        let event_times: Vec<f64> = sim
            .log
            .entries()
            .filter(|e| matches!(e.severity, Severity::Info | Severity::Warning | Severity::Danger))
            .map(|e| e.time)
            .collect();
        assert!(!event_times.is_empty());
        assert!(event_times.windows(2).all(|w| w[0] <= w[1]));
        assert!(event_times.iter().all(|t| *t <= sim.elapsed));
        let off_boundary = event_times
            .iter()
            .filter(|t| {
                let phase = (*t / frame as f64).fract();
                phase > 1e-3 && phase < 1.0 - 1e-3
            })
            .count();
        assert!(off_boundary > 0, "every event carried a frame-start timestamp");
    }

    #[test]
    fn expired_markers_are_dropped_by_the_frame_loop() {
        let mut sim = sim();
        sim.inject_demo_detection();
        let ticks = (1.0 / config::MARKER_DECAY_PER_TICK).ceil() as usize;
        for _ in 0..ticks {
            sim.frame(1.0 / 60.0);
        }
        assert!(sim.markers.live().is_empty());
        assert_eq!(sim.markers.history().count(), 1);
        assert_eq!(sim.log.count(Severity::Info), 1);
    }

    #[test]
    fn paused_animation_keeps_markers() {
        let mut sim = sim();
        sim.toggle_animation();
        sim.inject_demo_detection();
        for _ in 0..10 {
            sim.frame(1.0 / 60.0);
        }
        assert_eq!(sim.markers.live()[0].alpha, 1.0);
        assert_eq!(sim.clock.time(), 0.0);
    }
}
