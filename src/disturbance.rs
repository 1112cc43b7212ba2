use ::rand::Rng;

use crate::config;
use crate::event_log::{LogSink, Severity};
use crate::history::HistoryRing;
use crate::scheduler::FixedStepTimer;

/// Severity band of a random interference event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventTier {
    Flicker,
    Moderate,
    Alert,
}

impl EventTier {
    /// Map a uniform roll in [0, 1) onto the 55 / 30 / 15 split.
    pub fn from_roll(roll: f32) -> Self {
        if roll < config::FLICKER_ROLL_MAX {
            Self::Flicker
        } else if roll < config::MODERATE_ROLL_MAX {
            Self::Moderate
        } else {
            Self::Alert
        }
    }

    pub fn impact_range(self) -> (f32, f32) {
        match self {
            Self::Flicker => config::FLICKER_IMPACT,
            Self::Moderate => config::MODERATE_IMPACT,
            Self::Alert => config::ALERT_IMPACT,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Flicker => "Signal flicker",
            Self::Moderate => "Moderate interference",
            Self::Alert => "Strong disturbance",
        }
    }
}

/// Log severity for an event of the given impact.
pub fn impact_severity(impact: f32) -> Severity {
    if impact > config::DANGER_IMPACT_THRESHOLD {
        Severity::Danger
    } else if impact > config::WARNING_IMPACT_THRESHOLD {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// Per-tick loss of disturbance; more sensitive sensors hold it longer.
pub fn recovery_per_tick(sensitivity: f32) -> f32 {
    (config::RECOVERY_BASE - sensitivity * config::RECOVERY_PER_SENSITIVITY).max(config::RECOVERY_MIN)
}

/// Gauge band for the current disturbance value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertLevel {
    Calm,
    Elevated,
    Alert,
}

impl AlertLevel {
    pub fn from_value(value: f32) -> Self {
        if value >= config::ALERT_THRESHOLD {
            Self::Alert
        } else if value >= config::ELEVATED_THRESHOLD {
            Self::Elevated
        } else {
            Self::Calm
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Calm => "CALM",
            Self::Elevated => "ELEVATED",
            Self::Alert => "ALERT",
        }
    }
}

/// Read-only copy of the engine state for the renderer and UI.
#[derive(Clone, Debug)]
pub struct DisturbanceSnapshot {
    pub value: f32,
    pub history: Vec<f32>,
    pub scanning: bool,
    pub sensitivity: f32,
    pub level: AlertLevel,
    pub flash_intensity: f32,
}

/// What happened during one engine tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomEvent {
    pub tier: EventTier,
    pub impact: f32,
}

/// Simulated environmental interference: decays on its own and is kicked up
/// by randomized events. Idle while scanning is off.
pub struct DisturbanceEngine {
    value: f32,
    history: HistoryRing,
    next_event_countdown: u32,
    sensitivity: f32,
    timer: FixedStepTimer,
    ticks: u64,
}

impl Default for DisturbanceEngine {
    fn default() -> Self {
        Self::new(config::DEFAULT_SENSITIVITY)
    }
}

fn secs_to_ticks(secs: f32) -> u32 {
    ((secs / config::DISTURBANCE_TICK_SECS).round() as u32).max(1)
}

fn draw_countdown(rng: &mut impl Rng, range: (f32, f32)) -> u32 {
    secs_to_ticks(rng.gen_range(range.0..range.1))
}

impl DisturbanceEngine {
    pub fn new(sensitivity: f32) -> Self {
        let mut engine = Self {
            value: 0.0,
            history: HistoryRing::new(config::HISTORY_LEN),
            next_event_countdown: 0,
            sensitivity: config::DEFAULT_SENSITIVITY,
            timer: FixedStepTimer::new(config::DISTURBANCE_TICK_SECS),
            ticks: 0,
        };
        engine.set_sensitivity(sensitivity);
        engine
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn is_scanning(&self) -> bool {
        self.timer.is_running()
    }

    pub fn next_event_countdown(&self) -> u32 {
        self.next_event_countdown
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Out-of-range input is clamped, never rejected.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = if sensitivity.is_nan() {
            config::DEFAULT_SENSITIVITY
        } else {
            sensitivity.clamp(0.0, 100.0)
        };
    }

    /// Idle -> Active schedules the first event a few seconds out.
    /// Active -> Idle cancels the timer and zeroes the state at once.
    pub fn set_scanning(&mut self, on: bool, rng: &mut impl Rng, sink: &mut dyn LogSink) {
        if on == self.is_scanning() {
            return;
        }
        if on {
            self.value = 0.0;
            self.history.clear();
            self.next_event_countdown = draw_countdown(rng, config::FIRST_EVENT_SECS);
            self.timer.start();
            sink.emit("Scan started: monitoring for interference", Severity::Success);
        } else {
            self.timer.stop();
            self.value = 0.0;
            self.history.clear();
            self.next_event_countdown = 0;
            sink.emit("Scan stopped", Severity::System);
        }
    }

    /// Force an alert-grade disturbance immediately. No-op while idle.
    pub fn trigger_manual_event(&mut self, sink: &mut dyn LogSink) {
        if !self.is_scanning() {
            return;
        }
        self.value = (config::MANUAL_EVENT_BASE + self.sensitivity * config::MANUAL_EVENT_PER_SENSITIVITY)
            .min(config::DISTURBANCE_MAX);
        sink.emit(
            &format!("Manual disturbance triggered (level {:.0})", self.value),
            Severity::Danger,
        );
    }

    /// Feed frame time. Returns the offset within the frame of each 50 ms
    /// tick that came due; the caller runs `tick` once per entry.
    pub fn due_ticks(&mut self, elapsed: f32) -> Vec<f32> {
        self.timer.due_offsets(elapsed)
    }

    /// One engine period: recovery, event countdown, quality sample.
    pub fn tick(&mut self, rng: &mut impl Rng, sink: &mut dyn LogSink) -> Option<RandomEvent> {
        if !self.is_scanning() {
            return None;
        }
        self.ticks += 1;

        self.value = (self.value - recovery_per_tick(self.sensitivity)).max(0.0);

        let mut fired = None;
        self.next_event_countdown = self.next_event_countdown.saturating_sub(1);
        if self.next_event_countdown == 0 {
            let event = self.roll_event(rng);
            self.apply_event(event, sink);
            self.next_event_countdown = draw_countdown(rng, config::NEXT_EVENT_SECS);
            fired = Some(event);
        }

        let noise = rng.gen_range(0.0..config::SIGNAL_QUALITY_NOISE);
        let quality = (config::SIGNAL_QUALITY_BASE + noise
            - self.value * config::SIGNAL_QUALITY_PER_DISTURBANCE)
            .clamp(0.0, 100.0);
        self.history.push(quality);

        fired
    }

    fn roll_event(&self, rng: &mut impl Rng) -> RandomEvent {
        let tier = EventTier::from_roll(rng.gen::<f32>());
        let (lo, hi) = tier.impact_range();
        RandomEvent {
            tier,
            impact: rng.gen_range(lo..hi),
        }
    }

    fn apply_event(&mut self, event: RandomEvent, sink: &mut dyn LogSink) {
        let gain = event.impact * self.sensitivity / config::IMPACT_SENSITIVITY_DIVISOR;
        self.value = (self.value + gain).min(config::DISTURBANCE_MAX);
        sink.emit(
            &format!("{} detected (impact {:.0})", event.tier.describe(), event.impact),
            impact_severity(event.impact),
        );
    }

    /// 0..1 intensity for the alert flash overlay.
    pub fn flash_intensity(&self) -> f32 {
        ((self.value - config::ALERT_THRESHOLD) / (config::DISTURBANCE_MAX - config::ALERT_THRESHOLD))
            .clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> DisturbanceSnapshot {
        DisturbanceSnapshot {
            value: self.value,
            history: self.history.padded(),
            scanning: self.is_scanning(),
            sensitivity: self.sensitivity,
            level: AlertLevel::from_value(self.value),
            flash_intensity: self.flash_intensity(),
        }
    }
}
