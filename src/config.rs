// All tunable display and simulation constants in one place.

use std::f32::consts::TAU;

// Signal field
pub const FIELD_GRID_WIDTH: usize = 120;
pub const FIELD_GRID_HEIGHT: usize = 90;
pub const FIELD_FALLOFF_EXPONENT: f32 = 1.75; // picked for heatmap contrast, not physics
pub const FIELD_MIN_DISTANCE: f32 = 0.22;
pub const FIELD_ATTENUATION_SCALE: f32 = 0.88;
pub const ZONE_WINDOW: usize = 11;

// Disturbance engine
pub const DISTURBANCE_TICK_SECS: f32 = 0.05;
pub const DISTURBANCE_MAX: f32 = 100.0;
pub const RECOVERY_BASE: f32 = 3.0;
pub const RECOVERY_PER_SENSITIVITY: f32 = 0.02;
pub const RECOVERY_MIN: f32 = 0.2;
pub const IMPACT_SENSITIVITY_DIVISOR: f32 = 70.0;
pub const FLICKER_ROLL_MAX: f32 = 0.55;
pub const MODERATE_ROLL_MAX: f32 = 0.85;
pub const FLICKER_IMPACT: (f32, f32) = (10.0, 30.0);
pub const MODERATE_IMPACT: (f32, f32) = (35.0, 60.0);
pub const ALERT_IMPACT: (f32, f32) = (65.0, 95.0);
pub const DANGER_IMPACT_THRESHOLD: f32 = 60.0;
pub const WARNING_IMPACT_THRESHOLD: f32 = 30.0;
pub const NEXT_EVENT_SECS: (f32, f32) = (4.0, 14.0);
pub const FIRST_EVENT_SECS: (f32, f32) = (3.0, 8.0);
pub const MANUAL_EVENT_BASE: f32 = 60.0;
pub const MANUAL_EVENT_PER_SENSITIVITY: f32 = 0.4;
pub const SIGNAL_QUALITY_BASE: f32 = 90.0;
pub const SIGNAL_QUALITY_NOISE: f32 = 6.0;
pub const SIGNAL_QUALITY_PER_DISTURBANCE: f32 = 0.8;
pub const HISTORY_LEN: usize = 120;
pub const DEFAULT_SENSITIVITY: f32 = 65.0;

// Alert gauge
pub const ELEVATED_THRESHOLD: f32 = 30.0;
pub const ALERT_THRESHOLD: f32 = 60.0;

// Sonar clock
pub const SWEEP_PERIOD_SECS: f32 = 4.0;
pub const SWEEP_ANGULAR_VELOCITY: f32 = TAU / SWEEP_PERIOD_SECS;
pub const MAX_FRAME_DT: f32 = 0.1;
pub const ECHO_LIFETIME_SECS: f32 = 3.2;
pub const PING_INTERVAL_SECS: f32 = 3.5;
pub const PING_MAX_AGE_SECS: f32 = 5.5;
pub const PING_RING_COUNT: usize = 3;
pub const PING_RING_STAGGER_SECS: f32 = 0.45;
pub const GLOW_DECAY_PER_TICK: f32 = 0.025;

// Phosphor persistence
pub const PHOSPHOR_GRID_WIDTH: usize = 96;
pub const PHOSPHOR_GRID_HEIGHT: usize = 72;
pub const PHOSPHOR_RETENTION_PER_SEC: f32 = 0.45;
pub const PHOSPHOR_VISIBLE_THRESHOLD: f32 = 0.02;
pub const BEAM_WIDTH_RAD: f32 = 0.35;
pub const GLOW_STAMP_SCALE: f32 = 0.6;

// Detection markers
pub const MARKER_DECAY_PER_TICK: f32 = 0.003;
pub const MARKER_ALPHA_EPSILON: f32 = 1e-4;
pub const MARKER_HISTORY_LEN: usize = 8;
pub const MARKER_HISTORY_RANK_FADE: f32 = 0.12;
pub const MARKER_HISTORY_MIN_OPACITY: f32 = 0.25;

// Event log
pub const EVENT_LOG_CAPACITY: usize = 200;

// Waveform
pub const WAVEFORM_SAMPLES: usize = 160;
pub const WAVEFORM_BASELINE_AMPLITUDE: f32 = 0.08;

// Soak run
pub const SOAK_EXCURSION_THRESHOLD: f32 = 10.0;
pub const DEFAULT_SOAK_TICKS: u64 = 1000;
pub const DEFAULT_SEED: u64 = 7;
