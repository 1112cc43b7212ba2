use std::collections::BTreeMap;
use std::path::Path;

use ::rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config;
use crate::disturbance::{recovery_per_tick, DisturbanceEngine};
use crate::error::SoakError;
use crate::event_log::{LogSink, Severity};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub p50: f32,
    pub p90: f32,
    pub p99: f32,
}

impl SeriesSummary {
    pub fn from_samples(samples: &[f32]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self {
            count: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sorted.iter().sum::<f32>() / sorted.len() as f32,
            p50: nearest_rank(&sorted, 0.50),
            p90: nearest_rank(&sorted, 0.90),
            p99: nearest_rank(&sorted, 0.99),
        }
    }
}

fn nearest_rank(sorted: &[f32], p: f32) -> f32 {
    let rank = ((p.clamp(0.0, 1.0) * sorted.len() as f32).ceil() as usize).saturating_sub(1);
    sorted[rank.min(sorted.len() - 1)]
}

#[derive(Debug, Clone, Serialize)]
pub struct SoakCheck {
    pub name: String,
    pub passed: bool,
    pub details: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoakReport {
    pub seed: u64,
    pub sensitivity: f32,
    pub ticks: u64,
    pub overall_status: String,
    pub value: SeriesSummary,
    pub excursions: usize,
    pub events_by_severity: BTreeMap<&'static str, usize>,
    pub checks: Vec<SoakCheck>,
}

impl SoakReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), SoakError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Count rising crossings of `threshold` in a value series.
pub fn count_excursions(values: &[f32], threshold: f32) -> usize {
    let mut above = false;
    let mut count = 0;
    for &v in values {
        if v > threshold && !above {
            count += 1;
        }
        above = v > threshold;
    }
    count
}

/// Between consecutive event ticks, the series must fall back to within
/// one recovery step of zero. Returns the worst floor seen.
pub fn worst_recovery_floor(values: &[f32], event_ticks: &[usize]) -> f32 {
    event_ticks
        .windows(2)
        .map(|pair| {
            values[pair[0]..pair[1]]
                .iter()
                .copied()
                .fold(f32::MAX, f32::min)
        })
        .fold(0.0, f32::max)
}

/// Run the disturbance engine headless with scanning on and no manual
/// triggers, then evaluate the behavioural checks.
pub fn run(seed: u64, sensitivity: f32, ticks: u64) -> SoakReport {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut engine = DisturbanceEngine::new(sensitivity);
    let mut severities: BTreeMap<&'static str, usize> =
        Severity::ALL.iter().map(|s| (s.label(), 0)).collect();
    let mut sink = |_: &str, severity: Severity| {
        *severities.entry(severity.label()).or_default() += 1;
    };

    engine.set_scanning(true, &mut rng, &mut sink);

    let mut values = Vec::with_capacity(ticks as usize);
    let mut event_ticks = Vec::new();
    let mut out_of_range = 0usize;
    for tick in 0..ticks as usize {
        if engine.tick(&mut rng, &mut sink).is_some() {
            event_ticks.push(tick);
        }
        let v = engine.value();
        if !(0.0..=config::DISTURBANCE_MAX).contains(&v) {
            out_of_range += 1;
        }
        values.push(v);
    }
    let history_len = engine.history().len();
    sink.emit("soak complete", Severity::System);

    let sensitivity = engine.sensitivity();
    let recovery = recovery_per_tick(sensitivity);
    let excursions = count_excursions(&values, config::SOAK_EXCURSION_THRESHOLD);
    let floor = worst_recovery_floor(&values, &event_ticks);

    let checks = vec![
        SoakCheck {
            name: "value_within_bounds".to_string(),
            passed: out_of_range == 0,
            details: format!("out_of_range_samples={out_of_range}"),
        },
        SoakCheck {
            name: "excursion_above_threshold".to_string(),
            passed: excursions > 0,
            details: format!(
                "excursions={excursions}, threshold={}",
                config::SOAK_EXCURSION_THRESHOLD
            ),
        },
        SoakCheck {
            name: "recovers_between_events".to_string(),
            passed: floor <= recovery,
            details: format!("worst_floor={floor:.3}, recovery_per_tick={recovery:.3}"),
        },
        SoakCheck {
            name: "history_bounded".to_string(),
            passed: history_len <= config::HISTORY_LEN,
            details: format!("history_len={history_len}, capacity={}", config::HISTORY_LEN),
        },
    ];

    let mut report = SoakReport {
        seed,
        sensitivity,
        ticks,
        overall_status: String::new(),
        value: SeriesSummary::from_samples(&values),
        excursions,
        events_by_severity: severities,
        checks,
    };
    report.overall_status = if report.passed() { "PASS" } else { "FAIL" }.to_string();
    report
}
