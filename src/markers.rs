use std::collections::VecDeque;

use ::rand::Rng;

use crate::config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionKind {
    Bird,
    Rabbit,
    Animal,
    Adolescent,
    Adult,
}

impl DetectionKind {
    pub const ALL: [Self; 5] = [
        Self::Bird,
        Self::Rabbit,
        Self::Animal,
        Self::Adolescent,
        Self::Adult,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Bird => "Bird",
            Self::Rabbit => "Rabbit",
            Self::Animal => "Animal",
            Self::Adolescent => "Adolescent",
            Self::Adult => "Adult",
        }
    }

    /// Plausible body height range in meters.
    fn height_range(self) -> (f32, f32) {
        match self {
            Self::Bird => (0.1, 0.4),
            Self::Rabbit => (0.2, 0.45),
            Self::Animal => (0.3, 0.9),
            Self::Adolescent => (1.2, 1.65),
            Self::Adult => (1.55, 1.95),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionMetrics {
    pub height_m: f32,
    pub distance_m: f32,
    pub confidence_pct: f32,
}

/// A detection placed on the display; position is normalised to 0..1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionMarker {
    pub kind: DetectionKind,
    pub x: f32,
    pub y: f32,
    pub metrics: DetectionMetrics,
    pub alpha: f32,
}

impl DetectionMarker {
    pub fn new(kind: DetectionKind, x: f32, y: f32, metrics: DetectionMetrics) -> Self {
        Self {
            kind,
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
            metrics,
            alpha: 1.0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.alpha <= config::MARKER_ALPHA_EPSILON
    }

    /// Linear fade; snaps to exactly zero once below the epsilon.
    fn decay(&mut self, rate: f32) {
        let next = self.alpha - rate;
        self.alpha = if next <= config::MARKER_ALPHA_EPSILON {
            0.0
        } else {
            next
        };
    }
}

/// Ages live markers and keeps a short trailing history. Live markers fade
/// with time; history entries fade by rank only.
pub struct MarkerTracker {
    live: Vec<DetectionMarker>,
    history: VecDeque<DetectionMarker>,
    decay_rate: f32,
}

impl Default for MarkerTracker {
    fn default() -> Self {
        Self::new(config::MARKER_DECAY_PER_TICK)
    }
}

impl MarkerTracker {
    pub fn new(decay_rate: f32) -> Self {
        Self {
            live: Vec::new(),
            history: VecDeque::with_capacity(config::MARKER_HISTORY_LEN),
            decay_rate: decay_rate.max(f32::EPSILON),
        }
    }

    pub fn push(&mut self, marker: DetectionMarker) {
        if self.history.len() >= config::MARKER_HISTORY_LEN {
            self.history.pop_back();
        }
        self.history.push_front(marker);
        self.live.push(marker);
    }

    /// Fade every live marker by one step. Expired markers stay in the list
    /// until the consumer takes them.
    pub fn tick(&mut self) {
        for marker in &mut self.live {
            marker.decay(self.decay_rate);
        }
    }

    pub fn live(&self) -> &[DetectionMarker] {
        &self.live
    }

    /// Remove and return the markers that have fully faded.
    pub fn take_expired(&mut self) -> Vec<DetectionMarker> {
        let (expired, live): (Vec<_>, Vec<_>) = self.live.drain(..).partition(|m| m.is_expired());
        self.live = live;
        expired
    }

    /// History, newest first, paired with its rank-based opacity.
    pub fn history(&self) -> impl Iterator<Item = (&DetectionMarker, f32)> {
        self.history
            .iter()
            .enumerate()
            .map(|(rank, m)| (m, history_opacity(rank)))
    }
}

/// Opacity of the `rank`-th newest history entry.
pub fn history_opacity(rank: usize) -> f32 {
    (1.0 - rank as f32 * config::MARKER_HISTORY_RANK_FADE).max(config::MARKER_HISTORY_MIN_OPACITY)
}

/// Random detection for the demo key binding.
pub fn demo_detection(rng: &mut impl Rng) -> DetectionMarker {
    let kind = DetectionKind::ALL[rng.gen_range(0..DetectionKind::ALL.len())];
    let (lo, hi) = kind.height_range();
    let metrics = DetectionMetrics {
        height_m: rng.gen_range(lo..hi),
        distance_m: rng.gen_range(0.8..7.5),
        confidence_pct: rng.gen_range(62.0..99.0),
    };
    DetectionMarker::new(kind, rng.gen_range(0.08..0.92), rng.gen_range(0.08..0.92), metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn marker(kind: DetectionKind) -> DetectionMarker {
        DetectionMarker::new(
            kind,
            0.4,
            0.6,
            DetectionMetrics {
                height_m: 1.7,
                distance_m: 3.2,
                confidence_pct: 91.0,
            },
        )
    }

    #[test]
    fn alpha_is_non_increasing_and_hits_zero_on_schedule() {
        let mut tracker = MarkerTracker::default();
        tracker.push(marker(DetectionKind::Adult));
        let budget = (1.0f32 / config::MARKER_DECAY_PER_TICK).ceil() as usize;

        let mut previous = 1.0;
        for _ in 0..budget {
            tracker.tick();
            let alpha = tracker.live()[0].alpha;
            assert!(alpha <= previous);
            previous = alpha;
        }
        assert_eq!(previous, 0.0);

        tracker.tick();
        assert_eq!(tracker.live()[0].alpha, 0.0);
    }

    #[test]
    fn tracker_never_drops_markers_on_its_own() {
        let mut tracker = MarkerTracker::new(0.5);
        tracker.push(marker(DetectionKind::Bird));
        for _ in 0..10 {
            tracker.tick();
        }
        assert_eq!(tracker.live().len(), 1);
        assert!(tracker.live()[0].is_expired());

        let expired = tracker.take_expired();
        assert_eq!(expired.len(), 1);
        assert!(tracker.live().is_empty());
    }

    #[test]
    fn take_expired_keeps_fresh_markers() {
        let mut tracker = MarkerTracker::new(0.5);
        tracker.push(marker(DetectionKind::Rabbit));
        tracker.tick();
        tracker.tick();
        tracker.push(marker(DetectionKind::Adult));
        let expired = tracker.take_expired();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind, DetectionKind::Rabbit);
        assert_eq!(tracker.live()[0].kind, DetectionKind::Adult);
    }

    #[test]
    fn history_fades_by_rank_not_time() {
        let mut tracker = MarkerTracker::default();
        for kind in DetectionKind::ALL {
            tracker.push(marker(kind));
        }
        let before: Vec<f32> = tracker.history().map(|(_, o)| o).collect();
        for _ in 0..50 {
            tracker.tick();
        }
        let after: Vec<f32> = tracker.history().map(|(_, o)| o).collect();
        assert_eq!(before, after);
        assert_eq!(after[0], 1.0);
        assert!(after.windows(2).all(|w| w[0] > w[1]));

        let newest = tracker.history().next().unwrap().0;
        assert_eq!(newest.kind, DetectionKind::Adult);
    }

    #[test]
    fn history_is_bounded_with_an_opacity_floor() {
        let mut tracker = MarkerTracker::default();
        for _ in 0..(config::MARKER_HISTORY_LEN + 5) {
            tracker.push(marker(DetectionKind::Animal));
        }
        assert_eq!(tracker.history().count(), config::MARKER_HISTORY_LEN);
        assert_eq!(history_opacity(50), config::MARKER_HISTORY_MIN_OPACITY);
    }

    #[test]
    fn demo_detections_are_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            let m = demo_detection(&mut rng);
            assert!((0.0..=1.0).contains(&m.x) && (0.0..=1.0).contains(&m.y));
            assert!(m.metrics.confidence_pct >= 62.0 && m.metrics.confidence_pct < 99.0);
            assert_eq!(m.alpha, 1.0);
        }
    }
}
