/// Fixed-period timer driven by variable frame times.
///
/// Frame time is accumulated and converted into whole ticks, so a periodic
/// job runs at the same cadence regardless of the render rate. Stopping the
/// timer cancels it synchronously: pending fractional time is discarded.
#[derive(Clone, Debug)]
pub struct FixedStepTimer {
    period: f32,
    accumulator: f32,
    running: bool,
    max_catch_up: u32,
}

impl FixedStepTimer {
    pub fn new(period: f32) -> Self {
        assert!(period > 0.0, "timer period must be positive");
        Self {
            period,
            accumulator: 0.0,
            running: false,
            max_catch_up: 20,
        }
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    /// Feed elapsed time; returns how many ticks are due. Long stalls are
    /// capped so a hitch does not cause a burst of catch-up ticks.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if !self.running || !(elapsed > 0.0) {
            return 0;
        }
        self.accumulator += elapsed;
        let mut due = 0;
        while self.accumulator >= self.period {
            self.accumulator -= self.period;
            due += 1;
            if due >= self.max_catch_up {
                self.accumulator = 0.0;
                break;
            }
        }
        due
    }

    /// Time carried over toward the next tick.
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Like [`advance`](Self::advance), but reports when each due tick falls,
    /// as an offset in seconds from the start of this frame.
    pub fn due_offsets(&mut self, elapsed: f32) -> Vec<f32> {
        let carried = self.pending();
        let due = self.advance(elapsed);
        (1..=due)
            .map(|k| (k as f32 * self.period() - carried).clamp(0.0, elapsed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_fractional_frames_into_ticks() {
        let mut timer = FixedStepTimer::new(0.05);
        timer.start();
        assert_eq!(timer.advance(0.03), 0);
        assert_eq!(timer.advance(0.03), 1);
        assert_eq!(timer.advance(0.1), 2);
    }

    #[test]
    fn stopped_timer_never_fires_and_drops_pending_time() {
        let mut timer = FixedStepTimer::new(0.05);
        assert_eq!(timer.advance(1.0), 0);

        timer.start();
        timer.advance(0.04);
        timer.stop();
        assert_eq!(timer.advance(0.5), 0);

        timer.start();
        assert_eq!(timer.advance(0.02), 0);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut timer = FixedStepTimer::new(0.05);
        timer.start();
        assert_eq!(timer.advance(60.0), 20);
        assert_eq!(timer.advance(0.0), 0);
    }

    #[test]
    fn due_offsets_place_ticks_inside_the_frame() {
        let mut timer = FixedStepTimer::new(0.05);
        timer.start();
        assert!(timer.due_offsets(0.02).is_empty());
        assert!((timer.pending() - 0.02).abs() < 1e-6);

        let offsets = timer.due_offsets(0.26);
        assert_eq!(offsets.len(), 5);
        let expected = [0.03, 0.08, 0.13, 0.18, 0.23];
        for (got, want) in offsets.iter().zip(expected) {
            assert!((got - want).abs() < 1e-5, "{got} vs {want}");
        }
        assert!((timer.period() - 0.05).abs() < 1e-9);
    }
}
