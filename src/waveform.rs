use noise::{Fbm, NoiseFn, Perlin};

use crate::config;

/// Cosmetic interference waveform. Fractal noise gives it an organic,
/// non-repeating texture; the disturbance value sets its amplitude.
pub struct WaveformSampler {
    fbm: Fbm<Perlin>,
}

impl WaveformSampler {
    pub fn new(seed: u32) -> Self {
        Self {
            fbm: Fbm::new(seed),
        }
    }

    /// Peak amplitude in [baseline, 1] for a disturbance value in [0, 100].
    pub fn amplitude(disturbance: f32) -> f32 {
        let t = (disturbance / config::DISTURBANCE_MAX).clamp(0.0, 1.0);
        config::WAVEFORM_BASELINE_AMPLITUDE + (1.0 - config::WAVEFORM_BASELINE_AMPLITUDE) * t
    }

    /// `count` samples in [-1, 1] for the window ending at `time`.
    pub fn samples(&self, time: f64, disturbance: f32, count: usize) -> Vec<f32> {
        let amplitude = Self::amplitude(disturbance);
        // busier texture as the disturbance climbs
        let frequency = 6.0 + disturbance as f64 * 0.08;
        (0..count)
            .map(|i| {
                let u = i as f64 / count.max(1) as f64;
                let carrier = (u * std::f64::consts::TAU * 3.0 + time * 4.0).sin() * 0.35;
                let texture = self.fbm.get([u * frequency, time * 1.5]);
                (((carrier + texture) as f32) * amplitude).clamp(-1.0, 1.0)
            })
            .collect()
    }
}
