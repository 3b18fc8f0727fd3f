//! Stop-burst transient generator.
//!
//! A burst is triggered by the burst amplitude rising from zero. On trigger
//! the generator snapshots the frame's burst parameters and then runs the
//! whole envelope from those stored values, so the transient completes
//! correctly even when the triggering frame fades away mid-burst.

use crate::filter::{ResonatorMode, ZdfResonator};
use crate::noise::NoiseSource;

/// Self-sustaining plosive burst envelope.
#[derive(Debug, Clone)]
pub struct BurstGenerator {
    sample_rate: f64,
    noise: NoiseSource,
    filter: ZdfResonator,
    /// Envelope position: 0 = burst start, 1 = burst end.
    phase: f64,
    last_amp: f64,
    active: bool,
    // Parameters captured at trigger time
    amp: f64,
    duration: f64,
    filter_freq: f64,
    filter_bw: f64,
    noise_color: f64,
}

impl BurstGenerator {
    pub fn new(sample_rate: u32, seed: u32) -> Self {
        BurstGenerator {
            sample_rate: sample_rate as f64,
            noise: NoiseSource::new(seed),
            filter: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
            phase: 1.0,
            last_amp: 0.0,
            active: false,
            amp: 0.0,
            duration: 0.0,
            filter_freq: 0.0,
            filter_bw: 0.0,
            noise_color: 0.0,
        }
    }

    /// Produces the next burst sample.
    ///
    /// A rising edge of `amplitude` (from ≤0 to >0) triggers a new burst and
    /// captures the remaining parameters for its whole lifetime.
    pub fn next(
        &mut self,
        amplitude: f64,
        duration: f64,
        filter_freq: f64,
        filter_bw: f64,
        noise_color: f64,
    ) -> f64 {
        if self.last_amp <= 0.0 && amplitude > 0.0 {
            self.phase = 0.0;
            self.filter.reset();
            self.active = true;
            self.amp = amplitude;
            self.duration = duration;
            self.filter_freq = filter_freq;
            self.filter_bw = filter_bw;
            self.noise_color = noise_color;
        }
        self.last_amp = amplitude;

        if !self.active || self.phase >= 1.0 {
            self.active = false;
            self.filter.decay(0.9);
            return 0.0;
        }

        // Envelope over 5-20 ms, from the stored duration parameter.
        let duration_ms = 5.0 + self.duration * 15.0;
        let duration_samples = duration_ms / 1000.0 * self.sample_rate;
        let envelope = (-6.0 * self.phase).exp();
        self.phase = (self.phase + 1.0 / duration_samples).min(1.0);

        // Place-specific spectral coloring: blend white and pink, then
        // bandpass through the captured filter.
        let white = self.noise.white();
        let raw = white * (1.0 - self.noise_color) + self.noise.pink() * self.noise_color;
        let filtered = if self.filter_freq > 0.0 && self.filter_bw > 0.0 {
            self.filter.process(raw, self.filter_freq, self.filter_bw) * 3.0
        } else {
            raw
        };

        // Onset transient: mix in unfiltered noise while the bandpass rings
        // up. Low-frequency filters need longer (~3 cycles) to reach steady
        // state.
        let onset_ms = if self.filter_freq > 0.0 {
            (3.0 / (self.filter_freq / 1000.0)).max(1.5)
        } else {
            1.5
        };
        let onset_samples = onset_ms / 1000.0 * self.sample_rate;
        let onset_phase = (self.phase * duration_samples / onset_samples).min(1.0);
        let onset_scale = 1.0 - self.noise_color * 0.7;
        let noise = filtered + raw * (1.0 - onset_phase) * onset_scale;

        noise * envelope * self.amp
    }

    pub fn decay(&mut self, factor: f64) {
        self.filter.decay(factor);
    }

    pub fn reset(&mut self) {
        self.filter.reset();
        self.phase = 1.0;
        self.active = false;
    }
}
