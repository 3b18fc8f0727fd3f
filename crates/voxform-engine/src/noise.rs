//! Noise sources: white, pink, and bandpass-colored.
//!
//! Every noise consumer in the engine (aspiration, frication, bursts,
//! jitter) owns its own [`NoiseSource`] seeded through [`crate::rng`], so
//! streams are independent and the whole synthesis is reproducible.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::filter::{ResonatorMode, ZdfResonator, CASCADE_BW_COMPENSATION};
use crate::rng::create_rng;

/// Deterministic white and pink noise generator.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: Pcg32,
    // Pink filter state (Paul Kellet's refined method)
    pink: [f64; 5],
}

impl NoiseSource {
    /// Creates a source from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        NoiseSource {
            rng: create_rng(seed),
            pink: [0.0; 5],
        }
    }

    /// Uniform white noise in [−1, +1).
    #[inline]
    pub fn white(&mut self) -> f64 {
        self.rng.gen::<f64>() * 2.0 - 1.0
    }

    /// Pink (1/f) noise via Kellet's five cascaded one-pole updates.
    ///
    /// Approximates a 1/f spectrum from ~20 Hz to Nyquist; the 0.11 scale
    /// normalizes the summed stages back near unit range.
    #[inline]
    pub fn pink(&mut self) -> f64 {
        let white = self.white();

        self.pink[0] = 0.99886 * self.pink[0] + white * 0.0555179;
        self.pink[1] = 0.99332 * self.pink[1] + white * 0.0750759;
        self.pink[2] = 0.96900 * self.pink[2] + white * 0.1538520;
        self.pink[3] = 0.86650 * self.pink[3] + white * 0.3104856;
        self.pink[4] = 0.55000 * self.pink[4] + white * 0.5329522;

        let pink = self.pink.iter().sum::<f64>() + white * 0.5362;
        pink * 0.11
    }
}

/// Bandpass-colored noise for place-specific fricative and aspiration
/// spectra.
///
/// Uses a 4th-order ZDF bandpass (two cascaded stages, 24 dB/oct skirts):
/// wide-bandwidth non-sibilants need the steeper rolloff, narrow sibilants
/// the focused peak. Below 100 Hz the filter is skipped and pink noise is
/// returned for natural aspiration.
#[derive(Debug, Clone)]
pub struct ColoredNoise {
    source: NoiseSource,
    bandpass1: ZdfResonator,
    bandpass2: ZdfResonator,
}

impl ColoredNoise {
    pub fn new(sample_rate: u32, seed: u32) -> Self {
        ColoredNoise {
            source: NoiseSource::new(seed),
            bandpass1: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
            bandpass2: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
        }
    }

    /// Produces one noise sample shaped by the given bandpass settings.
    #[inline]
    pub fn next(&mut self, filter_freq: f64, filter_bw: f64) -> f64 {
        if filter_freq < 100.0 {
            return self.source.pink();
        }

        let noise = self.source.white();
        let bw = filter_bw.max(100.0);
        let bw_adjusted = bw * CASCADE_BW_COMPENSATION;

        let out = self.bandpass1.process(noise, filter_freq, bw_adjusted);
        let out = self.bandpass2.process(out, filter_freq, bw_adjusted);

        // Narrow sibilant filters lose more energy than wide non-sibilant
        // ones; boost inversely with bandwidth.
        let gain = (6000.0 / bw).min(60.0);
        out * gain
    }
}
