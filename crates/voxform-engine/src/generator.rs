//! The per-sample synthesis pipeline.
//!
//! For every output sample the generator pulls the interpolated frame from
//! its [`FrameManager`] and runs the full source-filter chain: glottal and
//! aspiration sources, DC blocking, spectral tilt, tracheal coupling, trill
//! modulation, cascade and parallel formant filtering, frication and burst
//! noise, limiting, and quantization to signed 16-bit PCM.

use std::sync::Arc;

use log::debug;

use crate::burst::BurstGenerator;
use crate::dynamics::PeakLimiter;
use crate::error::{EngineError, EngineResult};
use crate::filter::{DcBlocker, HfShelf, SpectralTilt};
use crate::manager::FrameManager;
use crate::modulation::TrillLfo;
use crate::noise::ColoredNoise;
use crate::rng::derive_component_seed;
use crate::tract::{CascadeDuck, CascadeFormants, ParallelFormants, TrachealFilter};
use crate::voice::VoiceSource;
use crate::{denormal, DEFAULT_SEED};

/// Minimum accepted sample rate. Below this even the speech band cannot be
/// represented, let alone the upper formants.
const MIN_SAMPLE_RATE: u32 = 8000;

/// Headroom scaling from the unit-level mix to the 16-bit range; the peak
/// limiter catches what this overshoots.
const OUTPUT_SCALE: f64 = 4000.0;

/// Below this pre-formant gain the tract counts as silent: resonators drain
/// and the limiter switches to its fast release.
const SILENCE_GATE: f64 = 0.01;

/// Real-time formant waveform generator.
///
/// Owned and pulled by a single DSP thread; frames arrive through the shared
/// [`FrameManager`]. Sample rates of 44.1-96 kHz are typical; higher rates
/// reduce ZDF frequency warping in the upper formants.
pub struct WaveGenerator {
    voice: VoiceSource,
    dc_block: DcBlocker,
    tilt: SpectralTilt,
    tracheal: TrachealFilter,
    fric_noise: ColoredNoise,
    burst: BurstGenerator,
    trill: TrillLfo,
    cascade: CascadeFormants,
    shelf: HfShelf,
    parallel: ParallelFormants,
    duck: CascadeDuck,
    limiter: PeakLimiter,
    prev_pre_gain: f64,
    frames: Option<Arc<FrameManager>>,
}

impl WaveGenerator {
    /// Creates a generator at the given sample rate with the default seed.
    pub fn new(sample_rate: u32) -> EngineResult<Self> {
        Self::with_seed(sample_rate, DEFAULT_SEED)
    }

    /// Creates a generator with an explicit noise seed, for reproducible
    /// output in tests and offline rendering.
    pub fn with_seed(sample_rate: u32, seed: u32) -> EngineResult<Self> {
        if sample_rate < MIN_SAMPLE_RATE {
            return Err(EngineError::InvalidSampleRate {
                rate: sample_rate,
                min: MIN_SAMPLE_RATE,
            });
        }
        denormal::suppress_denormals();
        debug!("wave generator created: {} Hz, seed {:#010x}", sample_rate, seed);

        Ok(WaveGenerator {
            voice: VoiceSource::new(sample_rate, seed),
            dc_block: DcBlocker::new(sample_rate, 20.0),
            tilt: SpectralTilt::new(sample_rate),
            tracheal: TrachealFilter::new(sample_rate),
            fric_noise: ColoredNoise::new(sample_rate, derive_component_seed(seed, "frication")),
            burst: BurstGenerator::new(sample_rate, derive_component_seed(seed, "burst")),
            trill: TrillLfo::new(sample_rate),
            cascade: CascadeFormants::new(sample_rate),
            shelf: HfShelf::new(sample_rate, 3000.0, 6.0),
            parallel: ParallelFormants::new(sample_rate),
            duck: CascadeDuck::new(sample_rate),
            limiter: PeakLimiter::new(sample_rate, -3.0),
            prev_pre_gain: 0.0,
            frames: None,
        })
    }

    /// Wires the frame source. Must be called before the first
    /// [`generate`](Self::generate).
    pub fn set_frame_manager(&mut self, frames: Arc<FrameManager>) {
        self.frames = Some(frames);
    }

    /// Synthesizes up to `out.len()` samples and returns how many were
    /// written. A short count means the frame queue ran dry at that sample;
    /// samples beyond the returned count are untouched. Subsequent calls
    /// return 0 until the producer enqueues more frames.
    pub fn generate(&mut self, out: &mut [i16]) -> usize {
        let frames = match &self.frames {
            Some(frames) => Arc::clone(frames),
            None => return 0,
        };

        for i in 0..out.len() {
            let frame = match frames.current_frame() {
                Some(frame) => frame,
                None => return i,
            };

            // Source: glottal + aspiration, then source-level shaping.
            let mut voice = self.voice.next(&frame);
            voice = self.dc_block.process(voice);
            voice = self.tilt.process(voice, frame.spectral_tilt);
            voice = self.tracheal.process(voice, &frame);

            let trill_mod = self.trill.next(frame.trill_rate, frame.trill_depth);
            voice *= trill_mod;

            // Silence handling: drain resonators while the tract is gated,
            // hard-reset both chains at voice onset after sustained silence.
            let pre_gain = frame.pre_formant_gain * trill_mod;
            if pre_gain < SILENCE_GATE {
                self.cascade.decay(0.95);
                self.parallel.decay(0.95);
            }
            if self.prev_pre_gain < SILENCE_GATE / 2.0 && pre_gain > SILENCE_GATE {
                self.cascade.reset();
                self.parallel.reset();
            }
            self.prev_pre_gain = pre_gain;

            let mut cascade_out =
                self.cascade
                    .process(&frame, self.voice.glottis_open, voice * pre_gain);
            // Duck the cascade during voiceless bursts so ringing from a
            // preceding vowel cannot spike at the boundary.
            cascade_out *= self.duck.advance(
                frame.burst_amplitude,
                frame.frication_amplitude,
                frame.voice_amplitude,
            );
            cascade_out = self.shelf.process(cascade_out);

            // Noise sources feed the parallel bank.
            let fric = self
                .fric_noise
                .next(frame.noise_filter_freq, frame.noise_filter_bw)
                * 0.3
                * frame.frication_amplitude;
            let burst = self.burst.next(
                frame.burst_amplitude,
                frame.burst_duration,
                frame.burst_filter_freq,
                frame.burst_filter_bw,
                frame.burst_noise_color,
            );
            let parallel_in = (fric + burst + voice * frame.parallel_voice_mix) * pre_gain;
            let parallel_out = self.parallel.process(&frame, parallel_in);

            let mixed = (cascade_out + parallel_out) * frame.output_gain;

            self.limiter.set_fast_release(pre_gain < SILENCE_GATE);
            let limited = self.limiter.limit(mixed * OUTPUT_SCALE);
            out[i] = limited.clamp(-32767.0, 32767.0).round() as i16;
        }
        out.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    fn voiced_frame() -> Frame {
        Frame {
            voice_pitch: 120.0,
            voice_pitch_end: 120.0,
            voice_amplitude: 0.5,
            lf_rd: 1.0,
            pre_formant_gain: 1.0,
            output_gain: 1.0,
            cf1: 700.0,
            cb1: 80.0,
            cf2: 1220.0,
            cb2: 90.0,
            cf3: 2600.0,
            cb3: 120.0,
            ..Frame::default()
        }
    }

    #[test]
    fn test_rejects_low_sample_rate() {
        assert!(matches!(
            WaveGenerator::new(0),
            Err(EngineError::InvalidSampleRate { .. })
        ));
        assert!(matches!(
            WaveGenerator::new(4000),
            Err(EngineError::InvalidSampleRate { .. })
        ));
        assert!(WaveGenerator::new(48000).is_ok());
    }

    #[test]
    fn test_generate_without_manager_returns_zero() {
        let mut generator = WaveGenerator::new(48000).unwrap();
        let mut out = [0i16; 64];
        assert_eq!(generator.generate(&mut out), 0);
    }

    #[test]
    fn test_generate_produces_audio_for_voiced_frame() {
        let manager = Arc::new(FrameManager::new());
        let mut generator = WaveGenerator::with_seed(48000, 42).unwrap();
        generator.set_frame_manager(Arc::clone(&manager));

        manager.enqueue(Some(&voiced_frame()), 4800, 100, -1, false);
        let mut out = vec![0i16; 4800];
        let produced = generator.generate(&mut out);
        assert_eq!(produced, 4800);

        let energy: f64 = out.iter().map(|&s| (s as f64).powi(2)).sum();
        assert!(energy > 0.0);
        // The final clamp guarantees the symmetric 16-bit range.
        assert!(out.iter().all(|&s| (-32767..=32767).contains(&s)));
    }

    #[test]
    fn test_generate_short_count_on_underflow() {
        let manager = Arc::new(FrameManager::new());
        let mut generator = WaveGenerator::with_seed(48000, 42).unwrap();
        generator.set_frame_manager(Arc::clone(&manager));

        manager.enqueue(Some(&voiced_frame()), 1000, 100, -1, false);
        let mut out = vec![9999i16; 2000];
        let produced = generator.generate(&mut out);
        assert_eq!(produced, 1001);
        // Samples beyond the produced count are untouched.
        assert!(out[produced..].iter().all(|&s| s == 9999));

        // Dry queue keeps returning zero.
        assert_eq!(generator.generate(&mut out), 0);
    }

    #[test]
    fn test_zero_amplitudes_produce_zero_samples() {
        let manager = Arc::new(FrameManager::new());
        let mut generator = WaveGenerator::with_seed(48000, 42).unwrap();
        generator.set_frame_manager(Arc::clone(&manager));

        let frame = Frame {
            voice_pitch: 120.0,
            voice_pitch_end: 120.0,
            pre_formant_gain: 1.0,
            output_gain: 1.0,
            cf1: 700.0,
            cb1: 80.0,
            ..Frame::default()
        };
        manager.enqueue(Some(&frame), 4800, 100, -1, false);
        let mut out = vec![1i16; 4800];
        let produced = generator.generate(&mut out);
        assert_eq!(produced, 4800);
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_determinism_with_same_seed() {
        let run = || -> Vec<i16> {
            let manager = Arc::new(FrameManager::new());
            let mut generator = WaveGenerator::with_seed(48000, 7).unwrap();
            generator.set_frame_manager(Arc::clone(&manager));
            manager.enqueue(Some(&voiced_frame()), 4800, 100, -1, false);
            let mut out = vec![0i16; 4800];
            generator.generate(&mut out);
            out
        };
        assert_eq!(run(), run());
    }
}
