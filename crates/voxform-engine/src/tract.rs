//! Vocal tract filtering: cascade and parallel formant banks, tracheal
//! coupling, and the cascade ducking tracker.
//!
//! The cascade chain shapes voiced spectra with series all-pole resonators
//! (unity DC gain keeps the series product stable); the parallel bank sums
//! bandpass outputs per formant and carries the noise sources. Both chains
//! support exponential drain during silence and a hard reset at voice onset
//! so stale resonator energy never leaks into a new utterance.

use crate::filter::{ParamSmoother, ResonatorMode, ZdfResonator, ZdfResonator4};
use crate::frame::{fade_value, Frame};

/// Series (cascade) formant chain.
///
/// Order: nasal zero, nasal pole (blended against the plain path by the
/// nasal pole amplitude), F6, F5, F4, then F3..F1 as 4th-order sections for
/// sharper vowel formants. F1 is modulated pitch-synchronously: during the
/// glottal open phase its center rises by `delta_f1` and its bandwidth
/// widens by `delta_b1`, tracked through a ~2 ms smoother so the switch
/// itself stays inaudible.
#[derive(Debug, Clone)]
pub struct CascadeFormants {
    r1: ZdfResonator4,
    r2: ZdfResonator4,
    r3: ZdfResonator4,
    r4: ZdfResonator,
    r5: ZdfResonator,
    r6: ZdfResonator,
    nasal_zero: ZdfResonator,
    nasal_pole: ZdfResonator,
    glottal_blend: ParamSmoother,
}

impl CascadeFormants {
    pub fn new(sample_rate: u32) -> Self {
        CascadeFormants {
            r1: ZdfResonator4::new(sample_rate, ResonatorMode::AllPole),
            r2: ZdfResonator4::new(sample_rate, ResonatorMode::AllPole),
            r3: ZdfResonator4::new(sample_rate, ResonatorMode::AllPole),
            r4: ZdfResonator::new(sample_rate, ResonatorMode::AllPole),
            r5: ZdfResonator::new(sample_rate, ResonatorMode::AllPole),
            r6: ZdfResonator::new(sample_rate, ResonatorMode::AllPole),
            nasal_zero: ZdfResonator::new(sample_rate, ResonatorMode::Anti),
            nasal_pole: ZdfResonator::new(sample_rate, ResonatorMode::AllPole),
            glottal_blend: ParamSmoother::new(0.002, sample_rate),
        }
    }

    /// Filters one source sample through the chain.
    pub fn process(&mut self, frame: &Frame, glottis_open: bool, input: f64) -> f64 {
        let input = input / 2.0;

        let zero_out = self
            .nasal_zero
            .process(input, frame.nasal_zero_freq, frame.nasal_zero_bw);
        let nasal_out = self
            .nasal_pole
            .process(zero_out, frame.nasal_pole_freq, frame.nasal_pole_bw);
        let mut output = fade_value(input, nasal_out, frame.nasal_pole_amplitude);

        output = self.r6.process(output, frame.cf6, frame.cb6);
        output = self.r5.process(output, frame.cf5, frame.cb5);
        output = self.r4.process(output, frame.cf4, frame.cb4);
        output = self.r3.process(output, frame.cf3, frame.cb3);
        output = self.r2.process(output, frame.cf2, frame.cb2);

        // Pitch-synchronous F1 modulation: subglottal coupling raises F1 and
        // widens B1 while the glottis is open.
        let blend = self
            .glottal_blend
            .advance(if glottis_open { 1.0 } else { 0.0 });
        let f1 = frame.cf1 + frame.delta_f1 * blend;
        let b1 = frame.cb1 + frame.delta_b1 * blend;
        self.r1.process(output, f1, b1)
    }

    pub fn decay(&mut self, factor: f64) {
        self.r1.decay(factor);
        self.r2.decay(factor);
        self.r3.decay(factor);
        self.r4.decay(factor);
        self.r5.decay(factor);
        self.r6.decay(factor);
        self.nasal_zero.decay(factor);
        self.nasal_pole.decay(factor);
    }

    pub fn reset(&mut self) {
        self.r1.reset();
        self.r2.reset();
        self.r3.reset();
        self.r4.reset();
        self.r5.reset();
        self.r6.reset();
        self.nasal_zero.reset();
        self.nasal_pole.reset();
    }
}

/// Parallel formant bank with per-formant amplitudes.
///
/// Each resonator contributes its bandpass output scaled by its amplitude;
/// the sum passes through the parallel anti-resonator and is then
/// cross-faded with the raw input by the bypass ratio.
#[derive(Debug, Clone)]
pub struct ParallelFormants {
    r1: ZdfResonator,
    r2: ZdfResonator,
    r3: ZdfResonator,
    r4: ZdfResonator,
    r5: ZdfResonator,
    r6: ZdfResonator,
    anti: ZdfResonator,
}

impl ParallelFormants {
    pub fn new(sample_rate: u32) -> Self {
        ParallelFormants {
            r1: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
            r2: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
            r3: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
            r4: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
            r5: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
            r6: ZdfResonator::new(sample_rate, ResonatorMode::Bandpass),
            anti: ZdfResonator::new(sample_rate, ResonatorMode::Anti),
        }
    }

    /// Filters one noise/voice-mix sample through the bank.
    pub fn process(&mut self, frame: &Frame, input: f64) -> f64 {
        let input = input / 2.0;

        let mut output = 0.0;
        output += self.r1.process(input, frame.pf1, frame.pb1) * frame.pa1;
        output += self.r2.process(input, frame.pf2, frame.pb2) * frame.pa2;
        output += self.r3.process(input, frame.pf3, frame.pb3) * frame.pa3;
        output += self.r4.process(input, frame.pf4, frame.pb4) * frame.pa4;
        output += self.r5.process(input, frame.pf5, frame.pb5) * frame.pa5;
        output += self.r6.process(input, frame.pf6, frame.pb6) * frame.pa6;

        // Frequency 0 bypasses inside the resonator.
        output = self
            .anti
            .process(output, frame.parallel_anti_freq, frame.parallel_anti_bw);

        fade_value(output, input, frame.parallel_bypass)
    }

    pub fn decay(&mut self, factor: f64) {
        self.r1.decay(factor);
        self.r2.decay(factor);
        self.r3.decay(factor);
        self.r4.decay(factor);
        self.r5.decay(factor);
        self.r6.decay(factor);
        self.anti.decay(factor);
    }

    pub fn reset(&mut self) {
        self.r1.reset();
        self.r2.reset();
        self.r3.reset();
        self.r4.reset();
        self.r5.reset();
        self.r6.reset();
        self.anti.reset();
    }
}

/// Tracheal (subglottal) coupling: two pole/zero pairs applied to the voice
/// source for breathy-voice realism. Each stage is skipped while its
/// frequency is zero.
#[derive(Debug, Clone)]
pub struct TrachealFilter {
    pole1: ZdfResonator,
    zero1: ZdfResonator,
    pole2: ZdfResonator,
    zero2: ZdfResonator,
}

impl TrachealFilter {
    pub fn new(sample_rate: u32) -> Self {
        TrachealFilter {
            pole1: ZdfResonator::new(sample_rate, ResonatorMode::AllPole),
            zero1: ZdfResonator::new(sample_rate, ResonatorMode::Anti),
            pole2: ZdfResonator::new(sample_rate, ResonatorMode::AllPole),
            zero2: ZdfResonator::new(sample_rate, ResonatorMode::Anti),
        }
    }

    pub fn process(&mut self, input: f64, frame: &Frame) -> f64 {
        let mut output = input;
        if frame.tracheal_pole_freq1 > 0.0 {
            output = self
                .pole1
                .process(output, frame.tracheal_pole_freq1, frame.tracheal_pole_bw1);
        }
        if frame.tracheal_zero_freq1 > 0.0 {
            output = self
                .zero1
                .process(output, frame.tracheal_zero_freq1, frame.tracheal_zero_bw1);
        }
        if frame.tracheal_pole_freq2 > 0.0 {
            output = self
                .pole2
                .process(output, frame.tracheal_pole_freq2, frame.tracheal_pole_bw2);
        }
        if frame.tracheal_zero_freq2 > 0.0 {
            output = self
                .zero2
                .process(output, frame.tracheal_zero_freq2, frame.tracheal_zero_bw2);
        }
        output
    }
}

/// Reduces cascade output while a voiceless burst or frication is active, so
/// resonators still ringing from a preceding vowel cannot spike at the
/// stop/vowel boundary. One-pole smoothing with a ~1 ms time constant.
#[derive(Debug, Clone)]
pub struct CascadeDuck {
    smoother: ParamSmoother,
}

impl CascadeDuck {
    pub fn new(sample_rate: u32) -> Self {
        let mut smoother = ParamSmoother::new(0.001, sample_rate);
        smoother.set(1.0);
        CascadeDuck { smoother }
    }

    /// Advances the tracker and returns the cascade gain in (0, 1].
    pub fn advance(&mut self, burst_amp: f64, fric_amp: f64, voice_amp: f64) -> f64 {
        let noise_env = burst_amp.max(fric_amp);
        let target = 1.0 - 0.7 * noise_env * (1.0 - voice_amp);
        self.smoother.advance(target)
    }
}
