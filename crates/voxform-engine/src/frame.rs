//! Articulation frame: the complete parameter target for a moment in time.
//!
//! A [`Frame`] holds every articulation parameter the generator consumes,
//! as 64-bit floats. Frames are plain values: the manager copies them into
//! its queue on enqueue and interpolates between consecutive targets on a
//! per-sample basis.
//!
//! Most parameters fade between frames along a quintic smoothstep curve.
//! A small set of *step parameters* (burst and frication triggers, noise and
//! burst filter settings, trill settings) is assigned the new target
//! instantly instead: fading these produces audible filter sweeps or
//! mistimed stop onsets.

use serde::{Deserialize, Serialize};

/// Complete articulation target. All fields are linear unless noted.
///
/// A zeroed frame (the `Default`) is silence: every amplitude is 0 and every
/// filter is bypassed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    // Voicing
    /// Fundamental frequency of voice (phonation) in Hz.
    pub voice_pitch: f64,
    /// Pitch at the end of the frame, for linear glides.
    pub voice_pitch_end: f64,
    /// Pitch at the frame midpoint; >0 enables a three-point contour.
    pub voice_pitch_mid: f64,
    /// Vibrato rate in Hz.
    pub vibrato_rate: f64,
    /// Vibrato depth as a fraction of a semitone.
    pub vibrato_depth: f64,
    /// Amplitude of the voice (phonation) source, 0 to 1.
    pub voice_amplitude: f64,
    /// Amplitude of voice breathiness (turbulence) during the open phase, 0 to 1.
    pub voice_turbulence_amplitude: f64,
    /// Fraction of a voice cycle that the glottis is open. Legacy parameter,
    /// carried for the data-model contract; the LF source derives its own
    /// open phase from `lf_rd`.
    pub glottal_open_quotient: f64,
    /// AVS: pure sine wave at F0 for voicebars and voiced fricatives, 0 to 1.
    pub sine_voicing_amplitude: f64,

    // Aspiration
    /// Amplitude of aspiration (voiceless h, whisper), 0 to 1.
    pub aspiration_amplitude: f64,
    /// Center frequency of the aspiration bandpass in Hz (0 = pink noise).
    pub aspiration_filter_freq: f64,
    /// Bandwidth of the aspiration bandpass in Hz.
    pub aspiration_filter_bw: f64,

    // Voice quality
    /// TL: high-frequency attenuation in dB at 5 kHz (0 = modal voice).
    pub spectral_tilt: f64,
    /// FL: natural F0 jitter amount, 0 to 1 (0.25 typical for natural speech).
    pub flutter: f64,
    /// OQ shape: glottal closing curve, 0 to 1. Legacy parameter.
    pub open_quotient_shape: f64,
    /// SQ: opening/closing time asymmetry, 0.5 to 2.0. Legacy parameter.
    pub speed_quotient: f64,
    /// DI: period alternation for creaky voice, 0 to 1.
    pub diplophonia: f64,
    /// Rd: LF model voice quality, 0.3 to 2.7 (<1 tense, 1 modal, >1 breathy;
    /// 0 = unvoiced, no glottal source).
    pub lf_rd: f64,

    // Subglottal (tracheal) resonances
    /// FTP1: first tracheal pole frequency in Hz (0 = disabled).
    pub tracheal_pole_freq1: f64,
    /// BTP1: first tracheal pole bandwidth in Hz.
    pub tracheal_pole_bw1: f64,
    /// FTZ1: first tracheal zero frequency in Hz (0 = disabled).
    pub tracheal_zero_freq1: f64,
    /// BTZ1: first tracheal zero bandwidth in Hz.
    pub tracheal_zero_bw1: f64,
    /// FTP2: second tracheal pole frequency in Hz (0 = disabled).
    pub tracheal_pole_freq2: f64,
    /// BTP2: second tracheal pole bandwidth in Hz.
    pub tracheal_pole_bw2: f64,
    /// FTZ2: second tracheal zero frequency in Hz (0 = disabled).
    pub tracheal_zero_freq2: f64,
    /// BTZ2: second tracheal zero bandwidth in Hz.
    pub tracheal_zero_bw2: f64,

    // Pitch-synchronous F1 modulation
    /// DF1: F1 frequency increase during the glottal open phase, in Hz.
    pub delta_f1: f64,
    /// DB1: B1 bandwidth increase during the glottal open phase, in Hz.
    pub delta_b1: f64,

    // Stop burst
    /// AB: stop burst transient amplitude, 0 to 1. Step parameter.
    pub burst_amplitude: f64,
    /// DB: burst duration normalized 0 to 1 (maps to 5-20 ms). Step parameter.
    pub burst_duration: f64,
    /// Burst bandpass center frequency in Hz. Step parameter.
    pub burst_filter_freq: f64,
    /// Burst bandpass bandwidth in Hz. Step parameter.
    pub burst_filter_bw: f64,
    /// Burst noise color, 0 = white, 1 = pink. Step parameter.
    pub burst_noise_color: f64,

    // Cascade formants
    /// Cascade formant F1 frequency in Hz.
    pub cf1: f64,
    /// Cascade formant F2 frequency in Hz.
    pub cf2: f64,
    /// Cascade formant F3 frequency in Hz.
    pub cf3: f64,
    /// Cascade formant F4 frequency in Hz.
    pub cf4: f64,
    /// Cascade formant F5 frequency in Hz.
    pub cf5: f64,
    /// Cascade formant F6 frequency in Hz.
    pub cf6: f64,
    /// Cascade formant F1 bandwidth in Hz.
    pub cb1: f64,
    /// Cascade formant F2 bandwidth in Hz.
    pub cb2: f64,
    /// Cascade formant F3 bandwidth in Hz.
    pub cb3: f64,
    /// Cascade formant F4 bandwidth in Hz.
    pub cb4: f64,
    /// Cascade formant F5 bandwidth in Hz.
    pub cb5: f64,
    /// Cascade formant F6 bandwidth in Hz.
    pub cb6: f64,
    /// Nasal anti-resonator (zero) frequency in Hz.
    pub nasal_zero_freq: f64,
    /// Nasal anti-resonator (zero) bandwidth in Hz.
    pub nasal_zero_bw: f64,
    /// Nasal pole frequency in Hz.
    pub nasal_pole_freq: f64,
    /// Nasal pole bandwidth in Hz.
    pub nasal_pole_bw: f64,
    /// Blend of the nasal pole/zero path against the plain path, 0 to 1.
    pub nasal_pole_amplitude: f64,

    // Frication and parallel bank
    /// Amplitude of frication noise, 0 to 1. Step parameter.
    pub frication_amplitude: f64,
    /// Center frequency of the frication bandpass in Hz (0 = pink noise).
    /// Step parameter.
    pub noise_filter_freq: f64,
    /// Bandwidth of the frication bandpass in Hz. Step parameter.
    pub noise_filter_bw: f64,
    /// Parallel formant P1 frequency in Hz.
    pub pf1: f64,
    /// Parallel formant P2 frequency in Hz.
    pub pf2: f64,
    /// Parallel formant P3 frequency in Hz.
    pub pf3: f64,
    /// Parallel formant P4 frequency in Hz.
    pub pf4: f64,
    /// Parallel formant P5 frequency in Hz.
    pub pf5: f64,
    /// Parallel formant P6 frequency in Hz.
    pub pf6: f64,
    /// Parallel formant P1 bandwidth in Hz.
    pub pb1: f64,
    /// Parallel formant P2 bandwidth in Hz.
    pub pb2: f64,
    /// Parallel formant P3 bandwidth in Hz.
    pub pb3: f64,
    /// Parallel formant P4 bandwidth in Hz.
    pub pb4: f64,
    /// Parallel formant P5 bandwidth in Hz.
    pub pb5: f64,
    /// Parallel formant P6 bandwidth in Hz.
    pub pb6: f64,
    /// Parallel formant P1 amplitude, 0 to 1.
    pub pa1: f64,
    /// Parallel formant P2 amplitude, 0 to 1.
    pub pa2: f64,
    /// Parallel formant P3 amplitude, 0 to 1.
    pub pa3: f64,
    /// Parallel formant P4 amplitude, 0 to 1.
    pub pa4: f64,
    /// Parallel formant P5 amplitude, 0 to 1.
    pub pa5: f64,
    /// Parallel formant P6 amplitude, 0 to 1.
    pub pa6: f64,
    /// Parallel-path anti-resonator frequency in Hz (0 = bypass).
    /// Step parameter.
    pub parallel_anti_freq: f64,
    /// Parallel-path anti-resonator bandwidth in Hz.
    pub parallel_anti_bw: f64,
    /// Amount of signal bypassing the parallel resonators, 0 to 1.
    pub parallel_bypass: f64,
    /// Fraction of the voice signal routed into the parallel bank, 0 to 1.
    pub parallel_voice_mix: f64,

    // Trill
    /// Trill modulation rate in Hz (10-40 typical). Step parameter.
    pub trill_rate: f64,
    /// Trill modulation depth, 0 to 1. Step parameter.
    pub trill_depth: f64,

    // Gains
    /// Gate on all vocal tract sound before the formant resonators, 0 to 1.
    /// Useful for stopping and starting speech.
    pub pre_formant_gain: f64,
    /// Master output gain, 0 to 1.
    pub output_gain: f64,
}

/// Perlin quintic smootherstep: a C2-continuous S-curve.
///
/// Maps linear `t` in [0, 1] to a curve with zero first *and* second
/// derivatives at both endpoints, so transitions neither click nor exhibit
/// audible acceleration steps.
#[inline]
pub(crate) fn smoothstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Interpolates one parameter along the smoothstep curve.
///
/// A NaN target holds the old value.
#[inline]
pub(crate) fn fade_value(old: f64, new: f64, ratio: f64) -> f64 {
    if new.is_nan() {
        return old;
    }
    old + (new - old) * smoothstep(ratio)
}

impl Frame {
    /// Overwrites `self` with the interpolation of `old` toward `new` at
    /// fade position `ratio` in [0, 1].
    ///
    /// Step parameters take the new target on the first sample of the fade.
    pub(crate) fn set_faded(&mut self, old: &Frame, new: &Frame, ratio: f64) {
        self.voice_pitch = fade_value(old.voice_pitch, new.voice_pitch, ratio);
        self.voice_pitch_end = fade_value(old.voice_pitch_end, new.voice_pitch_end, ratio);
        self.voice_pitch_mid = fade_value(old.voice_pitch_mid, new.voice_pitch_mid, ratio);
        self.vibrato_rate = fade_value(old.vibrato_rate, new.vibrato_rate, ratio);
        self.vibrato_depth = fade_value(old.vibrato_depth, new.vibrato_depth, ratio);
        self.voice_amplitude = fade_value(old.voice_amplitude, new.voice_amplitude, ratio);
        self.voice_turbulence_amplitude = fade_value(
            old.voice_turbulence_amplitude,
            new.voice_turbulence_amplitude,
            ratio,
        );
        self.glottal_open_quotient =
            fade_value(old.glottal_open_quotient, new.glottal_open_quotient, ratio);
        self.sine_voicing_amplitude = fade_value(
            old.sine_voicing_amplitude,
            new.sine_voicing_amplitude,
            ratio,
        );

        self.aspiration_amplitude =
            fade_value(old.aspiration_amplitude, new.aspiration_amplitude, ratio);
        self.aspiration_filter_freq = fade_value(
            old.aspiration_filter_freq,
            new.aspiration_filter_freq,
            ratio,
        );
        self.aspiration_filter_bw =
            fade_value(old.aspiration_filter_bw, new.aspiration_filter_bw, ratio);

        self.spectral_tilt = fade_value(old.spectral_tilt, new.spectral_tilt, ratio);
        self.flutter = fade_value(old.flutter, new.flutter, ratio);
        self.open_quotient_shape =
            fade_value(old.open_quotient_shape, new.open_quotient_shape, ratio);
        self.speed_quotient = fade_value(old.speed_quotient, new.speed_quotient, ratio);
        self.diplophonia = fade_value(old.diplophonia, new.diplophonia, ratio);
        self.lf_rd = fade_value(old.lf_rd, new.lf_rd, ratio);

        self.tracheal_pole_freq1 =
            fade_value(old.tracheal_pole_freq1, new.tracheal_pole_freq1, ratio);
        self.tracheal_pole_bw1 = fade_value(old.tracheal_pole_bw1, new.tracheal_pole_bw1, ratio);
        self.tracheal_zero_freq1 =
            fade_value(old.tracheal_zero_freq1, new.tracheal_zero_freq1, ratio);
        self.tracheal_zero_bw1 = fade_value(old.tracheal_zero_bw1, new.tracheal_zero_bw1, ratio);
        self.tracheal_pole_freq2 =
            fade_value(old.tracheal_pole_freq2, new.tracheal_pole_freq2, ratio);
        self.tracheal_pole_bw2 = fade_value(old.tracheal_pole_bw2, new.tracheal_pole_bw2, ratio);
        self.tracheal_zero_freq2 =
            fade_value(old.tracheal_zero_freq2, new.tracheal_zero_freq2, ratio);
        self.tracheal_zero_bw2 = fade_value(old.tracheal_zero_bw2, new.tracheal_zero_bw2, ratio);

        self.delta_f1 = fade_value(old.delta_f1, new.delta_f1, ratio);
        self.delta_b1 = fade_value(old.delta_b1, new.delta_b1, ratio);

        // Step parameters: the new target applies immediately. Fading these
        // smears burst onsets or sweeps noise filters through intermediate
        // frequencies.
        self.burst_amplitude = new.burst_amplitude;
        self.burst_duration = new.burst_duration;
        self.burst_filter_freq = new.burst_filter_freq;
        self.burst_filter_bw = new.burst_filter_bw;
        self.burst_noise_color = new.burst_noise_color;
        self.frication_amplitude = new.frication_amplitude;
        self.noise_filter_freq = new.noise_filter_freq;
        self.noise_filter_bw = new.noise_filter_bw;
        self.parallel_anti_freq = new.parallel_anti_freq;
        self.trill_rate = new.trill_rate;
        self.trill_depth = new.trill_depth;

        self.cf1 = fade_value(old.cf1, new.cf1, ratio);
        self.cf2 = fade_value(old.cf2, new.cf2, ratio);
        self.cf3 = fade_value(old.cf3, new.cf3, ratio);
        self.cf4 = fade_value(old.cf4, new.cf4, ratio);
        self.cf5 = fade_value(old.cf5, new.cf5, ratio);
        self.cf6 = fade_value(old.cf6, new.cf6, ratio);
        self.cb1 = fade_value(old.cb1, new.cb1, ratio);
        self.cb2 = fade_value(old.cb2, new.cb2, ratio);
        self.cb3 = fade_value(old.cb3, new.cb3, ratio);
        self.cb4 = fade_value(old.cb4, new.cb4, ratio);
        self.cb5 = fade_value(old.cb5, new.cb5, ratio);
        self.cb6 = fade_value(old.cb6, new.cb6, ratio);
        self.nasal_zero_freq = fade_value(old.nasal_zero_freq, new.nasal_zero_freq, ratio);
        self.nasal_zero_bw = fade_value(old.nasal_zero_bw, new.nasal_zero_bw, ratio);
        self.nasal_pole_freq = fade_value(old.nasal_pole_freq, new.nasal_pole_freq, ratio);
        self.nasal_pole_bw = fade_value(old.nasal_pole_bw, new.nasal_pole_bw, ratio);
        self.nasal_pole_amplitude =
            fade_value(old.nasal_pole_amplitude, new.nasal_pole_amplitude, ratio);

        self.pf1 = fade_value(old.pf1, new.pf1, ratio);
        self.pf2 = fade_value(old.pf2, new.pf2, ratio);
        self.pf3 = fade_value(old.pf3, new.pf3, ratio);
        self.pf4 = fade_value(old.pf4, new.pf4, ratio);
        self.pf5 = fade_value(old.pf5, new.pf5, ratio);
        self.pf6 = fade_value(old.pf6, new.pf6, ratio);
        self.pb1 = fade_value(old.pb1, new.pb1, ratio);
        self.pb2 = fade_value(old.pb2, new.pb2, ratio);
        self.pb3 = fade_value(old.pb3, new.pb3, ratio);
        self.pb4 = fade_value(old.pb4, new.pb4, ratio);
        self.pb5 = fade_value(old.pb5, new.pb5, ratio);
        self.pb6 = fade_value(old.pb6, new.pb6, ratio);
        self.pa1 = fade_value(old.pa1, new.pa1, ratio);
        self.pa2 = fade_value(old.pa2, new.pa2, ratio);
        self.pa3 = fade_value(old.pa3, new.pa3, ratio);
        self.pa4 = fade_value(old.pa4, new.pa4, ratio);
        self.pa5 = fade_value(old.pa5, new.pa5, ratio);
        self.pa6 = fade_value(old.pa6, new.pa6, ratio);
        self.parallel_anti_bw = fade_value(old.parallel_anti_bw, new.parallel_anti_bw, ratio);
        self.parallel_bypass = fade_value(old.parallel_bypass, new.parallel_bypass, ratio);
        self.parallel_voice_mix =
            fade_value(old.parallel_voice_mix, new.parallel_voice_mix, ratio);

        self.pre_formant_gain = fade_value(old.pre_formant_gain, new.pre_formant_gain, ratio);
        self.output_gain = fade_value(old.output_gain, new.output_gain, ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
    }

    #[test]
    fn test_smoothstep_flat_derivatives_at_endpoints() {
        // First and second derivatives vanish at both ends: values very close
        // to the endpoints stay very close to them.
        let eps = 1e-3;
        assert!(smoothstep(eps) < 1e-8);
        assert!(1.0 - smoothstep(1.0 - eps) < 1e-8);

        // Central slope is positive and monotonic across the range.
        let mut prev = 0.0;
        for i in 1..=100 {
            let s = smoothstep(i as f64 / 100.0);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn test_fade_value_bounds() {
        for i in 0..=10 {
            let v = fade_value(2.0, 8.0, i as f64 / 10.0);
            assert!((2.0..=8.0).contains(&v));
        }
        assert_eq!(fade_value(2.0, 8.0, 0.0), 2.0);
        assert_eq!(fade_value(2.0, 8.0, 1.0), 8.0);
    }

    #[test]
    fn test_fade_value_nan_holds_old() {
        assert_eq!(fade_value(3.0, f64::NAN, 0.5), 3.0);
    }

    #[test]
    fn test_step_parameters_jump_immediately() {
        let old = Frame::default();
        let new = Frame {
            burst_amplitude: 0.8,
            frication_amplitude: 0.5,
            noise_filter_freq: 4000.0,
            noise_filter_bw: 1000.0,
            trill_rate: 25.0,
            trill_depth: 0.9,
            cf1: 700.0,
            ..Frame::default()
        };

        let mut cur = Frame::default();
        cur.set_faded(&old, &new, 0.1);

        // Step parameters hold the full target from the first fade sample.
        assert_eq!(cur.burst_amplitude, 0.8);
        assert_eq!(cur.frication_amplitude, 0.5);
        assert_eq!(cur.noise_filter_freq, 4000.0);
        assert_eq!(cur.trill_rate, 25.0);
        // Smooth parameters are still close to the old value early in a fade.
        assert!(cur.cf1 < 70.0);
    }

    #[test]
    fn test_interpolated_values_stay_within_bounds() {
        let old = Frame {
            cf1: 700.0,
            cb1: 80.0,
            voice_amplitude: 1.0,
            ..Frame::default()
        };
        let new = Frame {
            cf1: 300.0,
            cb1: 120.0,
            voice_amplitude: 0.2,
            ..Frame::default()
        };

        let mut cur = Frame::default();
        for i in 0..=20 {
            cur.set_faded(&old, &new, i as f64 / 20.0);
            assert!((300.0..=700.0).contains(&cur.cf1));
            assert!((80.0..=120.0).contains(&cur.cb1));
            assert!((0.2..=1.0).contains(&cur.voice_amplitude));
        }
    }

    #[test]
    fn test_frame_serde_round_trip() {
        let frame = Frame {
            voice_pitch: 120.0,
            cf1: 700.0,
            ..Frame::default()
        };
        let json = serde_json::to_string(&frame).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, back);
    }
}
