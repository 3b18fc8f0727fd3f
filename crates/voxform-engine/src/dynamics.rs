//! Output dynamics: transparent peak limiting.

/// Peak limiter with instant-ish attack and slow release.
///
/// Transparent below the threshold (−3 dB of full scale); above it the gain
/// tracks `threshold / |input|` with a 0.1 ms attack. Release is 50 ms in
/// normal operation and 5 ms during silence, so the limiter has recovered
/// before the next stop burst instead of choking it.
#[derive(Debug, Clone)]
pub struct PeakLimiter {
    gain: f64,
    threshold: f64,
    attack_alpha: f64,
    release_alpha: f64,
    fast_release_alpha: f64,
    fast_release: bool,
}

impl PeakLimiter {
    pub fn new(sample_rate: u32, threshold_db: f64) -> Self {
        let sr = sample_rate as f64;
        PeakLimiter {
            gain: 1.0,
            threshold: 32767.0 * 10f64.powf(threshold_db / 20.0),
            attack_alpha: 1.0 - (-1.0 / (0.0001 * sr)).exp(),
            release_alpha: 1.0 - (-1.0 / (0.050 * sr)).exp(),
            fast_release_alpha: 1.0 - (-1.0 / (0.005 * sr)).exp(),
            fast_release: false,
        }
    }

    /// Switches to the fast release used during silence and closures.
    pub fn set_fast_release(&mut self, fast: bool) {
        self.fast_release = fast;
    }

    /// Limits one sample.
    #[inline]
    pub fn limit(&mut self, input: f64) -> f64 {
        let abs_in = input.abs();
        if abs_in > self.threshold {
            let target = self.threshold / abs_in;
            self.gain += self.attack_alpha * (target - self.gain);
        } else {
            let alpha = if self.fast_release {
                self.fast_release_alpha
            } else {
                self.release_alpha
            };
            self.gain += alpha * (1.0 - self.gain);
        }
        input * self.gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_below_threshold() {
        let mut limiter = PeakLimiter::new(48000, -3.0);
        for i in 0..1000 {
            let x = 10_000.0 * ((i as f64) / 50.0).sin();
            let y = limiter.limit(x);
            assert!((y - x).abs() < 1.0);
        }
    }

    #[test]
    fn test_limits_sustained_overdrive() {
        let mut limiter = PeakLimiter::new(48000, -3.0);
        let threshold = 32767.0 * 10f64.powf(-3.0 / 20.0);
        let mut out = 0.0;
        for _ in 0..4800 {
            out = limiter.limit(100_000.0);
        }
        // After the attack converges the output sits at the threshold.
        assert!(out <= threshold * 1.01);
        assert!(out > threshold * 0.9);
    }

    #[test]
    fn test_release_restores_unity_gain() {
        let mut limiter = PeakLimiter::new(48000, -3.0);
        for _ in 0..4800 {
            limiter.limit(100_000.0);
        }
        // 500 ms of quiet signal: 50 ms release has long converged.
        let mut out = 0.0;
        for _ in 0..24_000 {
            out = limiter.limit(1000.0);
        }
        assert!((out - 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_fast_release_recovers_sooner() {
        let drive = |fast: bool| -> f64 {
            let mut limiter = PeakLimiter::new(48000, -3.0);
            limiter.limit(100_000.0);
            limiter.set_fast_release(fast);
            // 10 ms of silence.
            let mut out = 0.0;
            for _ in 0..480 {
                out = limiter.limit(1000.0);
            }
            out
        };
        let slow = drive(false);
        let fast = drive(true);
        assert!(fast > slow);
        assert!((fast - 1000.0).abs() < 150.0);
    }
}
