//! Denormal (subnormal) float suppression.
//!
//! The resonator feedback paths decay exponentially and would otherwise
//! spend long stretches in subnormal range, where some CPUs take a
//! microcode assist per operation. Flush-to-zero and denormals-are-zero are
//! process-wide FPU modes, so this is an explicit initialization step rather
//! than a hidden construction side effect; [`crate::WaveGenerator::new`]
//! calls it once.

/// Enables flush-to-zero and denormals-are-zero where the platform supports
/// it; a no-op elsewhere.
pub fn suppress_denormals() {
    #[cfg(target_arch = "x86_64")]
    {
        // MXCSR: FTZ (bit 15) + DAZ (bit 6).
        #[allow(deprecated)]
        unsafe {
            use std::arch::x86_64::{_mm_getcsr, _mm_setcsr};
            _mm_setcsr(_mm_getcsr() | 0x8040);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppress_denormals_is_callable() {
        // Idempotent and safe to call repeatedly.
        suppress_denormals();
        suppress_denormals();
    }
}
