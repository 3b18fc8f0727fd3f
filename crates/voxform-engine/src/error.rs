//! Error types for the synthesis engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur when constructing engine components.
///
/// The per-sample generation path has no recoverable error surface: invalid
/// filter parameters degrade to bypass inside the primitive that consumes
/// them, and NaN frame targets are held at their previous value by the
/// interpolator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Sample rate outside the range the filter primitives can represent.
    #[error("invalid sample rate: {rate} Hz (must be at least {min} Hz)")]
    InvalidSampleRate {
        /// The rejected sample rate.
        rate: u32,
        /// Minimum accepted sample rate.
        min: u32,
    },
}
