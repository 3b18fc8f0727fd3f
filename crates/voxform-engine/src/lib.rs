//! voxform-engine: real-time formant speech synthesis
//!
//! This crate implements a Klatt-style (KLSYN88 lineage) source-filter
//! speech synthesizer. A glottal/aspiration/frication source is shaped by
//! cascade and parallel formant resonator banks to produce intelligible
//! speech without recorded samples.
//!
//! # Overview
//!
//! Two components cooperate through pull-based sample demand:
//!
//! - [`FrameManager`] queues articulation target [`Frame`]s from a producer
//!   and interpolates between them on a per-sample basis.
//! - [`WaveGenerator`] pulls the interpolated frame once per output sample
//!   and runs the synthesis pipeline: LF glottal source with 4× oversampled
//!   PolyBLEP anti-aliasing, aspiration and frication noise, stop bursts,
//!   trill modulation, spectral tilt, tracheal coupling, cascade and
//!   parallel formant filtering, peak limiting, and 16-bit quantization.
//!
//! # Determinism
//!
//! All noise flows through PCG32 streams seeded via BLAKE3 derivation from
//! one base seed, so a given frame sequence renders byte-identically across
//! runs. See [`WaveGenerator::with_seed`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use voxform_engine::{Frame, FrameManager, WaveGenerator};
//!
//! let manager = Arc::new(FrameManager::new());
//! let mut generator = WaveGenerator::new(48000)?;
//! generator.set_frame_manager(Arc::clone(&manager));
//!
//! let vowel = Frame { voice_pitch: 120.0, voice_pitch_end: 120.0,
//!     voice_amplitude: 0.5, lf_rd: 1.0, pre_formant_gain: 1.0,
//!     output_gain: 1.0, cf1: 700.0, cb1: 80.0, ..Frame::default() };
//! manager.enqueue(Some(&vowel), 48_000, 480, -1, false);
//!
//! let mut pcm = vec![0i16; 48_000];
//! let produced = generator.generate(&mut pcm);
//! ```
//!
//! # Crate Structure
//!
//! - [`frame`] - the articulation parameter set and fade semantics
//! - [`manager`] - frame queue and per-sample interpolation
//! - [`generator`] - the per-sample synthesis pipeline
//! - [`voice`] - LF glottal model, vibrato, jitter/shimmer, aspiration
//! - [`tract`] - cascade/parallel formant banks and tracheal coupling
//! - [`filter`] - ZDF SVF resonators and the other filter primitives
//! - [`noise`] - white/pink/colored noise sources
//! - [`burst`] - stop-burst transients
//! - [`dynamics`] - output peak limiting
//! - [`rng`] - deterministic seed derivation

pub mod burst;
pub mod denormal;
pub mod dynamics;
pub mod error;
pub mod filter;
pub mod frame;
pub mod generator;
pub mod manager;
pub mod modulation;
pub mod noise;
pub mod rng;
pub mod tract;
pub mod voice;

pub use denormal::suppress_denormals;
pub use error::{EngineError, EngineResult};
pub use frame::Frame;
pub use generator::WaveGenerator;
pub use manager::FrameManager;

/// Base noise seed used by [`WaveGenerator::new`].
pub const DEFAULT_SEED: u32 = 0x564F_5846;
