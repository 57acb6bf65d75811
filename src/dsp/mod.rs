//! Low-level DSP primitives used by the voice and the render engine.
//!
//! These components are allocation-free and carry no locks. They are owned
//! and driven by the render thread only, one sample at a time.

/// Attack/release envelope generator.
pub mod envelope;
/// Biquad low-pass filter with LFO-swept cutoff.
pub mod filter;
/// Sine LFO driving the filter cutoff.
pub mod lfo;
/// Phase-accumulating oscillator: triangle, saw and noise.
pub mod oscillator;

pub use envelope::Envelope;
pub use filter::{BiquadCoefficients, LowPassFilter};
pub use lfo::SineLfo;
pub use oscillator::{PhaseOscillator, Waveform};
