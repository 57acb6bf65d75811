pub mod dsp; // Oscillator, envelope, filter primitives
pub mod error;
pub mod io; // Audio device and keyboard mapping
pub mod synth; // Voice, parameter store and render engine

pub use error::EngineError;
pub use synth::engine::{EngineConfig, RenderEngine, RenderStatus};
pub use synth::params::{ParamStore, SynthParams};

/// Reference sample rate of the engine.
pub const SAMPLE_RATE: u32 = 44_100;
/// Frames rendered per engine block in the reference configuration.
pub const BLOCK_SIZE: usize = 256;
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Peak amplitude of a single oscillator.
pub const BASE_AMPLITUDE: f32 = 0.5;
