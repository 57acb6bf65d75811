//! Shared parameter store: the control surface writes, the render thread reads.
//!
//! Every setter takes the lock once for its own field, so each field update
//! is atomic. The render thread copies the whole block out under a single
//! lock once per audio block (`snapshot`), so a block never mixes half of
//! one setter call with half of another. Separate setter calls are still
//! independent: two updates made back to back may land in different blocks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::dsp::filter::{MAX_CUTOFF_HZ, MAX_RESONANCE, MIN_CUTOFF_HZ};
use crate::dsp::oscillator::Waveform;

/// Fastest filter LFO the store accepts, in Hz.
pub const MAX_LFO_RATE_HZ: f32 = 20.0;
/// Highest base pitch the store accepts, in Hz.
pub const MAX_FREQUENCY_HZ: f64 = 20_000.0;

/// One of the three oscillators of the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscSlot {
    Osc1,
    Osc2,
    Osc3,
}

impl OscSlot {
    pub const ALL: [OscSlot; 3] = [OscSlot::Osc1, OscSlot::Osc2, OscSlot::Osc3];

    pub fn index(self) -> usize {
        match self {
            OscSlot::Osc1 => 0,
            OscSlot::Osc2 => 1,
            OscSlot::Osc3 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    pub enabled: bool,
    pub waveform: Waveform,
    /// Additive offset in Hz (labelled semitones on the control surface).
    pub offset: f32,
}

/// Every user-adjustable parameter of the synth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Base frequency in Hz
    pub frequency: f64,
    pub oscillators: [OscillatorParams; 3],
    /// Envelope attack in seconds
    pub attack: f32,
    /// Envelope release in seconds
    pub release: f32,
    /// Filter cutoff in Hz, [20, 20000]
    pub filter_cutoff: f32,
    /// Filter resonance, [0, 0.99]
    pub filter_resonance: f32,
    /// Cutoff LFO rate in Hz
    pub lfo_rate: f32,
    /// Cutoff LFO depth, [0, 1]
    pub lfo_depth: f32,
    /// Master volume, [0, 1]
    pub volume: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            oscillators: [
                OscillatorParams {
                    enabled: true,
                    waveform: Waveform::Triangle,
                    offset: 0.0,
                },
                OscillatorParams {
                    enabled: false,
                    waveform: Waveform::Saw,
                    offset: 0.0,
                },
                OscillatorParams {
                    enabled: false,
                    waveform: Waveform::Noise,
                    offset: 0.0,
                },
            ],
            attack: 0.1,
            release: 0.5,
            filter_cutoff: MAX_CUTOFF_HZ,
            filter_resonance: 0.0,
            lfo_rate: 10.0,
            lfo_depth: 0.0,
            volume: 1.0,
        }
    }
}

impl SynthParams {
    pub fn oscillator(&self, slot: OscSlot) -> &OscillatorParams {
        &self.oscillators[slot.index()]
    }
}

/// Cloneable handle to the shared parameter block.
#[derive(Clone, Default)]
pub struct ParamStore {
    inner: Arc<Mutex<SynthParams>>,
}

impl ParamStore {
    pub fn new(params: SynthParams) -> Self {
        Self {
            inner: Arc::new(Mutex::new(params)),
        }
    }

    /// Copy of the whole parameter block taken under one lock.
    pub fn snapshot(&self) -> SynthParams {
        *self.lock()
    }

    pub fn set_frequency(&self, frequency: f64) {
        if !frequency.is_finite() {
            warn!(frequency, "rejecting non-finite frequency");
            return;
        }
        let frequency = frequency.clamp(0.0, MAX_FREQUENCY_HZ);
        self.lock().frequency = frequency;
    }

    pub fn set_osc_enabled(&self, slot: OscSlot, enabled: bool) {
        self.lock().oscillators[slot.index()].enabled = enabled;
    }

    pub fn set_osc_waveform(&self, slot: OscSlot, waveform: Waveform) {
        self.lock().oscillators[slot.index()].waveform = waveform;
    }

    pub fn set_osc_offset(&self, slot: OscSlot, offset: f32) {
        let Some(offset) = finite("oscillator offset", offset) else {
            return;
        };
        self.lock().oscillators[slot.index()].offset = offset;
    }

    pub fn set_attack(&self, attack: f32) {
        let Some(attack) = finite("attack", attack) else {
            return;
        };
        self.lock().attack = clamped("attack", attack, 0.0, f32::MAX);
    }

    pub fn set_release(&self, release: f32) {
        let Some(release) = finite("release", release) else {
            return;
        };
        self.lock().release = clamped("release", release, 0.0, f32::MAX);
    }

    pub fn set_filter_cutoff(&self, cutoff: f32) {
        let Some(cutoff) = finite("filter cutoff", cutoff) else {
            return;
        };
        self.lock().filter_cutoff = clamped("filter cutoff", cutoff, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
    }

    /// Resonance at or above 1.0 would make Q infinite; it is held at 0.99.
    pub fn set_filter_resonance(&self, resonance: f32) {
        let Some(resonance) = finite("filter resonance", resonance) else {
            return;
        };
        self.lock().filter_resonance = clamped("filter resonance", resonance, 0.0, MAX_RESONANCE);
    }

    pub fn set_lfo_rate(&self, rate: f32) {
        let Some(rate) = finite("lfo rate", rate) else {
            return;
        };
        self.lock().lfo_rate = clamped("lfo rate", rate, 0.0, MAX_LFO_RATE_HZ);
    }

    pub fn set_lfo_depth(&self, depth: f32) {
        let Some(depth) = finite("lfo depth", depth) else {
            return;
        };
        self.lock().lfo_depth = clamped("lfo depth", depth, 0.0, 1.0);
    }

    pub fn set_volume(&self, volume: f32) {
        let Some(volume) = finite("volume", volume) else {
            return;
        };
        self.lock().volume = clamped("volume", volume, 0.0, 1.0);
    }

    // A writer that panicked mid-update can only have left a plain Copy
    // struct behind, so a poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, SynthParams> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn finite(name: &'static str, value: f32) -> Option<f32> {
    if value.is_finite() {
        Some(value)
    } else {
        warn!(parameter = name, value, "rejecting non-finite value");
        None
    }
}

fn clamped(name: &'static str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        debug!(parameter = name, value, clamped, "parameter clamped");
    }
    clamped
}
