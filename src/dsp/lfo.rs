//! Sine LFO used to sweep the filter cutoff.

use std::f32::consts::TAU;

/*
Low Frequency Oscillator
========================

An oscillator at control rate (roughly 1-20 Hz here) whose output moves a
parameter instead of being heard. The filter uses one to sweep its cutoff:

    cutoff = base_cutoff + sin(phase) · depth · LFO_DEPTH_HZ

  rate    Hz. Below MIN_ACTIVE_RATE the LFO is considered off.
  depth   0..1. Zero depth is off as well.

The LFO is free-running: its phase keeps going across blocks and notes and
only returns to zero on an explicit reset.
*/

/// Cutoff swing in Hz at full depth.
pub const LFO_DEPTH_HZ: f32 = 5_000.0;
/// Rates below this are treated as "no modulation".
pub const MIN_ACTIVE_RATE: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct SineLfo {
    sample_rate: f32,
    rate: f32,
    depth: f32,
    phase: f32,
}

impl SineLfo {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate: sample_rate.max(1.0),
            rate: 0.0,
            depth: 0.0,
            phase: 0.0,
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        if rate.is_finite() {
            self.rate = rate.max(0.0);
        }
    }

    pub fn set_depth(&mut self, depth: f32) {
        if depth.is_finite() {
            self.depth = depth.clamp(0.0, 1.0);
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.rate >= MIN_ACTIVE_RATE && self.depth > 0.0
    }

    /// Move the phase forward by one sample.
    #[inline]
    pub fn advance(&mut self) {
        self.phase += TAU * self.rate / self.sample_rate;
        if self.phase >= TAU {
            self.phase = self.phase.rem_euclid(TAU);
        }
    }

    /// Modulation offset in Hz at the current phase.
    #[inline]
    pub fn offset_hz(&self) -> f32 {
        self.phase.sin() * self.depth * LFO_DEPTH_HZ
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
