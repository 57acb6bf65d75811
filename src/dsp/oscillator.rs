use std::f64::consts::{PI, TAU};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{BASE_AMPLITUDE, SAMPLE_RATE};

/*
Phase Oscillator
================

A free-running phase accumulator that turns a frequency into one waveform
sample per tick.

  phase       Where we are in the cycle, in radians. Always in [0, 2π).

  increment   How far the phase moves per sample:

                  increment = 2π · frequency / sample_rate

              Recomputed eagerly whenever the frequency or the offset
              changes, never lazily while rendering.

  offset      Added to the base frequency in Hz. The control surface labels
              it "semitones" but the value is applied as a plain additive
              frequency:

                  effective = frequency + offset

Waveforms (A = BASE_AMPLITUDE = 0.5)
------------------------------------

  Triangle    A · asin(sin φ) · 2/π           advances φ
  Saw         A · (φ/π − 1)                   advances φ
  Noise       A · uniform(−1, 1)              phase is left alone

A disabled oscillator outputs silence and does not move its phase, so the
waveform resumes exactly where it stopped when it is switched back on.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Triangle,
    Saw,
    Noise,
}

impl Waveform {
    pub const ALL: [Waveform; 3] = [Waveform::Triangle, Waveform::Saw, Waveform::Noise];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Triangle => "Triangle",
            Waveform::Saw => "Saw",
            Waveform::Noise => "Noise",
        }
    }

    /// Next waveform in selector order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Waveform::Triangle => Waveform::Saw,
            Waveform::Saw => Waveform::Noise,
            Waveform::Noise => Waveform::Triangle,
        }
    }
}

const NOISE_SEED: u64 = 0x7431_5eed;

pub struct PhaseOscillator {
    sample_rate: f64,
    frequency: f64,
    offset: f32,
    phase: f64,
    increment: f64,
    waveform: Waveform,
    enabled: bool,
    rng: SmallRng,
}

impl PhaseOscillator {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            sample_rate: f64::from(sample_rate.max(1.0)),
            frequency: 440.0,
            offset: 0.0,
            phase: 0.0,
            increment: 0.0,
            waveform: Waveform::Triangle,
            enabled: true,
            rng: SmallRng::seed_from_u64(NOISE_SEED),
        };
        osc.update_increment();
        osc
    }

    pub fn triangle() -> Self {
        Self::new(SAMPLE_RATE as f32)
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
        self.update_increment();
    }

    /// Additive frequency offset in Hz (see module notes).
    pub fn set_frequency_offset(&mut self, offset: f32) {
        self.offset = offset;
        self.update_increment();
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Jump to an arbitrary phase, wrapped into [0, 2π).
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = if phase.is_finite() {
            phase.rem_euclid(TAU)
        } else {
            0.0
        };
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    fn update_increment(&mut self) {
        let effective = self.frequency + f64::from(self.offset);
        let increment = TAU * effective / self.sample_rate;
        // A NaN increment would poison the phase forever.
        self.increment = if increment.is_finite() { increment } else { 0.0 };
    }

    #[inline]
    fn advance(&mut self) {
        // rem_euclid also handles negative effective frequencies
        self.phase = (self.phase + self.increment).rem_euclid(TAU);
        if self.phase >= TAU {
            self.phase = 0.0;
        }
    }

    /// Produce one sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if !self.enabled {
            return 0.0;
        }

        match self.waveform {
            Waveform::Triangle => {
                let value = self.phase.sin().asin() * (2.0 / PI);
                self.advance();
                BASE_AMPLITUDE * value as f32
            }
            Waveform::Saw => {
                let value = self.phase / PI - 1.0;
                self.advance();
                BASE_AMPLITUDE * value as f32
            }
            Waveform::Noise => BASE_AMPLITUDE * self.rng.random_range(-1.0f32..=1.0),
        }
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

impl Default for PhaseOscillator {
    fn default() -> Self {
        Self::triangle()
    }
}
