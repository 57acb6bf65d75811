use std::f32::consts::TAU;

use crate::dsp::lfo::SineLfo;

/*
Biquad Low-Pass Filter
======================

A second-order recursive filter in Direct Form I with a sine LFO sweeping
its cutoff.

Coefficients
------------

Given cutoff fc, sample rate fs and resonance r in [0, 1):

    Q     = 0.5 / (1 − r)
    ω     = 2π · fc / fs
    α     = sin ω / (2Q)
    norm  = 1 / (1 + α)

    a0 = a2 = (1 − cos ω) / 2 · norm
    a1      = (1 − cos ω) · norm
    b1      = −2 cos ω · norm
    b2      = (1 − α) · norm

At r = 1 the Q diverges, so resonance is held at or below MAX_RESONANCE.
The DC gain (a0 + a1 + a2) / (1 + b1 + b2) is exactly 1 for every valid
pair, so a constant input settles to itself.

Recurrence
----------

    y = a0·x + a1·x₁ + a2·x₂ − b1·y₁ − b2·y₂

then x₂ ← x₁, x₁ ← x, y₂ ← y₁, y₁ ← y. The history persists across blocks
and is only cleared by `reset`.

LFO
---

While the LFO is active (rate ≥ 1 Hz and depth > 0) the phase advances
every sample and the coefficients are rebuilt from

    cutoff = clamp(base_cutoff + sin(phase) · depth · 5000, 20, 20000)

Otherwise the coefficients change only when a parameter does. All five are
always replaced together.
*/

pub const MIN_CUTOFF_HZ: f32 = 20.0;
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;
/// Highest resonance accepted; Q = 50 here.
pub const MAX_RESONANCE: f32 = 0.99;

/// Keep the effective cutoff below Nyquist at low sample rates.
const NYQUIST_GUARD: f32 = 0.49;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub b1: f32,
    pub b2: f32,
}

impl BiquadCoefficients {
    pub fn lowpass(cutoff_hz: f32, resonance: f32, sample_rate: f32) -> Self {
        let q = 0.5 / (1.0 - resonance);
        let omega = TAU * cutoff_hz / sample_rate;
        let alpha = omega.sin() / (2.0 * q);
        let cosw = omega.cos();
        let norm = 1.0 / (1.0 + alpha);

        let a0 = (1.0 - cosw) * 0.5 * norm;
        Self {
            a0,
            a1: (1.0 - cosw) * norm,
            a2: a0,
            b1: -2.0 * cosw * norm,
            b2: (1.0 - alpha) * norm,
        }
    }

    /// Steady-state gain for a constant input.
    pub fn dc_gain(&self) -> f32 {
        (self.a0 + self.a1 + self.a2) / (1.0 + self.b1 + self.b2)
    }
}

pub struct LowPassFilter {
    sample_rate: f32,
    base_cutoff: f32,
    cutoff: f32, // after LFO modulation
    resonance: f32,
    lfo: SineLfo,

    coeffs: BiquadCoefficients,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl LowPassFilter {
    /// Fully open filter (20 kHz, no resonance, no LFO).
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = sample_rate.max(1.0);
        let mut filter = Self {
            sample_rate,
            base_cutoff: MAX_CUTOFF_HZ,
            cutoff: MAX_CUTOFF_HZ,
            resonance: 0.0,
            lfo: SineLfo::new(sample_rate),
            coeffs: BiquadCoefficients::lowpass(1_000.0, 0.0, sample_rate),
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.apply_cutoff();
        filter
    }

    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    /// Base cutoff in Hz, clamped to [20, 20000].
    pub fn set_cutoff(&mut self, cutoff: f32) {
        if !cutoff.is_finite() {
            return;
        }
        let cutoff = cutoff.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
        if cutoff != self.base_cutoff {
            self.base_cutoff = cutoff;
            self.apply_cutoff();
        }
    }

    /// Resonance, clamped to [0, MAX_RESONANCE].
    pub fn set_resonance(&mut self, resonance: f32) {
        if !resonance.is_finite() {
            return;
        }
        let resonance = resonance.clamp(0.0, MAX_RESONANCE);
        if resonance != self.resonance {
            self.resonance = resonance;
            self.update_coefficients();
        }
    }

    /// LFO rate in Hz.
    pub fn set_auto_variation_frequency(&mut self, rate: f32) {
        let was_active = self.lfo.is_active();
        self.lfo.set_rate(rate);
        if was_active != self.lfo.is_active() {
            self.apply_cutoff();
        }
    }

    /// LFO depth, 0..1.
    pub fn set_auto_variation_amount(&mut self, depth: f32) {
        let before = self.lfo.depth();
        self.lfo.set_depth(depth);
        if before != self.lfo.depth() {
            self.apply_cutoff();
        }
    }

    /// Clear the recurrence history and the LFO phase. Coefficients are kept.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
        self.lfo.reset();
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.lfo.is_active() {
            self.lfo.advance();
            self.apply_cutoff();
        }

        let c = &self.coeffs;
        let output = c.a0 * input + c.a1 * self.x1 + c.a2 * self.x2 - c.b1 * self.y1 - c.b2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Filter a buffer in place.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn base_cutoff(&self) -> f32 {
        self.base_cutoff
    }

    /// Cutoff currently in effect, including LFO modulation.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    pub fn lfo(&self) -> &SineLfo {
        &self.lfo
    }

    fn apply_cutoff(&mut self) {
        self.cutoff = if self.lfo.is_active() {
            (self.base_cutoff + self.lfo.offset_hz()).clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ)
        } else {
            self.base_cutoff
        };
        self.update_coefficients();
    }

    fn update_coefficients(&mut self) {
        let design_cutoff = self.cutoff.min(self.sample_rate * NYQUIST_GUARD);
        self.coeffs = BiquadCoefficients::lowpass(design_cutoff, self.resonance, self.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::PhaseOscillator;

    const SR: f32 = 44_100.0;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn zero_input_stays_zero() {
        let mut filter = LowPassFilter::lowpass(SR, 800.0);
        filter.set_resonance(0.9);
        filter.set_auto_variation_frequency(5.0);
        filter.set_auto_variation_amount(1.0);

        for _ in 0..4096 {
            assert_eq!(filter.process(0.0), 0.0);
        }
    }

    #[test]
    fn unity_gain_at_dc() {
        // At the bottom of the range 1 − cos ω is a few ulps of f32, so the
        // gain is only good to about 1%.
        let cases = [
            (MIN_CUTOFF_HZ, 2e-2),
            (200.0, 5e-3),
            (1_000.0, 5e-3),
            (5_000.0, 5e-3),
            (MAX_CUTOFF_HZ, 5e-3),
        ];
        for &(cutoff, tolerance) in &cases {
            for &resonance in &[0.0, 0.5, 0.9, MAX_RESONANCE] {
                let c = BiquadCoefficients::lowpass(cutoff, resonance, SR);
                assert!(
                    (c.dc_gain() - 1.0).abs() < tolerance,
                    "dc gain {} at cutoff={cutoff} resonance={resonance}",
                    c.dc_gain()
                );
            }
        }
    }

    #[test]
    fn constant_input_settles_to_itself() {
        let mut filter = LowPassFilter::lowpass(SR, 1_000.0);
        filter.set_resonance(0.5);

        let mut last = 0.0;
        for _ in 0..8192 {
            last = filter.process(0.25);
        }
        assert!((last - 0.25).abs() < 1e-3, "settled at {last}");
    }

    #[test]
    fn attenuates_above_cutoff() {
        let mut osc = PhaseOscillator::new(SR);
        osc.set_frequency(8_000.0);
        let mut buffer = vec![0.0f32; 2048];
        osc.render(&mut buffer);
        let dry = peak_after_transient(&buffer);

        let mut filter = LowPassFilter::lowpass(SR, 500.0);
        filter.render(&mut buffer);
        let wet = peak_after_transient(&buffer);

        assert!(wet < dry * 0.1, "expected attenuation: dry={dry}, wet={wet}");
    }

    #[test]
    fn resonance_boosts_near_cutoff() {
        let cutoff = 1_000.0;
        let mut osc = PhaseOscillator::new(SR);
        osc.set_frequency(f64::from(cutoff));
        let mut input = vec![0.0f32; 4096];
        osc.render(&mut input);

        let mut flat = LowPassFilter::lowpass(SR, cutoff);
        let mut low_res = input.clone();
        flat.render(&mut low_res);

        let mut peaked = LowPassFilter::lowpass(SR, cutoff);
        peaked.set_resonance(0.8);
        let mut high_res = input.clone();
        peaked.render(&mut high_res);

        assert!(peak_after_transient(&high_res) > peak_after_transient(&low_res) * 1.5);
    }

    #[test]
    fn cutoff_round_trips_without_lfo() {
        let mut filter = LowPassFilter::new(SR);
        for &cutoff in &[20.0, 440.0, 1234.5, 20_000.0] {
            filter.set_cutoff(cutoff);
            assert_eq!(filter.base_cutoff(), cutoff);
            assert_eq!(filter.cutoff(), cutoff);
        }
    }

    #[test]
    fn out_of_range_parameters_are_clamped() {
        let mut filter = LowPassFilter::new(SR);
        filter.set_cutoff(5.0);
        assert_eq!(filter.base_cutoff(), MIN_CUTOFF_HZ);
        filter.set_cutoff(96_000.0);
        assert_eq!(filter.base_cutoff(), MAX_CUTOFF_HZ);

        filter.set_resonance(1.0);
        assert_eq!(filter.resonance(), MAX_RESONANCE);
        filter.set_resonance(-3.0);
        assert_eq!(filter.resonance(), 0.0);

        filter.set_resonance(f32::NAN);
        filter.set_cutoff(f32::INFINITY);
        assert_eq!(filter.resonance(), 0.0);
        assert_eq!(filter.base_cutoff(), MAX_CUTOFF_HZ);
    }

    #[test]
    fn max_resonance_stays_finite() {
        let mut filter = LowPassFilter::lowpass(SR, 2_000.0);
        filter.set_resonance(1.0);

        let mut osc = PhaseOscillator::new(SR);
        osc.set_frequency(2_000.0);
        for _ in 0..44_100 {
            let y = filter.process(osc.next_sample());
            assert!(y.is_finite());
        }
    }

    #[test]
    fn lfo_sweeps_cutoff_within_bounds() {
        let mut filter = LowPassFilter::lowpass(SR, 1_000.0);
        filter.set_auto_variation_frequency(10.0);
        filter.set_auto_variation_amount(1.0);

        let mut lowest = f32::MAX;
        let mut highest = f32::MIN;
        for _ in 0..(SR as usize / 10) {
            filter.process(0.0);
            let cutoff = filter.cutoff();
            assert!((MIN_CUTOFF_HZ..=MAX_CUTOFF_HZ).contains(&cutoff));
            lowest = lowest.min(cutoff);
            highest = highest.max(cutoff);
        }

        assert_eq!(lowest, MIN_CUTOFF_HZ);
        assert!(highest > 5_900.0);
        assert_eq!(filter.base_cutoff(), 1_000.0);
    }

    #[test]
    fn slow_lfo_is_ignored() {
        let mut filter = LowPassFilter::lowpass(SR, 1_000.0);
        filter.set_auto_variation_frequency(0.5);
        filter.set_auto_variation_amount(1.0);

        for _ in 0..1000 {
            filter.process(0.1);
        }
        assert_eq!(filter.cutoff(), 1_000.0);
        assert_eq!(filter.lfo().phase(), 0.0);
    }

    #[test]
    fn reset_clears_history_but_keeps_coefficients() {
        let mut filter = LowPassFilter::lowpass(SR, 500.0);
        filter.set_auto_variation_frequency(3.0);
        filter.set_auto_variation_amount(0.1);
        for _ in 0..100 {
            filter.process(1.0);
        }
        let coeffs = filter.coefficients();

        filter.reset();

        assert_eq!(filter.coefficients(), coeffs);
        assert_eq!(filter.lfo().phase(), 0.0);
        // empty history: the next output only sees the new input
        let y = filter.process(0.0);
        assert_eq!(y, 0.0);
    }
}
