use crate::{
    dsp::{envelope::Envelope, oscillator::PhaseOscillator, oscillator::Waveform},
    synth::params::{OscSlot, SynthParams},
};

/// Three oscillators sharing one attack/release envelope.
///
/// The oscillator outputs are summed without normalisation: with all three
/// enabled the peak can reach three times a single oscillator's. Level is
/// tamed downstream by the filter and master volume.
pub struct VoiceMixer {
    oscillators: [PhaseOscillator; 3],
    envelope: Envelope,
}

impl VoiceMixer {
    /// Triangle enabled, saw and noise disabled.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            oscillators: [
                PhaseOscillator::new(sample_rate).with_waveform(Waveform::Triangle),
                PhaseOscillator::new(sample_rate)
                    .with_waveform(Waveform::Saw)
                    .with_enabled(false),
                PhaseOscillator::new(sample_rate)
                    .with_waveform(Waveform::Noise)
                    .with_enabled(false),
            ],
            envelope: Envelope::new(sample_rate),
        }
    }

    /// Same base frequency for all three oscillators.
    pub fn set_frequency(&mut self, frequency: f64) {
        for osc in &mut self.oscillators {
            osc.set_frequency(frequency);
        }
    }

    pub fn oscillator(&self, slot: OscSlot) -> &PhaseOscillator {
        &self.oscillators[slot.index()]
    }

    pub fn oscillator_mut(&mut self, slot: OscSlot) -> &mut PhaseOscillator {
        &mut self.oscillators[slot.index()]
    }

    pub fn set_attack(&mut self, attack: f32) {
        self.envelope.set_attack(attack);
    }

    pub fn set_release(&mut self, release: f32) {
        self.envelope.set_release(release);
    }

    pub fn set_envelope_sample_rate(&mut self, sample_rate: f32) {
        self.envelope.set_sample_rate(sample_rate);
    }

    pub fn note_on(&mut self) {
        self.envelope.note_on();
    }

    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    /// True while gated or still releasing.
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    /// Push a parameter snapshot into the oscillators and the envelope.
    pub fn apply(&mut self, params: &SynthParams) {
        for (osc, p) in self.oscillators.iter_mut().zip(&params.oscillators) {
            osc.set_frequency(params.frequency);
            osc.set_frequency_offset(p.offset);
            osc.set_waveform(p.waveform);
            osc.set_enabled(p.enabled);
        }
        self.envelope.set_attack(params.attack);
        self.envelope.set_release(params.release);
    }

    /// One mixed sample. The envelope advances exactly once per call.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let [a, b, c] = &mut self.oscillators;
        let sum = a.next_sample() + b.next_sample() + c.next_sample();
        sum * self.envelope.next_sample()
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BASE_AMPLITUDE;

    const SR: f32 = 44_100.0;

    #[test]
    fn defaults_enable_only_the_triangle() {
        let voice = VoiceMixer::new(SR);
        assert!(voice.oscillator(OscSlot::Osc1).is_enabled());
        assert_eq!(voice.oscillator(OscSlot::Osc1).waveform(), Waveform::Triangle);
        assert!(!voice.oscillator(OscSlot::Osc2).is_enabled());
        assert_eq!(voice.oscillator(OscSlot::Osc2).waveform(), Waveform::Saw);
        assert!(!voice.oscillator(OscSlot::Osc3).is_enabled());
        assert_eq!(voice.oscillator(OscSlot::Osc3).waveform(), Waveform::Noise);
    }

    #[test]
    fn single_oscillator_matches_standalone_times_envelope() {
        let mut voice = VoiceMixer::new(SR);
        voice.set_frequency(330.0);
        voice.set_attack(0.01);
        voice.note_on();

        let mut osc = PhaseOscillator::new(SR);
        osc.set_frequency(330.0);
        let mut env = Envelope::ar(SR, 0.01, 0.1);
        env.note_on();

        let mut buffer = vec![0.0f32; 1024];
        voice.render(&mut buffer);

        for (i, &actual) in buffer.iter().enumerate() {
            let expected = osc.next_sample() * env.next_sample();
            assert_eq!(actual, expected, "sample {i} diverged");
        }
    }

    #[test]
    fn silent_without_note() {
        let mut voice = VoiceMixer::new(SR);
        let mut buffer = vec![1.0f32; 256];
        voice.render(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn first_sample_after_instant_attack_is_zero() {
        let mut voice = VoiceMixer::new(SR);
        voice.set_frequency(440.0);
        voice.set_attack(0.0);
        voice.set_release(0.0);
        voice.note_on();

        assert_eq!(voice.next_sample(), 0.0);
        assert_eq!(voice.envelope_level(), 1.0);
    }

    #[test]
    fn sum_is_not_normalised() {
        // Three saws in phase peak near 3 * A
        let mut voice = VoiceMixer::new(SR);
        for slot in OscSlot::ALL {
            let osc = voice.oscillator_mut(slot);
            osc.set_waveform(Waveform::Saw);
            osc.set_enabled(true);
        }
        voice.set_frequency(100.0);
        voice.set_attack(0.0);
        voice.note_on();

        let mut buffer = vec![0.0f32; 441];
        voice.render(&mut buffer);
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));

        assert!(peak > 2.9 * BASE_AMPLITUDE, "peak {peak}");
        assert!(peak <= 3.0 * BASE_AMPLITUDE + 1e-6);
    }

    #[test]
    fn apply_pushes_snapshot_into_oscillators() {
        let mut params = SynthParams::default();
        params.frequency = 110.0;
        params.oscillators[1].enabled = true;
        params.oscillators[1].offset = 3.0;
        params.oscillators[2].waveform = Waveform::Triangle;

        let mut voice = VoiceMixer::new(SR);
        voice.apply(&params);

        assert_eq!(voice.oscillator(OscSlot::Osc1).frequency(), 110.0);
        assert!(voice.oscillator(OscSlot::Osc2).is_enabled());
        assert_eq!(voice.oscillator(OscSlot::Osc3).waveform(), Waveform::Triangle);
        let expected = std::f64::consts::TAU * 113.0 / f64::from(SR);
        assert!((voice.oscillator(OscSlot::Osc2).increment() - expected).abs() < 1e-12);
    }
}
