/*
Attack/Release Envelope
=======================

A gated linear ramp. There are no decay or sustain stages and no explicit
stage enum: the gate alone decides which way the level moves.

  Level
    1.0 ┐      ______________
        │     ╱              ╲
        │    ╱                ╲
    0.0 └───╱──────────────────╲───→ Time
          note_on            note_off
          (attack)           (release)

Per sample, while the gate is high:

    level += 1 / (attack · sample_rate)      clamped at 1.0

and while the gate is low:

    level -= 1 / (release · sample_rate)     clamped at 0.0

A zero attack or release time jumps straight to the end of the ramp on the
next sample. note_on/note_off only flip the gate; a retrigger during release
ramps up again from the current level rather than restarting at zero.

`next_sample` must be called exactly once per generated audio sample, in
lockstep with the oscillators, or envelope timing drifts against pitch.
*/

pub struct Envelope {
    attack: f32,  // seconds to ramp 0 → 1
    release: f32, // seconds to ramp 1 → 0
    sample_rate: f32,

    level: f32,
    gate: bool,
}

impl Envelope {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            attack: 0.01,
            release: 0.1,
            sample_rate: sample_rate.max(1.0),
            level: 0.0,
            gate: false,
        }
    }

    pub fn ar(sample_rate: f32, attack: f32, release: f32) -> Self {
        let mut env = Self::new(sample_rate);
        env.set_attack(attack);
        env.set_release(release);
        env
    }

    /// Attack time in seconds. Negative or non-finite values become zero.
    pub fn set_attack(&mut self, attack: f32) {
        self.attack = sanitize_time(attack);
    }

    /// Release time in seconds. Negative or non-finite values become zero.
    pub fn set_release(&mut self, release: f32) {
        self.release = sanitize_time(release);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate >= 1.0 {
            self.sample_rate = sample_rate;
        }
    }

    /// Gate high.
    pub fn note_on(&mut self) {
        self.gate = true;
    }

    /// Gate low.
    pub fn note_off(&mut self) {
        self.gate = false;
    }

    /// Advance the envelope by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.gate {
            self.level = (self.level + step(self.attack, self.sample_rate)).min(1.0);
        } else {
            self.level = (self.level - step(self.release, self.sample_rate)).max(0.0);
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_gated(&self) -> bool {
        self.gate
    }

    /// True while the envelope is producing output or still gated.
    pub fn is_active(&self) -> bool {
        self.gate || self.level > 0.0
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn release(&self) -> f32 {
        self.release
    }
}

#[inline]
fn sanitize_time(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

#[inline]
fn step(time: f32, sample_rate: f32) -> f32 {
    if time > 0.0 {
        1.0 / (time * sample_rate)
    } else {
        1.0
    }
}
