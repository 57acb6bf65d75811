use rtrb::Producer;
use tracing::{debug, warn};

use crate::{
    io::keyboard::{self, MAX_OCTAVE, MIN_OCTAVE},
    synth::{message::NoteMessage, params::ParamStore},
};

/// Control-side handle: writes pitch into the store and sends note events
/// to the render thread.
///
/// Monophonic with last-key priority. Pressing a key while another is held
/// releases the old one first; releasing a key that is not the sounding one
/// does nothing.
pub struct SynthController {
    store: ParamStore,
    notes: Producer<NoteMessage>,
    octave: i8,
    active_key: Option<u8>,
}

impl SynthController {
    pub fn new(store: ParamStore, notes: Producer<NoteMessage>) -> Self {
        Self {
            store,
            notes,
            octave: 0,
            active_key: None,
        }
    }

    pub fn with_octave(mut self, octave: i8) -> Self {
        self.octave = keyboard::clamp_octave(octave);
        self
    }

    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn active_key(&self) -> Option<u8> {
        self.active_key
    }

    pub fn octave_up(&mut self) {
        if self.octave < MAX_OCTAVE {
            self.octave += 1;
        }
    }

    pub fn octave_down(&mut self) {
        if self.octave > MIN_OCTAVE {
            self.octave -= 1;
        }
    }

    /// Start `key` (1..=13). Returns false for unknown keys, repeats of the
    /// sounding key, or a full note queue.
    pub fn press_key(&mut self, key: u8) -> bool {
        let Some(frequency) = keyboard::note_frequency(key, self.octave) else {
            warn!(key, "ignoring unknown key");
            return false;
        };
        if self.active_key == Some(key) {
            return false;
        }

        if self.active_key.is_some() {
            self.send(NoteMessage::NoteOff);
        }

        // Pitch goes in before the gate so the render side never starts the
        // note at the previous frequency.
        self.store.set_frequency(frequency);
        if !self.send(NoteMessage::NoteOn { key }) {
            self.active_key = None;
            return false;
        }

        debug!(key, frequency, octave = self.octave, "note on");
        self.active_key = Some(key);
        true
    }

    pub fn release_key(&mut self, key: u8) {
        if self.active_key == Some(key) {
            self.release_all();
        }
    }

    pub fn release_all(&mut self) {
        if let Some(key) = self.active_key.take() {
            self.send(NoteMessage::NoteOff);
            debug!(key, "note off");
        }
    }

    fn send(&mut self, msg: NoteMessage) -> bool {
        match self.notes.push(msg) {
            Ok(()) => true,
            Err(_) => {
                warn!(?msg, "note queue full, dropping event");
                false
            }
        }
    }
}
