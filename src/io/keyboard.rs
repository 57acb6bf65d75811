//! Note keys and their frequencies.
//!
//! The keyboard has 13 keys spanning one octave plus the octave above,
//! tuned from A3 (220 Hz):
//!
//! ```text
//! f = 220 · 2^(octave + (key − 1) / 12)
//! ```
//!
//! with `key` in 1..=13 and `octave` in -2..=1.

pub const KEY_COUNT: u8 = 13;
pub const MIN_OCTAVE: i8 = -2;
pub const MAX_OCTAVE: i8 = 1;
const BASE_FREQUENCY: f64 = 220.0;

/// Computer-keyboard layout, one character per key starting at key 1.
pub const KEY_LAYOUT: [char; KEY_COUNT as usize] =
    ['s', 'e', 'd', 'r', 'f', 'g', 'y', 'h', 'u', 'j', 'i', 'k', 'l'];

/// Frequency of `key` in `octave`, or `None` when the key does not exist.
/// The octave is clamped to the supported range.
pub fn note_frequency(key: u8, octave: i8) -> Option<f64> {
    if !(1..=KEY_COUNT).contains(&key) {
        return None;
    }
    let octave = f64::from(clamp_octave(octave));
    let semitone = f64::from(key - 1);
    Some(BASE_FREQUENCY * 2.0_f64.powf(octave + semitone / 12.0))
}

pub fn clamp_octave(octave: i8) -> i8 {
    octave.clamp(MIN_OCTAVE, MAX_OCTAVE)
}

/// Key number bound to a character of the layout (case-insensitive).
pub fn key_for_char(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    KEY_LAYOUT
        .iter()
        .position(|&k| k == c)
        .map(|i| i as u8 + 1)
}

/// Keys on the upper row of the layout (e r y u i), drawn as raised keys.
pub fn is_upper_row(key: u8) -> bool {
    matches!(key, 2 | 4 | 7 | 9 | 11)
}
