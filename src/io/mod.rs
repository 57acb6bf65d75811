// Purpose - the outside world: the sound card and the note keys

pub mod host;
pub mod keyboard;

pub use host::AudioHost;
