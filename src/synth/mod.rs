// Purpose: the voice, the shared parameters and the render callback.
// Everything here except `params` and `controller` runs on the render thread.

pub mod controller;
pub mod engine;
pub mod message;
pub mod params;
pub mod voice;
