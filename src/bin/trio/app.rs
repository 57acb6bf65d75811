//! Wiring: parameter store, note queue, render engine and audio output.

use std::{thread, time::Duration};

use color_eyre::eyre::{ensure, Result as EyreResult, WrapErr};
use rtrb::{Consumer, RingBuffer};

use trio_synth::{
    io::AudioHost,
    synth::{controller::SynthController, engine::BlockTelemetry, message::note_queue},
    EngineConfig, ParamStore, RenderEngine,
};

/// Scope samples buffered between UI frames (~185 ms at 44.1 kHz)
const SCOPE_QUEUE_SIZE: usize = 8192;
const TELEMETRY_QUEUE_SIZE: usize = 64;

/// Key 13 of octave 0
const HEADLESS_KEY: u8 = 13;
const MAX_RELEASE_WAIT: f32 = 10.0;

/// A running synth: the control handle plus the taps coming back from the
/// audio thread.
pub struct Synth {
    pub controller: SynthController,
    pub host: AudioHost,
    pub scope_rx: Consumer<f32>,
    pub telemetry_rx: Consumer<BlockTelemetry>,
    pub config: EngineConfig,
}

impl Synth {
    pub fn start(config: EngineConfig, octave: i8) -> EyreResult<Self> {
        let store = ParamStore::default();
        let (note_tx, note_rx) = note_queue();
        let (scope_tx, scope_rx) = RingBuffer::new(SCOPE_QUEUE_SIZE);
        let (telemetry_tx, telemetry_rx) = RingBuffer::new(TELEMETRY_QUEUE_SIZE);

        let engine = RenderEngine::new(config, store.clone(), note_rx)
            .with_scope(scope_tx)
            .with_telemetry(telemetry_tx);
        let config = engine.config();

        let host = AudioHost::start(engine).wrap_err("failed to start audio output")?;
        let controller = SynthController::new(store, note_tx).with_octave(octave);

        Ok(Self {
            controller,
            host,
            scope_rx,
            telemetry_rx,
            config,
        })
    }
}

/// Hold one note for `seconds`, let it release, then stop.
pub fn run_headless(mut synth: Synth, seconds: f32) -> EyreResult<()> {
    ensure!(
        seconds.is_finite() && seconds >= 0.0,
        "headless duration must be a non-negative number of seconds"
    );

    println!("=== trio ===");
    println!("Device: {}", synth.host.device_name());
    println!("Sample rate: {} Hz", synth.config.sample_rate);
    println!("Holding key {HEADLESS_KEY} for {seconds:.1} s");

    synth.controller.press_key(HEADLESS_KEY);
    thread::sleep(Duration::from_secs_f32(seconds));
    synth.controller.release_all();

    let release = synth.controller.store().snapshot().release.min(MAX_RELEASE_WAIT);
    thread::sleep(Duration::from_secs_f32(release));

    synth.host.stop()?;
    tracing::info!("headless run finished");
    Ok(())
}
