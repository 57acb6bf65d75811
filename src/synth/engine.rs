//! Render engine: the audio callback body.
//!
//! Per block:
//!   1. drain pending note messages
//!   2. copy the parameter block out of the store (one short lock)
//!   3. push frequency, oscillator settings and envelope times into the voice
//!   4. render the voice into the mono scratch buffer
//!   5. push filter settings, then filter, scale by volume and write the
//!      same value to the left and right channels
//!
//! Nothing here allocates, blocks on I/O or panics once the engine is built.

use rtrb::{Consumer, Producer};

use crate::{
    dsp::filter::LowPassFilter,
    synth::{
        message::{MessageReceiver, NoteMessage},
        params::{ParamStore, SynthParams},
        voice::VoiceMixer,
    },
    BLOCK_SIZE, MAX_BLOCK_SIZE, SAMPLE_RATE,
};

/// Interleaved stereo output.
pub const CHANNELS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub block_size: usize,
}

impl EngineConfig {
    pub fn new(sample_rate: u32, block_size: usize) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            block_size: block_size.clamp(1, MAX_BLOCK_SIZE),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(SAMPLE_RATE, BLOCK_SIZE)
    }
}

/// Result of one render call. The stream keeps running either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Continue,
    /// Some samples were non-finite and were replaced by silence.
    Degraded,
}

/// Per-block state reported to the control surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockTelemetry {
    pub envelope: f32,
    /// Filter cutoff in effect at the end of the block, LFO included
    pub cutoff: f32,
    pub peak: f32,
    pub active_key: Option<u8>,
}

pub struct RenderEngine<R: MessageReceiver = Consumer<NoteMessage>> {
    config: EngineConfig,
    store: ParamStore,
    notes: R,
    voice: VoiceMixer,
    filter: LowPassFilter,
    scratch: Vec<f32>,
    active_key: Option<u8>,
    scope: Option<Producer<f32>>,
    telemetry: Option<Producer<BlockTelemetry>>,
}

impl<R: MessageReceiver> RenderEngine<R> {
    pub fn new(config: EngineConfig, store: ParamStore, notes: R) -> Self {
        let config = EngineConfig::new(config.sample_rate, config.block_size);
        let sample_rate = config.sample_rate as f32;

        Self {
            config,
            store,
            notes,
            voice: VoiceMixer::new(sample_rate),
            filter: LowPassFilter::new(sample_rate),
            scratch: vec![0.0; config.block_size],
            active_key: None,
            scope: None,
            telemetry: None,
        }
    }

    /// Mirror every output sample (mono) into `tx`. Samples are dropped when
    /// the ring is full.
    pub fn with_scope(mut self, tx: Producer<f32>) -> Self {
        self.scope = Some(tx);
        self
    }

    /// Report one `BlockTelemetry` per block into `tx`, dropped when full.
    pub fn with_telemetry(mut self, tx: Producer<BlockTelemetry>) -> Self {
        self.telemetry = Some(tx);
        self
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn voice(&self) -> &VoiceMixer {
        &self.voice
    }

    pub fn filter(&self) -> &LowPassFilter {
        &self.filter
    }

    /// Fill `frames` interleaved stereo frames of `out`.
    ///
    /// Only as many frames as fit in `out` are rendered; anything past them
    /// is zeroed.
    pub fn render(&mut self, out: &mut [f32], frames: usize) -> RenderStatus {
        let frames = frames.min(out.len() / CHANNELS);
        let (body, tail) = out.split_at_mut(frames * CHANNELS);
        tail.fill(0.0);

        let mut status = RenderStatus::Continue;
        for chunk in body.chunks_mut(self.config.block_size * CHANNELS) {
            if self.render_block(chunk) == RenderStatus::Degraded {
                status = RenderStatus::Degraded;
            }
        }
        status
    }

    fn render_block(&mut self, out: &mut [f32]) -> RenderStatus {
        let frames = out.len() / CHANNELS;

        self.drain_notes();
        let params = self.store.snapshot();

        self.voice.apply(&params);
        self.voice.set_envelope_sample_rate(self.config.sample_rate as f32);
        let block = &mut self.scratch[..frames];
        self.voice.render(block);

        apply_filter_params(&mut self.filter, &params);

        let mut status = RenderStatus::Continue;
        let mut peak = 0.0f32;
        for (frame, &dry) in out.chunks_exact_mut(CHANNELS).zip(block.iter()) {
            let (filtered, replaced) = guard_sample(self.filter.process(dry), &mut self.filter);
            if replaced {
                status = RenderStatus::Degraded;
            }
            let sample = filtered * params.volume;

            frame.fill(sample);
            peak = peak.max(sample.abs());

            if let Some(scope) = self.scope.as_mut() {
                let _ = scope.push(sample);
            }
        }

        if let Some(telemetry) = self.telemetry.as_mut() {
            let _ = telemetry.push(BlockTelemetry {
                envelope: self.voice.envelope_level(),
                cutoff: self.filter.cutoff(),
                peak,
                active_key: self.active_key,
            });
        }

        status
    }

    fn drain_notes(&mut self) {
        while let Some(msg) = self.notes.pop() {
            match msg {
                NoteMessage::NoteOn { key } => {
                    if !self.voice.is_active() {
                        // Nothing is sounding, so clearing the history cannot click.
                        self.filter.reset();
                    }
                    self.active_key = Some(key);
                    self.voice.note_on();
                }
                NoteMessage::NoteOff => {
                    self.active_key = None;
                    self.voice.note_off();
                }
            }
        }
    }
}

/// Pass finite samples through. A non-finite one becomes silence and clears
/// the filter history, which would otherwise keep recirculating it.
/// The flag reports whether the sample was replaced.
#[inline]
fn guard_sample(sample: f32, filter: &mut LowPassFilter) -> (f32, bool) {
    if sample.is_finite() {
        (sample, false)
    } else {
        filter.reset();
        (0.0, true)
    }
}

fn apply_filter_params(filter: &mut LowPassFilter, params: &SynthParams) {
    filter.set_cutoff(params.filter_cutoff);
    filter.set_resonance(params.filter_resonance);
    filter.set_auto_variation_frequency(params.lfo_rate);
    filter.set_auto_variation_amount(params.lfo_depth);
}
