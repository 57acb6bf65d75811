//! Benchmarks for the voice mixer and complete render engine blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use trio_synth::{
    synth::{
        engine::CHANNELS,
        message::{note_queue, NoteMessage},
        params::OscSlot,
        voice::VoiceMixer,
    },
    EngineConfig, ParamStore, RenderEngine,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        // === VOICE ONLY ===
        // three oscillators and the envelope, no filter or store
        let mut voice = VoiceMixer::new(SAMPLE_RATE);
        for slot in OscSlot::ALL {
            voice.oscillator_mut(slot).set_enabled(true);
        }
        voice.set_frequency(220.0);
        voice.note_on();
        let mut mono = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("voice", size), &size, |b, _| {
            b.iter(|| voice.render(black_box(&mut mono)))
        });

        // === DEFAULT PATCH ===
        // triangle only, filter wide open
        let mut engine = held_note_engine(size, ParamStore::default());
        let mut out = vec![0.0f32; size * CHANNELS];
        group.bench_with_input(BenchmarkId::new("default_patch", size), &size, |b, _| {
            b.iter(|| engine.render(black_box(&mut out), size))
        });

        // === WORST CASE ===
        // all oscillators, resonant filter swept by the LFO every sample
        let store = ParamStore::default();
        for slot in OscSlot::ALL {
            store.set_osc_enabled(slot, true);
        }
        store.set_filter_cutoff(2_000.0);
        store.set_filter_resonance(0.8);
        store.set_lfo_rate(8.0);
        store.set_lfo_depth(0.5);
        let mut engine = held_note_engine(size, store);
        group.bench_with_input(BenchmarkId::new("full_patch", size), &size, |b, _| {
            b.iter(|| engine.render(black_box(&mut out), size))
        });
    }

    group.finish();
}

fn held_note_engine(block_size: usize, store: ParamStore) -> RenderEngine {
    let (mut tx, rx) = note_queue();
    let _ = tx.push(NoteMessage::NoteOn { key: 1 });
    RenderEngine::new(EngineConfig::new(SAMPLE_RATE as u32, block_size), store, rx)
}
