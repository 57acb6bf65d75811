//! Benchmarks for the attack/release envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use trio_synth::dsp::envelope::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Gate held: ramps up and then sits clamped at 1.0
        let mut env = Envelope::ar(SAMPLE_RATE, 0.5, 0.5);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("gated", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Gate low: clamped at 0.0
        let mut env = Envelope::ar(SAMPLE_RATE, 0.5, 0.5);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
