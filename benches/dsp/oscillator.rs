//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use trio_synth::dsp::oscillator::{PhaseOscillator, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for waveform in Waveform::ALL {
            // Triangle pays for sin + asin, saw is a ramp, noise is one PRNG draw
            let mut osc = PhaseOscillator::new(SAMPLE_RATE).with_waveform(waveform);
            osc.set_frequency(440.0);
            group.bench_with_input(
                BenchmarkId::new(waveform.name().to_lowercase(), size),
                &size,
                |b, _| b.iter(|| osc.render(black_box(&mut buffer))),
            );
        }
    }

    group.finish();
}
