//! Benchmarks for the biquad low-pass filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use trio_synth::dsp::filter::LowPassFilter;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Static cutoff: coefficients computed once
        let mut filter = LowPassFilter::lowpass(SAMPLE_RATE, 1_000.0);
        filter.set_resonance(0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // LFO sweep: coefficients recomputed every sample
        let mut filter = LowPassFilter::lowpass(SAMPLE_RATE, 1_000.0);
        filter.set_resonance(0.5);
        filter.set_auto_variation_frequency(5.0);
        filter.set_auto_variation_amount(0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lfo_sweep", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
