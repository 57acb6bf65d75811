//! Full-path benchmarks: what the audio callback actually costs.

mod engine;

pub use engine::bench_engine;
