//! Spectrum view: Hann-windowed FFT read out at log-spaced frequencies.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const SPECTRUM_POINTS: usize = 64;
const MIN_FREQ_HZ: f32 = 20.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// FFT bin read for each display point
    bins: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 Hz, dB) per display point
    points: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `size` is the FFT length and must match the buffers passed to `update`.
    pub fn new(size: usize, sample_rate: f32) -> Self {
        let size = size.max(2);
        let fft = FftPlanner::new().plan_fft_forward(size);

        let denom = (size - 1) as f32;
        let window = (0..size)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let nyquist = (sample_rate / 2.0).min(20_000.0).max(MIN_FREQ_HZ * 2.0);
        let ratio = f64::from(nyquist / MIN_FREQ_HZ);
        let last_bin = size / 2 - 1;

        let (bins, points) = (0..SPECTRUM_POINTS)
            .map(|i| {
                let t = i as f64 / (SPECTRUM_POINTS - 1) as f64;
                let freq = f64::from(MIN_FREQ_HZ) * ratio.powf(t);
                let bin = (freq * size as f64 / f64::from(sample_rate)).round() as usize;
                (bin.clamp(1, last_bin.max(1)), (freq.log10(), FLOOR_DB))
            })
            .unzip();

        Self {
            window,
            bins,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); size],
            points,
        }
    }

    /// Recompute from the newest `size` samples. Shorter buffers are ignored.
    pub fn update(&mut self, samples: &[f32]) {
        let size = self.window.len();
        let Some(recent) = samples.len().checked_sub(size).map(|start| &samples[start..]) else {
            return;
        };

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(recent).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        // Hann window has a coherent gain of 0.5.
        let norm = 2.0 / (size as f32 * 0.5);
        for (point, &bin) in self.points.iter_mut().zip(&self.bins) {
            let magnitude = (self.scratch[bin].norm() * norm).max(1e-6);
            point.1 = (20.0 * f64::from(magnitude).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let min_x = f64::from(MIN_FREQ_HZ).log10();
    let max_x = points.last().map_or(min_x + 1.0, |p| p.0);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
