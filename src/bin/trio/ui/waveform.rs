//! Oscilloscope over the most recent output samples

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Start the trace at a rising zero crossing so a steady tone stands still.
fn trigger_point(samples: &[f32]) -> usize {
    let search = samples.len() / 2;
    samples
        .windows(2)
        .take(search)
        .position(|w| w[0] <= 0.0 && w[1] > 0.0)
        .map_or(0, |i| i + 1)
}

pub fn render_waveform(frame: &mut Frame, area: Rect, samples: &[f32]) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    let view = &samples[trigger_point(samples)..];
    let width = (samples.len() / 2).max(1);
    let data: Vec<(f64, f64)> = view
        .iter()
        .take(width)
        .enumerate()
        .map(|(i, &sample)| (i as f64 / width as f64, f64::from(sample)))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    // Up to three oscillators sum before the volume stage.
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.5, 1.5])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
