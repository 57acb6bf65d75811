//! Status bar: device, octave, sounding key and per-block engine readings

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use trio_synth::synth::engine::BlockTelemetry;

pub struct TransportInfo<'a> {
    pub device: &'a str,
    pub sample_rate: u32,
    /// Frames per device callback, `None` when the device picks
    pub buffer_frames: Option<u32>,
    pub octave: i8,
    /// Pitch currently in the parameter store
    pub frequency: f64,
    pub telemetry: BlockTelemetry,
}

pub fn render_transport(frame: &mut Frame, area: Rect, info: &TransportInfo) {
    let block = Block::default().title(" trio ").borders(Borders::ALL);
    let t = &info.telemetry;

    let note = match t.active_key {
        Some(key) => format!("♪ {key:>2} {:.1} Hz  ", info.frequency),
        None => "·  ".to_string(),
    };

    let buffer = match info.buffer_frames {
        Some(frames) => format!("{frames} fr"),
        None => "auto".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(
                " {}  {:.1}kHz  {buffer}  ",
                info.device,
                info.sample_rate as f32 / 1000.0
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Oct {:+}  ", info.octave),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            note,
            Style::default().fg(if t.active_key.is_some() {
                Color::Green
            } else {
                Color::DarkGray
            }),
        ),
        Span::styled(
            format!("Env {:.2}  ", t.envelope),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Cutoff {:.0} Hz  ", t.cutoff),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("Peak {:.2}", t.peak),
            Style::default().fg(if t.peak >= 1.0 {
                Color::Red
            } else {
                Color::Magenta
            }),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
