//! 13-key piano strip. The sounding key is lit.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use trio_synth::io::keyboard::{self, KEY_COUNT, KEY_LAYOUT};

pub fn render_piano(frame: &mut Frame, area: Rect, active_key: Option<u8>, octave: i8) {
    let block = Block::default()
        .title(format!(" Keys  octave {octave:+} "))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let keys = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..KEY_COUNT).map(|_| Constraint::Ratio(1, u32::from(KEY_COUNT))))
        .split(inner);

    for (i, cell) in keys.iter().enumerate() {
        let key = i as u8 + 1;
        let raised = keyboard::is_upper_row(key);

        let style = if active_key == Some(key) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if raised {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Black).bg(Color::Gray)
        };

        let label = KEY_LAYOUT[i].to_ascii_uppercase().to_string();
        // Raised keys sit on the top line only, like the black keys.
        let text = if raised { label } else { format!("\n{label}") };
        let key_widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::RIGHT));
        frame.render_widget(key_widget, *cell);
    }
}
