//! Terminal front end for trio
//!
//! Keys play notes, the arrow keys edit the selected control, and the
//! scope and spectrum follow the output through the engine's taps.

mod controls;
mod piano;
mod spectrum;
mod transport;
mod waveform;

use std::{io::stdout, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use cpal::BufferSize;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use tracing::{debug, info};

use trio_synth::{io::keyboard, synth::engine::BlockTelemetry, synth::params::OscSlot, SynthParams};

use crate::app::Synth;
use controls::{render_controls, CONTROLS};
use piano::render_piano;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, TransportInfo};
use waveform::render_waveform;

/// Samples kept for the scope and the FFT
const VIS_BUFFER_SIZE: usize = 2048;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Take over the terminal until the user quits, then stop audio.
pub fn run(synth: Synth) -> EyreResult<()> {
    // Without key-release events a note holds until the next key or Space.
    let key_release = supports_keyboard_enhancement().unwrap_or(false);
    let mut terminal = ratatui::init();
    if key_release {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!(key_release, "terminal ready");

    let mut app = UiApp::new(synth, key_release);
    let result = app.run(&mut terminal);

    if key_release {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    ratatui::restore();

    app.synth.controller.release_all();
    app.synth.host.stop()?;
    result
}

struct UiApp {
    synth: Synth,
    key_release: bool,
    scope: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    telemetry: BlockTelemetry,
    params: SynthParams,
    selected: usize,
    should_quit: bool,
}

impl UiApp {
    fn new(synth: Synth, key_release: bool) -> Self {
        let sample_rate = synth.config.sample_rate as f32;
        let params = synth.controller.store().snapshot();
        Self {
            synth,
            key_release,
            scope: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            telemetry: BlockTelemetry::default(),
            params,
            selected: 0,
            should_quit: false,
        }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.params = self.synth.controller.store().snapshot();

            terminal.draw(|frame| self.render(frame))?;

            // Drain everything queued so held keys do not lag behind.
            let mut timeout = FRAME_INTERVAL;
            while event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
                timeout = Duration::ZERO;
            }
        }
        Ok(())
    }

    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.synth.scope_rx.pop() {
            self.scope.push(sample);
            received = true;
        }
        if received {
            if self.scope.len() > VIS_BUFFER_SIZE {
                let excess = self.scope.len() - VIS_BUFFER_SIZE;
                self.scope.drain(..excess);
            }
            self.spectrum.update(&self.scope);
        }

        while let Ok(t) = self.synth.telemetry_rx.pop() {
            self.telemetry = t;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let controller = &mut self.synth.controller;

        if let KeyCode::Char(c) = key.code {
            if let Some(note) = keyboard::key_for_char(c) {
                match key.kind {
                    KeyEventKind::Press => {
                        controller.press_key(note);
                    }
                    KeyEventKind::Release => controller.release_key(note),
                    _ => {}
                }
                return;
            }
        }

        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') => controller.release_all(),
            KeyCode::Char('z') => controller.octave_down(),
            KeyCode::Char('x') => controller.octave_up(),
            KeyCode::Char(c @ '1'..='3') => {
                let slot = OscSlot::ALL[(c as u8 - b'1') as usize];
                let enabled = self.params.oscillator(slot).enabled;
                controller.store().set_osc_enabled(slot, !enabled);
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(CONTROLS.len() - 1),
            KeyCode::Left | KeyCode::Right => {
                let control = CONTROLS[self.selected];
                control.adjust(controller.store(), &self.params, key.code == KeyCode::Right);
                // Re-read so repeated presses within one frame accumulate.
                self.params = controller.store().snapshot();
                debug!(?control, "control adjusted");
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Transport bar
                Constraint::Min(10),    // Controls | scope + spectrum
                Constraint::Length(5),  // Piano
                Constraint::Length(1),  // Help bar
            ])
            .split(frame.area());

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(20)])
            .split(rows[1]);
        let views = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(middle[1]);

        let controller = &self.synth.controller;
        render_transport(
            frame,
            rows[0],
            &TransportInfo {
                device: self.synth.host.device_name(),
                sample_rate: self.synth.config.sample_rate,
                buffer_frames: match self.synth.host.config().buffer_size {
                    BufferSize::Fixed(frames) => Some(frames),
                    _ => None,
                },
                octave: controller.octave(),
                frequency: self.params.frequency,
                telemetry: self.telemetry,
            },
        );
        render_controls(frame, middle[0], &self.params, self.selected);
        render_waveform(frame, views[0], &self.scope);
        render_spectrum(frame, views[1], self.spectrum.data());
        render_piano(frame, rows[2], controller.active_key(), controller.octave());

        let release_hint = if self.key_release { "" } else { "  [Space] Release" };
        let help = Paragraph::new(format!(
            " [Q] Quit  [Z/X] Octave  [1-3] Osc on/off  [↑↓] Select  [←→] Adjust{release_hint}"
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}
