//! Parameter list: one row per control, adjusted with the arrow keys.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use trio_synth::{
    dsp::filter::{MAX_CUTOFF_HZ, MAX_RESONANCE, MIN_CUTOFF_HZ},
    synth::params::{OscSlot, MAX_LFO_RATE_HZ},
    ParamStore, SynthParams,
};

// Slider ranges of the control surface. The store accepts a wider range for
// some of these; the UI keeps to the musically useful part.
const TIME_RANGE: (f32, f32) = (0.0, 1.0);
const LFO_RATE_RANGE: (f32, f32) = (1.0, MAX_LFO_RATE_HZ);
const OFFSET_RANGE: (f32, f32) = (-5.0, 5.0);
/// Cutoff moves by this factor per step so the sweep feels even.
const CUTOFF_STEP_RATIO: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    OscEnabled(OscSlot),
    OscWaveform(OscSlot),
    OscOffset(OscSlot),
    Attack,
    Release,
    Cutoff,
    Resonance,
    LfoRate,
    LfoDepth,
    Volume,
}

pub const CONTROLS: [Control; 16] = [
    Control::OscEnabled(OscSlot::Osc1),
    Control::OscWaveform(OscSlot::Osc1),
    Control::OscOffset(OscSlot::Osc1),
    Control::OscEnabled(OscSlot::Osc2),
    Control::OscWaveform(OscSlot::Osc2),
    Control::OscOffset(OscSlot::Osc2),
    Control::OscEnabled(OscSlot::Osc3),
    Control::OscWaveform(OscSlot::Osc3),
    Control::OscOffset(OscSlot::Osc3),
    Control::Attack,
    Control::Release,
    Control::Cutoff,
    Control::Resonance,
    Control::LfoRate,
    Control::LfoDepth,
    Control::Volume,
];

impl Control {
    fn label(self) -> String {
        match self {
            Control::OscEnabled(slot) => format!("Osc {} on", slot.index() + 1),
            Control::OscWaveform(slot) => format!("Osc {} wave", slot.index() + 1),
            Control::OscOffset(slot) => format!("Osc {} offset", slot.index() + 1),
            Control::Attack => "Attack".into(),
            Control::Release => "Release".into(),
            Control::Cutoff => "Cutoff".into(),
            Control::Resonance => "Resonance".into(),
            Control::LfoRate => "LFO rate".into(),
            Control::LfoDepth => "LFO depth".into(),
            Control::Volume => "Volume".into(),
        }
    }

    fn value(self, params: &SynthParams) -> String {
        match self {
            Control::OscEnabled(slot) => {
                if params.oscillator(slot).enabled { "on" } else { "off" }.into()
            }
            Control::OscWaveform(slot) => params.oscillator(slot).waveform.name().into(),
            Control::OscOffset(slot) => format!("{:+.1}", params.oscillator(slot).offset),
            Control::Attack => format!("{:.2} s", params.attack),
            Control::Release => format!("{:.2} s", params.release),
            Control::Cutoff => format!("{:.0} Hz", params.filter_cutoff),
            Control::Resonance => format!("{:.2}", params.filter_resonance),
            Control::LfoRate => format!("{:.1} Hz", params.lfo_rate),
            Control::LfoDepth => format!("{:.2}", params.lfo_depth),
            Control::Volume => format!("{:.2}", params.volume),
        }
    }

    /// Step the control one notch up (`up == true`) or down.
    pub fn adjust(self, store: &ParamStore, params: &SynthParams, up: bool) {
        let sign = if up { 1.0 } else { -1.0 };
        match self {
            Control::OscEnabled(slot) => {
                store.set_osc_enabled(slot, !params.oscillator(slot).enabled);
            }
            Control::OscWaveform(slot) => {
                let current = params.oscillator(slot).waveform;
                let next = if up { current.next() } else { current.next().next() };
                store.set_osc_waveform(slot, next);
            }
            Control::OscOffset(slot) => {
                let offset = step(params.oscillator(slot).offset, 0.1 * sign, OFFSET_RANGE);
                store.set_osc_offset(slot, offset);
            }
            Control::Attack => store.set_attack(step(params.attack, 0.01 * sign, TIME_RANGE)),
            Control::Release => store.set_release(step(params.release, 0.01 * sign, TIME_RANGE)),
            Control::Cutoff => {
                let factor = if up { CUTOFF_STEP_RATIO } else { CUTOFF_STEP_RATIO.recip() };
                let cutoff = (params.filter_cutoff * factor).clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
                store.set_filter_cutoff(cutoff);
            }
            Control::Resonance => store.set_filter_resonance(step(
                params.filter_resonance,
                0.01 * sign,
                (0.0, MAX_RESONANCE),
            )),
            Control::LfoRate => {
                store.set_lfo_rate(step(params.lfo_rate, 0.5 * sign, LFO_RATE_RANGE));
            }
            Control::LfoDepth => {
                store.set_lfo_depth(step(params.lfo_depth, 0.05 * sign, (0.0, 1.0)));
            }
            Control::Volume => store.set_volume(step(params.volume, 0.05 * sign, (0.0, 1.0))),
        }
    }
}

fn step(value: f32, delta: f32, (min, max): (f32, f32)) -> f32 {
    (value + delta).clamp(min, max)
}

pub fn render_controls(frame: &mut Frame, area: Rect, params: &SynthParams, selected: usize) {
    let items: Vec<ListItem> = CONTROLS
        .iter()
        .map(|control| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<14}", control.label()),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(control.value(params), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Controls ").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}
