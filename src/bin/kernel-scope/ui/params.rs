//! Parameter list with a position bar for each control

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use dsp_kernels::{KernelHandle, ParameterUnit};

const BAR_WIDTH: usize = 24;

fn unit_suffix(unit: ParameterUnit) -> &'static str {
    match unit {
        ParameterUnit::Hertz => " Hz",
        ParameterUnit::Semitones => " st",
        ParameterUnit::Samples => " smp",
        ParameterUnit::Ratio => "×",
        ParameterUnit::Generic | ParameterUnit::LinearGain | ParameterUnit::Mix => "",
    }
}

pub fn render_params(frame: &mut Frame, area: Rect, handle: &KernelHandle, selected: usize) {
    let block = Block::default()
        .title(format!(" {} ", handle.kernel_type()))
        .borders(Borders::ALL);

    let descriptors = handle.parameters();
    let lines: Vec<Line> = if descriptors.is_empty() {
        vec![Line::from(Span::styled(
            "no parameters",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let value = handle.parameter_value(d.address).unwrap_or(d.default);
                let span = (d.max - d.min).max(f32::EPSILON);
                let filled = (((value - d.min) / span) * BAR_WIDTH as f32).round() as usize;
                let filled = filled.min(BAR_WIDTH);
                let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));

                let style = if i == selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!(" {:<24}", d.name), style),
                    Span::styled(bar, Style::default().fg(Color::Cyan)),
                    Span::styled(format!(" {value:>10.3}{}", unit_suffix(d.unit)), style),
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
