//! TUI module for kernel-scope
//!
//! Shows the kernel's parameters, the rendered waveform and its spectrum.
//! Parameter edits go straight to the kernel through its handle.

mod params;
mod spectrum;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use dsp_kernels::KernelHandle;

use params::render_params;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Audio visualization buffer size (also the FFT size)
const VIS_BUFFER_SIZE: usize = 2048;

/// Fraction of a parameter's range moved by one arrow key press
const COARSE_STEP: f32 = 0.02;
const FINE_STEP: f32 = 0.002;

pub struct UiApp {
    handle: KernelHandle,
    /// Ring buffer receiver for rendered samples (first channel)
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    selected: usize,
    status: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(handle: KernelHandle, audio_rx: Consumer<f32>, sample_rate: f32) -> Self {
        Self {
            handle,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            selected: 0,
            status: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep the newest VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let count = self.handle.parameters().len();
        let fine = modifiers.contains(KeyModifiers::SHIFT);

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up if count > 0 => {
                self.selected = (self.selected + count - 1) % count;
            }
            KeyCode::Down if count > 0 => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Left => self.nudge(-1.0, fine),
            KeyCode::Right => self.nudge(1.0, fine),
            KeyCode::Char('d') => self.restore_default(),
            KeyCode::Char(' ') => self.toggle_bypass(),
            _ => {}
        }
    }

    fn nudge(&mut self, direction: f32, fine: bool) {
        let Some(descriptor) = self.handle.parameters().get(self.selected) else {
            return;
        };
        let step = (descriptor.max - descriptor.min) * if fine { FINE_STEP } else { COARSE_STEP };
        let current = self
            .handle
            .parameter_value(descriptor.address)
            .unwrap_or(descriptor.default);
        self.apply(descriptor.address, current + direction * step);
    }

    fn toggle_bypass(&mut self) {
        if self.handle.is_started() {
            self.handle.stop();
        } else {
            self.handle.start();
        }
        tracing::info!(started = self.handle.is_started(), "bypass toggled from the UI");
    }

    fn restore_default(&mut self) {
        if let Some(descriptor) = self.handle.parameters().get(self.selected) {
            self.apply(descriptor.address, descriptor.default);
        }
    }

    fn apply(&mut self, address: u32, value: f32) {
        match self.handle.set_parameter_value(address, value) {
            Ok(stored) => {
                tracing::debug!(address, stored, "parameter set");
                self.status = None;
            }
            Err(err) => {
                tracing::warn!(address, value, %err, "parameter rejected");
                self.status = Some(err.to_string());
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let param_rows = self.handle.parameters().len().max(1) as u16 + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(param_rows), // Parameters
                Constraint::Min(8),             // Waveform
                Constraint::Min(8),             // Spectrum
                Constraint::Length(1),          // Help / status bar
            ])
            .split(area);

        render_params(frame, chunks[0], &self.handle, self.selected);
        render_waveform(frame, chunks[1], &self.audio_buffer);
        render_spectrum(frame, chunks[2], self.spectrum.data(), self.spectrum.peak_frequency());

        let help = match &self.status {
            Some(message) => Paragraph::new(format!(" {message}")).style(Style::default().fg(Color::Red)),
            None if !self.handle.is_started() => Paragraph::new(" BYPASSED  [Space] Start  [Q] Quit")
                .style(Style::default().fg(Color::Yellow)),
            None => Paragraph::new(
                " [Q] Quit  [↑/↓] Select  [←/→] Adjust (Shift: fine)  [D] Default  [Space] Bypass",
            )
            .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(help, chunks[3]);
    }
}
