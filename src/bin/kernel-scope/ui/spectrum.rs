//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the scope buffer, sampled at log-spaced frequencies.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::{f32::consts::PI, sync::Arc};

/// Number of points on the displayed curve
const SPECTRUM_POINTS: usize = 96;
const FLOOR_DB: f64 = -100.0;
const LOWEST_HZ: f32 = 20.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin read for each displayed point
    bins: Vec<usize>,
    /// (log10 frequency, magnitude dB) per displayed point
    curve: Vec<(f64, f64)>,
    bin_hz: f32,
    peak_hz: f32,
}

impl SpectrumAnalyzer {
    /// `fft_size` must match the length of the buffers passed to `update`.
    pub fn new(fft_size: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::<f32>::new().plan_fft_forward(fft_size);

        let denom = fft_size.saturating_sub(1).max(1) as f32;
        let window = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
            .collect();

        let bin_hz = sample_rate / fft_size.max(1) as f32;
        let top_hz = (sample_rate / 2.0).min(20_000.0).max(LOWEST_HZ * 2.0);
        let last_bin = (fft_size / 2).saturating_sub(1);
        let ratio = top_hz / LOWEST_HZ;

        let mut bins = Vec::with_capacity(SPECTRUM_POINTS);
        let mut curve = Vec::with_capacity(SPECTRUM_POINTS);
        for i in 0..SPECTRUM_POINTS {
            let t = i as f32 / (SPECTRUM_POINTS - 1) as f32;
            let hz = LOWEST_HZ * ratio.powf(t);
            bins.push(((hz / bin_hz).round() as usize).min(last_bin));
            curve.push(((hz as f64).log10(), FLOOR_DB));
        }

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            bins,
            curve,
            bin_hz,
            peak_hz: 0.0,
        }
    }

    /// Recompute the curve from the newest samples.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        // Normalise so a full-scale sine sits near 0 dB
        let scale = 4.0 / self.window.len().max(1) as f32;
        let half = self.scratch.len() / 2;

        let (peak_bin, _) = self.scratch[1..half.max(2)]
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, c)| {
                let m = c.norm_sqr();
                if m > best.1 {
                    (i + 1, m)
                } else {
                    best
                }
            });
        self.peak_hz = peak_bin as f32 * self.bin_hz;

        for ((_, db), &bin) in self.curve.iter_mut().zip(&self.bins) {
            let magnitude = self.scratch[bin].norm() * scale;
            *db = (20.0 * (magnitude.max(1e-6) as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.curve
    }

    /// Frequency of the loudest bin in the last update.
    pub fn peak_frequency(&self) -> f32 {
        self.peak_hz
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, curve: &[(f64, f64)], peak_hz: f32) {
    let block = Block::default()
        .title(format!(" Spectrum  peak {peak_hz:.0} Hz "))
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(curve);

    let (lo, hi) = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => (first.0, last.0.max(first.0 + 1.0)),
        _ => (1.0, 4.3),
    };

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 6.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
