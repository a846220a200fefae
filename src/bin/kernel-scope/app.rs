//! Audio side of kernel-scope: a cpal stream that owns the kernel

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::{Producer, RingBuffer};

use dsp_kernels::{
    buffer::{interleave, interleave_mono},
    kernels::{FmOscillator, FmOscillatorParameter},
    AudioBuffers, DspKernel, KernelConfig, KernelType, MAX_BLOCK_SIZE,
};

use super::ui::UiApp;

/// Samples buffered for the scope views between UI frames.
const SCOPE_CAPACITY: usize = 16_384;

/// Builder for one listening session.
pub struct Scope {
    kind: KernelType,
    source_frequency: f32,
    ramp_duration: f32,
}

impl Scope {
    pub fn new(kind: KernelType) -> Self {
        Self {
            kind,
            source_frequency: 220.0,
            ramp_duration: dsp_kernels::DEFAULT_RAMP_SECONDS,
        }
    }

    /// Pitch of the tone fed into effect kernels
    pub fn source_frequency(mut self, hz: f32) -> Self {
        self.source_frequency = hz;
        self
    }

    pub fn ramp_duration(mut self, seconds: f32) -> Self {
        self.ramp_duration = seconds;
        self
    }

    /// Open the default output device and run the UI until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f64;
        let device_channels = config.channels() as usize;
        let kernel_channels = device_channels.clamp(1, 2);

        let kernel_config = KernelConfig::new(kernel_channels, sample_rate).ramp_duration(self.ramp_duration);
        let mut kernel = self.kind.create();
        kernel
            .configure(&kernel_config)
            .wrap_err_with(|| format!("failed to initialize {}", self.kind))?;

        let source = if self.kind.is_generator() {
            None
        } else {
            Some(self.source(&kernel_config)?)
        };

        tracing::info!(
            kernel = %self.kind,
            sample_rate,
            device_channels,
            kernel_channels,
            "starting audio stream"
        );

        let handle = kernel.handle();
        let (scope_tx, scope_rx) = RingBuffer::new(SCOPE_CAPACITY);
        let mut state = AudioState {
            kernel,
            source,
            planar: [vec![0.0; MAX_BLOCK_SIZE], vec![0.0; MAX_BLOCK_SIZE]],
            kernel_channels,
            device_channels,
            scope_tx,
        };

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| state.render(data),
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;
        stream.play()?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(handle, scope_rx, sample_rate as f32).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }

    /// FM tone with a little modulation, so effects have harmonics to work on
    fn source(&self, config: &KernelConfig) -> EyreResult<FmOscillator> {
        use FmOscillatorParameter::*;

        let mut source = FmOscillator::new();
        for (parameter, value) in [
            (BaseFrequency, self.source_frequency),
            (ModulatingMultiplier, 0.5),
            (ModulationIndex, 2.0),
            (Amplitude, 0.5),
        ] {
            source.set_parameter_value(parameter.into(), value)?;
        }

        source
            .configure(config)
            .wrap_err("failed to initialize source oscillator")?;
        Ok(source)
    }
}

/// Everything the audio callback owns
struct AudioState {
    kernel: Box<dyn DspKernel>,
    source: Option<FmOscillator>,
    planar: [Vec<f32>; 2],
    kernel_channels: usize,
    device_channels: usize,
    scope_tx: Producer<f32>,
}

impl AudioState {
    /// Fill one interleaved device buffer, in blocks of at most `MAX_BLOCK_SIZE`.
    fn render(&mut self, data: &mut [f32]) {
        let stride = self.device_channels;
        if stride == 0 {
            return;
        }
        let total_frames = data.len() / stride;
        let mut written = 0;

        while written < total_frames {
            let frames = (total_frames - written).min(MAX_BLOCK_SIZE);

            {
                let [left, right] = &mut self.planar;
                let mut channels = [&mut left[..frames], &mut right[..frames]];
                let channels = &mut channels[..self.kernel_channels];

                if let Some(source) = self.source.as_mut() {
                    source.process(&mut AudioBuffers::in_place(&mut *channels), frames as u32, 0);
                }
                self.kernel
                    .process(&mut AudioBuffers::in_place(&mut *channels), frames as u32, 0);
            }

            let views = [&self.planar[0][..frames], &self.planar[1][..frames]];
            for &sample in views[0] {
                // The UI drains at its own pace; drop samples it has not caught up on
                if self.scope_tx.push(sample).is_err() {
                    break;
                }
            }

            let out = &mut data[written * stride..(written + frames) * stride];
            match (self.kernel_channels, stride) {
                (1, _) => interleave_mono(out, views[0], stride),
                (k, s) if k == s => interleave(out, &views[..k]),
                (k, _) => {
                    for (frame, samples) in out.chunks_exact_mut(stride).enumerate() {
                        for (ch, sample) in samples.iter_mut().enumerate() {
                            *sample = views[ch % k][frame];
                        }
                    }
                }
            }

            written += frames;
        }
    }
}
