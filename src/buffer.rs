//! Host buffer adapter.
//!
//! Hosts hand a kernel one slice per channel plus a `(frame_count,
//! buffer_offset)` window into those slices. [`AudioBuffers`] wraps the two
//! layouts hosts use:
//!
//! ```text
//! in place     outputs[ch][offset .. offset+frames]  read, transformed, written back
//! separate     inputs[ch][..]  ──kernel──►  outputs[ch][..]
//! ```
//!
//! [`AudioBuffers::layout`] reconciles the request with what was actually
//! supplied: the channel count is the smaller of the configured and supplied
//! counts, and the frame window is cut down to what every processed output
//! channel can hold. Indexing past a slice can therefore never happen, even
//! if the host gets the contract wrong.
//!
//! The interleave helpers convert to and from frame-interleaved storage
//! (`L R L R ...`), which is what most device callbacks hand out.

/// Channel buffers for one `process` call.
pub enum AudioBuffers<'a, 'b> {
    InPlace(&'a mut [&'b mut [f32]]),
    Separate {
        inputs: &'a [&'b [f32]],
        outputs: &'a mut [&'b mut [f32]],
    },
}

/// Resolved processing window: `channels` channels, frames `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub channels: usize,
    pub start: usize,
    pub end: usize,
}

impl BlockLayout {
    pub fn frames(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.channels == 0 || self.start >= self.end
    }
}

impl<'a, 'b> AudioBuffers<'a, 'b> {
    pub fn in_place(channels: &'a mut [&'b mut [f32]]) -> Self {
        Self::InPlace(channels)
    }

    pub fn separate(inputs: &'a [&'b [f32]], outputs: &'a mut [&'b mut [f32]]) -> Self {
        Self::Separate { inputs, outputs }
    }

    pub fn output_channels(&self) -> usize {
        match self {
            Self::InPlace(channels) => channels.len(),
            Self::Separate { outputs, .. } => outputs.len(),
        }
    }

    pub fn input_channels(&self) -> usize {
        match self {
            Self::InPlace(channels) => channels.len(),
            Self::Separate { inputs, .. } => inputs.len(),
        }
    }

    fn output_len(&self, channel: usize) -> usize {
        match self {
            Self::InPlace(channels) => channels[channel].len(),
            Self::Separate { outputs, .. } => outputs[channel].len(),
        }
    }

    /// Reconcile a request against the supplied buffers.
    pub fn layout(
        &self,
        configured_channels: usize,
        frame_count: u32,
        buffer_offset: u32,
    ) -> BlockLayout {
        let channels = configured_channels.min(self.output_channels());
        let start = buffer_offset as usize;
        let requested_end = start.saturating_add(frame_count as usize);

        let end = (0..channels)
            .map(|ch| self.output_len(ch))
            .fold(requested_end, usize::min)
            .max(start);

        BlockLayout {
            channels,
            start,
            end,
        }
    }

    /// Input sample at an absolute index. Missing input channels or samples
    /// read as silence.
    #[inline]
    pub fn input(&self, channel: usize, index: usize) -> f32 {
        let sample = match self {
            Self::InPlace(channels) => channels.get(channel).and_then(|c| c.get(index)),
            Self::Separate { inputs, .. } => inputs.get(channel).and_then(|c| c.get(index)),
        };
        sample.copied().unwrap_or(0.0)
    }

    /// Write an output sample at an absolute index inside a resolved layout.
    #[inline]
    pub fn write(&mut self, channel: usize, index: usize, value: f32) {
        let slot = match self {
            Self::InPlace(channels) => channels.get_mut(channel).and_then(|c| c.get_mut(index)),
            Self::Separate { outputs, .. } => {
                outputs.get_mut(channel).and_then(|c| c.get_mut(index))
            }
        };
        if let Some(slot) = slot {
            *slot = value;
        }
    }

    /// Write the same sample to every channel of the layout (generator fan-out).
    #[inline]
    pub fn fan_out(&mut self, layout: &BlockLayout, index: usize, value: f32) {
        for channel in 0..layout.channels {
            self.write(channel, index, value);
        }
    }

    /// Zero the layout's window on every processed channel.
    pub fn silence(&mut self, layout: &BlockLayout) {
        let (start, end) = (layout.start, layout.end);
        let outputs: &mut [&mut [f32]] = match self {
            Self::InPlace(channels) => &mut **channels,
            Self::Separate { outputs, .. } => &mut **outputs,
        };
        for channel in outputs.iter_mut().take(layout.channels) {
            if let Some(window) = channel.get_mut(start..end) {
                window.fill(0.0);
            }
        }
    }
}

/// Interleave per-channel slices into `dest` (`frames * channels.len()` long).
///
/// Frames beyond the shortest channel, or beyond `dest`, are left untouched.
pub fn interleave(dest: &mut [f32], channels: &[&[f32]]) {
    let stride = channels.len();
    if stride == 0 {
        return;
    }
    let frames = channels
        .iter()
        .map(|c| c.len())
        .fold(dest.len() / stride, usize::min);

    for (frame, out) in dest.chunks_exact_mut(stride).take(frames).enumerate() {
        for (sample, channel) in out.iter_mut().zip(channels) {
            *sample = channel[frame];
        }
    }
}

/// Copy a mono slice into every interleaved channel of `dest`.
pub fn interleave_mono(dest: &mut [f32], mono: &[f32], channels: usize) {
    if channels == 0 {
        return;
    }
    for (out, &sample) in dest.chunks_exact_mut(channels).zip(mono) {
        out.fill(sample);
    }
}
