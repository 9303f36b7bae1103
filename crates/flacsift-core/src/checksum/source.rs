use crate::error::ChecksumError;

/// How decoded integers sit inside their `i32` containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// Values are at their true magnitude.
    Native,
    /// Values are shifted up to fill all 32 bits (shift = 32 - bits_per_sample).
    LeftJustified,
}

/// A finite stream of decoded, channel-interleaved samples.
///
/// Implemented by the FLAC decoder and by in-memory buffers.
pub trait SampleSource {
    fn bits_per_sample(&self) -> u32;
    fn channels(&self) -> usize;
    fn layout(&self) -> SampleLayout;

    /// Replace the contents of `block` with the next run of samples.
    /// Returns `Ok(false)` once the stream is exhausted.
    fn read_block(&mut self, block: &mut Vec<i32>) -> Result<bool, ChecksumError>;
}

/// Already-decoded PCM held in memory, handed out in fixed-size blocks.
#[derive(Debug, Clone)]
pub struct InterleavedSource {
    samples: Vec<i32>,
    bits_per_sample: u32,
    channels: usize,
    layout: SampleLayout,
    block_len: usize,
    pos: usize,
}

impl InterleavedSource {
    pub fn new(
        samples: Vec<i32>,
        bits_per_sample: u32,
        channels: usize,
        layout: SampleLayout,
        block_frames: usize,
    ) -> Self {
        Self {
            samples,
            bits_per_sample,
            channels,
            layout,
            block_len: block_frames.max(1) * channels.max(1),
            pos: 0,
        }
    }
}

impl SampleSource for InterleavedSource {
    fn bits_per_sample(&self) -> u32 {
        self.bits_per_sample
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn layout(&self) -> SampleLayout {
        self.layout
    }

    fn read_block(&mut self, block: &mut Vec<i32>) -> Result<bool, ChecksumError> {
        block.clear();
        if self.pos >= self.samples.len() {
            return Ok(false);
        }
        let end = (self.pos + self.block_len).min(self.samples.len());
        block.extend_from_slice(&self.samples[self.pos..end]);
        self.pos = end;
        Ok(true)
    }
}
