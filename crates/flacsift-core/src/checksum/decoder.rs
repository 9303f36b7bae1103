use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::trace;

use super::source::{SampleLayout, SampleSource};
use crate::error::ChecksumError;

/// FLAC decoder backed by symphonia.
///
/// Symphonia widens every sample to fill an `i32`, so the stream is
/// reported as [`SampleLayout::LeftJustified`].
pub struct FlacDecoder {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    bits_per_sample: u32,
    channels: usize,
    block_len: usize,
    pending: Vec<i32>,
    exhausted: bool,
}

impl FlacDecoder {
    pub fn open(path: &Path, block_frames: usize) -> Result<Self, ChecksumError> {
        let file = File::open(path).map_err(|e| ChecksumError::Decode(e.to_string()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("flac");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(decode_error)?;
        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| ChecksumError::Decode("no audio track found".to_string()))?;
        let track_id = track.id;
        let bits_per_sample = track
            .codec_params
            .bits_per_sample
            .ok_or(ChecksumError::UnknownBitDepth)?;
        let channels = track
            .codec_params
            .channels
            .map(|c| c.count())
            .unwrap_or(1);

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(decode_error)?;

        trace!(
            "Opened {} ({}-bit, {} channels)",
            path.display(),
            bits_per_sample,
            channels
        );

        Ok(Self {
            format,
            decoder,
            track_id,
            bits_per_sample,
            channels,
            block_len: block_frames.max(1) * channels.max(1),
            pending: Vec::new(),
            exhausted: false,
        })
    }

    /// Decode one packet of the audio track into `pending`.
    fn decode_next_packet(&mut self) -> Result<(), ChecksumError> {
        let packet = match self.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                self.exhausted = true;
                return Ok(());
            }
            Err(e) => return Err(decode_error(e)),
        };

        if packet.track_id() != self.track_id {
            return Ok(());
        }

        let decoded = self.decoder.decode(&packet).map_err(decode_error)?;
        let mut samples = SampleBuffer::<i32>::new(decoded.capacity() as u64, *decoded.spec());
        samples.copy_interleaved_ref(decoded);
        self.pending.extend_from_slice(samples.samples());
        Ok(())
    }
}

impl SampleSource for FlacDecoder {
    fn bits_per_sample(&self) -> u32 {
        self.bits_per_sample
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn layout(&self) -> SampleLayout {
        SampleLayout::LeftJustified
    }

    fn read_block(&mut self, block: &mut Vec<i32>) -> Result<bool, ChecksumError> {
        block.clear();
        while self.pending.len() < self.block_len && !self.exhausted {
            self.decode_next_packet()?;
        }
        if self.pending.is_empty() {
            return Ok(false);
        }
        let take = self.pending.len().min(self.block_len);
        block.extend(self.pending.drain(..take));
        Ok(true)
    }
}

fn decode_error(err: SymphoniaError) -> ChecksumError {
    ChecksumError::Decode(err.to_string())
}
