//! Audio-content checksum: the MD5 that FLAC encoders embed in STREAMINFO.
//!
//! The digest covers every sample in stream order, each written as a signed
//! little-endian integer of exactly `bits_per_sample / 8` bytes. MD5 is used
//! only because the reference value is MD5.

pub mod decoder;
pub mod fingerprint;
pub mod source;

use md5::{Digest, Md5};
use std::path::Path;

pub use decoder::FlacDecoder;
pub use fingerprint::ContentFingerprint;
pub use source::{InterleavedSource, SampleLayout, SampleSource};

use crate::error::ChecksumError;

/// Converts decoded `i32` samples to their canonical byte form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePacker {
    bytes_per_sample: usize,
    shift: u32,
}

impl SamplePacker {
    /// Only 16- and 24-bit streams are supported.
    pub fn new(bits_per_sample: u32, layout: SampleLayout) -> Result<Self, ChecksumError> {
        let bytes_per_sample = match bits_per_sample {
            16 => 2,
            24 => 3,
            other => return Err(ChecksumError::UnsupportedBitDepth(other)),
        };
        let shift = match layout {
            SampleLayout::Native => 0,
            SampleLayout::LeftJustified => 32 - bits_per_sample,
        };
        Ok(Self {
            bytes_per_sample,
            shift,
        })
    }

    /// Append the packed bytes of `samples` to `out`.
    pub fn pack_into(&self, samples: &[i32], out: &mut Vec<u8>) {
        out.reserve(samples.len() * self.bytes_per_sample);
        for &sample in samples {
            // Arithmetic shift keeps the sign of left-justified values.
            let value = sample >> self.shift;
            out.extend_from_slice(&value.to_le_bytes()[..self.bytes_per_sample]);
        }
    }
}

/// Stream every block of `source` through the packer into an MD5 digest.
///
/// Fails before reading any sample when the bit depth is unsupported.
pub fn compute_fingerprint<S: SampleSource + ?Sized>(
    source: &mut S,
) -> Result<ContentFingerprint, ChecksumError> {
    let packer = SamplePacker::new(source.bits_per_sample(), source.layout())?;
    let channels = source.channels().max(1);

    let mut hasher = Md5::new();
    let mut block = Vec::new();
    let mut packed = Vec::new();
    while source.read_block(&mut block)? {
        if block.len() % channels != 0 {
            return Err(ChecksumError::Decode(format!(
                "block of {} samples is not a whole number of {}-channel frames",
                block.len(),
                channels
            )));
        }
        packed.clear();
        packer.pack_into(&block, &mut packed);
        hasher.update(&packed);
    }

    Ok(ContentFingerprint::new(hasher.finalize().into()))
}

/// Decode `path` and compute its content fingerprint.
pub fn fingerprint_file(path: &Path, block_frames: usize) -> Result<ContentFingerprint, ChecksumError> {
    let mut decoder = FlacDecoder::open(path, block_frames)?;
    compute_fingerprint(&mut decoder)
}
