//! Synthetic FLAC files for the integration tests.
#![allow(dead_code)]

use md5::{Digest, Md5};
use std::fs;
use std::path::Path;

pub const STREAMINFO: u8 = 0;
pub const PADDING: u8 = 1;
pub const SEEKTABLE: u8 = 3;
pub const VORBIS_COMMENT: u8 = 4;

pub const SAMPLE_RATE: u32 = 44100;

/// Builds a FLAC container: metadata blocks followed by optional audio frames.
pub struct FlacBuilder {
    blocks: Vec<(u8, Vec<u8>)>,
    frames: Vec<u8>,
}

impl FlacBuilder {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// CD-style stream parameters with a made-up length.
    pub fn stream_info(self, bits_per_sample: u32, md5: [u8; 16]) -> Self {
        self.stream_info_with(2, bits_per_sample, 441_000, 4096, md5)
    }

    pub fn stream_info_with(
        mut self,
        channels: u32,
        bits_per_sample: u32,
        total_samples: u64,
        block_frames: u16,
        md5: [u8; 16],
    ) -> Self {
        let mut payload = Vec::with_capacity(34);
        payload.extend_from_slice(&block_frames.to_be_bytes());
        payload.extend_from_slice(&block_frames.to_be_bytes());
        // Frame sizes unknown.
        payload.extend_from_slice(&[0u8; 6]);
        let packed = (u64::from(SAMPLE_RATE) << 44)
            | (u64::from(channels - 1) << 41)
            | (u64::from(bits_per_sample - 1) << 36)
            | total_samples;
        payload.extend_from_slice(&packed.to_be_bytes());
        payload.extend_from_slice(&md5);
        self.blocks.push((STREAMINFO, payload));
        self
    }

    pub fn block(mut self, block_type: u8, payload: Vec<u8>) -> Self {
        self.blocks.push((block_type, payload));
        self
    }

    pub fn comments(self, entries: &[&str]) -> Self {
        let vendor = b"flacsift tests";
        let mut payload = Vec::new();
        payload.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        payload.extend_from_slice(vendor);
        payload.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        for entry in entries {
            payload.extend_from_slice(&(entry.len() as u32).to_le_bytes());
            payload.extend_from_slice(entry.as_bytes());
        }
        self.block(VORBIS_COMMENT, payload)
    }

    /// Full stream: STREAMINFO carrying `header_md5`, then verbatim frames of `pcm`.
    pub fn audio(self, pcm: &Pcm, block_frames: usize, header_md5: [u8; 16]) -> Self {
        let mut builder = self.stream_info_with(
            pcm.channels as u32,
            pcm.bits_per_sample,
            pcm.frames() as u64,
            block_frames as u16,
            header_md5,
        );
        builder.frames = encode_verbatim_frames(pcm, block_frames);
        builder
    }

    pub fn write(self, path: &Path) {
        let mut bytes = b"fLaC".to_vec();
        let last = self.blocks.len().saturating_sub(1);
        for (i, (block_type, payload)) in self.blocks.into_iter().enumerate() {
            let flag = if i == last { 0x80 } else { 0x00 };
            bytes.push(flag | block_type);
            bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes()[1..]);
            bytes.extend_from_slice(&payload);
        }
        bytes.extend_from_slice(&self.frames);
        fs::write(path, bytes).unwrap();
    }
}

/// Interleaved samples at their true magnitude.
pub struct Pcm {
    pub bits_per_sample: u32,
    pub channels: usize,
    pub samples: Vec<i32>,
}

impl Pcm {
    /// A deterministic signal spanning most of the signed range, negatives included.
    pub fn ramp(bits_per_sample: u32, channels: usize, frames: usize) -> Self {
        let span = 1i64 << bits_per_sample;
        let half = span / 2;
        let samples = (0..frames * channels)
            .map(|i| {
                let ch = (i % channels) as i64;
                let v = (i as i64 * 7919 + ch * 104_729) % (span - 2);
                (v - half + 1) as i32
            })
            .collect();
        Self {
            bits_per_sample,
            channels,
            samples,
        }
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }

    /// MD5 over each sample as little-endian bytes, as FLAC encoders compute it.
    pub fn md5(&self) -> [u8; 16] {
        let width = self.bytes_per_sample();
        let mut hasher = Md5::new();
        for s in &self.samples {
            hasher.update(&s.to_le_bytes()[..width]);
        }
        hasher.finalize().into()
    }
}

/// One FLAC frame per `block_frames` frames, every channel a verbatim subframe.
/// Fixed block size, 44.1 kHz, independent channels.
fn encode_verbatim_frames(pcm: &Pcm, block_frames: usize) -> Vec<u8> {
    assert!((1..=256).contains(&block_frames));
    let sample_size_code: u8 = match pcm.bits_per_sample {
        16 => 0b100,
        24 => 0b110,
        other => panic!("no frame encoding for {}-bit samples", other),
    };
    let width = pcm.bytes_per_sample();

    let mut out = Vec::new();
    for (number, chunk) in pcm.samples.chunks(block_frames * pcm.channels).enumerate() {
        assert!(number < 128, "frame number must fit in one byte");
        let frames = chunk.len() / pcm.channels;

        let mut frame = vec![
            0xFF,
            0xF8,
            // Block size: 8-bit (n - 1) after the header. Sample rate: 44.1 kHz.
            0x69,
            ((pcm.channels as u8 - 1) << 4) | (sample_size_code << 1),
            number as u8,
            (frames - 1) as u8,
        ];
        frame.push(crc8(&frame));

        for ch in 0..pcm.channels {
            frame.push(0x02);
            for i in 0..frames {
                let be = chunk[i * pcm.channels + ch].to_be_bytes();
                frame.extend_from_slice(&be[4 - width..]);
            }
        }

        let crc = crc16(&frame);
        frame.extend_from_slice(&crc.to_be_bytes());
        out.extend_from_slice(&frame);
    }
    out
}

fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x07 } else { crc << 1 };
        }
    }
    crc
}

fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0u16;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x8005 } else { crc << 1 };
        }
    }
    crc
}
