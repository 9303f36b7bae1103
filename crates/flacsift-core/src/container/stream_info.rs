use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;

use super::{BLOCK_HEADER_LEN, BLOCK_STREAMINFO, FLAC_SIGNATURE, STREAMINFO_LEN};
use crate::checksum::ContentFingerprint;
use crate::container::blocks::MetadataBlock;

/// Stream parameters carried by the STREAMINFO block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u32,
    pub bits_per_sample: u32,
    pub total_samples: u64,
    pub md5: ContentFingerprint,
}

impl StreamInfo {
    /// Decode the fixed 34-byte STREAMINFO payload.
    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        if payload.len() < STREAMINFO_LEN {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "STREAMINFO payload is {} bytes, expected {}",
                    payload.len(),
                    STREAMINFO_LEN
                ),
            ));
        }

        // 20 bits rate, 3 bits channels-1, 5 bits bps-1, 36 bits total samples.
        let mut packed = [0u8; 8];
        packed.copy_from_slice(&payload[10..18]);
        let packed = u64::from_be_bytes(packed);

        let mut md5 = [0u8; 16];
        md5.copy_from_slice(&payload[18..34]);

        Ok(Self {
            sample_rate: (packed >> 44) as u32,
            channels: ((packed >> 41) & 0x7) as u32 + 1,
            bits_per_sample: ((packed >> 36) & 0x1F) as u32 + 1,
            total_samples: packed & 0xF_FFFF_FFFF,
            md5: ContentFingerprint::new(md5),
        })
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.total_samples as f64 / f64::from(self.sample_rate)
    }

    /// Size of the decoded PCM, in bytes.
    pub fn expected_pcm_bytes(&self) -> u64 {
        self.total_samples * u64::from(self.channels) * u64::from(self.bits_per_sample / 8)
    }

    /// The embedded fingerprint, or `None` when the encoder left it unset.
    pub fn header_fingerprint(&self) -> Option<ContentFingerprint> {
        if self.md5.is_zero() {
            None
        } else {
            Some(self.md5)
        }
    }
}

pub fn read_stream_info(path: &Path) -> io::Result<StreamInfo> {
    let file = File::open(path)?;
    read_stream_info_from(BufReader::new(file))
}

/// Reads the STREAMINFO block, which must be the first block of the chain.
pub fn read_stream_info_from<R: Read>(mut reader: R) -> io::Result<StreamInfo> {
    let mut signature = [0u8; 4];
    reader.read_exact(&mut signature)?;
    if signature != FLAC_SIGNATURE {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            "not a FLAC stream (missing 'fLaC' signature)",
        ));
    }

    let mut header = [0u8; BLOCK_HEADER_LEN];
    reader.read_exact(&mut header)?;
    let block = MetadataBlock::from_header(header);
    if block.block_type != BLOCK_STREAMINFO {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("first metadata block has type {}, expected STREAMINFO", block.block_type),
        ));
    }

    let mut payload = [0u8; STREAMINFO_LEN];
    reader.read_exact(&mut payload)?;
    StreamInfo::parse(&payload)
}
