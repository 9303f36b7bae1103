use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::trace;

use super::{BLOCK_HEADER_LEN, FLAC_SIGNATURE};

/// One entry in the metadata block chain, as found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetadataBlock {
    pub block_type: u8,
    pub length: u32,
    pub is_last: bool,
}

impl MetadataBlock {
    /// Decode a 4-byte block header: last-flag in the top bit, type in the low
    /// seven bits, then a big-endian 24-bit payload length.
    pub fn from_header(header: [u8; BLOCK_HEADER_LEN]) -> Self {
        Self {
            block_type: header[0] & 0x7F,
            length: u32::from_be_bytes([0, header[1], header[2], header[3]]),
            is_last: header[0] & 0x80 != 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub is_valid_container: bool,
    pub blocks: Vec<MetadataBlock>,
    pub scan_errors: Vec<String>,
}

pub fn scan_file(path: &Path) -> io::Result<ScanResult> {
    let file = File::open(path)?;
    Ok(scan_blocks(BufReader::new(file)))
}

/// Walk the metadata block chain without reading any payload.
///
/// Terminates on the last-block flag, on a short block header, or on the first
/// read error. Never touches the stream again after a signature mismatch.
pub fn scan_blocks<R: Read + Seek>(mut reader: R) -> ScanResult {
    let mut result = ScanResult::default();

    let mut signature = [0u8; 4];
    match read_up_to(&mut reader, &mut signature) {
        Ok(4) if signature == FLAC_SIGNATURE => result.is_valid_container = true,
        Ok(_) => {
            result
                .scan_errors
                .push("Signature 'fLaC' not found at the beginning of the file.".to_string());
            return result;
        }
        Err(e) => {
            result.scan_errors.push(format!("Low-level read error: {}", e));
            return result;
        }
    }

    loop {
        let mut header = [0u8; BLOCK_HEADER_LEN];
        let read = match read_up_to(&mut reader, &mut header) {
            Ok(read) => read,
            Err(e) => {
                result.scan_errors.push(format!("Low-level read error: {}", e));
                break;
            }
        };
        if read < BLOCK_HEADER_LEN {
            result
                .scan_errors
                .push("Unexpected end of file while reading a block header.".to_string());
            break;
        }

        let block = MetadataBlock::from_header(header);
        trace!(
            "Block type={} length={} last={}",
            block.block_type,
            block.length,
            block.is_last
        );
        result.blocks.push(block);

        if let Err(e) = reader.seek(SeekFrom::Current(i64::from(block.length))) {
            result.scan_errors.push(format!("Low-level read error: {}", e));
            break;
        }
        if block.is_last {
            break;
        }
    }

    result
}

/// Fill as much of `buf` as the stream allows; a short count means end of stream.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
