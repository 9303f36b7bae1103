//! Low-level FLAC container parsing. Works on raw bytes only; no decoder involved.

pub mod blocks;
pub mod stream_info;
pub mod tags;
pub mod validator;

pub use blocks::{scan_blocks, scan_file, MetadataBlock, ScanResult};
pub use stream_info::{read_stream_info, StreamInfo};
pub use tags::{read_vorbis_comments, TrackTags, VorbisComments};
pub use validator::validate_blocks;

pub const FLAC_SIGNATURE: [u8; 4] = *b"fLaC";
pub const BLOCK_HEADER_LEN: usize = 4;
pub const STREAMINFO_LEN: usize = 34;
pub const SEEKPOINT_LEN: u32 = 18;

pub const BLOCK_STREAMINFO: u8 = 0;
pub const BLOCK_PADDING: u8 = 1;
pub const BLOCK_SEEKTABLE: u8 = 3;
pub const BLOCK_VORBIS_COMMENT: u8 = 4;
