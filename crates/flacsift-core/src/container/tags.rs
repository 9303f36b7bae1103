use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use super::blocks::MetadataBlock;
use super::{BLOCK_HEADER_LEN, BLOCK_VORBIS_COMMENT, FLAC_SIGNATURE};

/// Raw contents of a VORBIS_COMMENT block. Field names keep their on-disk case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VorbisComments {
    pub vendor: String,
    pub entries: Vec<(String, String)>,
}

impl VorbisComments {
    /// Parse a block payload: little-endian length-prefixed vendor string, then a
    /// counted list of length-prefixed `NAME=value` entries.
    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut cursor = payload;
        let vendor = read_string(&mut cursor)?;
        let count = read_u32_le(&mut cursor)?;

        let mut entries = Vec::new();
        for _ in 0..count {
            let entry = read_string(&mut cursor)?;
            match entry.split_once('=') {
                Some((name, value)) => entries.push((name.to_string(), value.to_string())),
                None => {
                    return Err(io::Error::new(
                        ErrorKind::InvalidData,
                        format!("comment without '=' separator: {:?}", entry),
                    ))
                }
            }
        }

        Ok(Self { vendor, entries })
    }

    /// First value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The tags shown in reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackTags {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub date: Option<String>,
    pub track_number: Option<String>,
    pub album_artist: Option<String>,
    pub replaygain_track_gain: Option<String>,
    pub replaygain_track_peak: Option<String>,
}

impl From<&VorbisComments> for TrackTags {
    fn from(comments: &VorbisComments) -> Self {
        let field = |name: &str| comments.get(name).map(str::to_string);
        Self {
            artist: field("ARTIST"),
            album: field("ALBUM"),
            title: field("TITLE"),
            genre: field("GENRE"),
            date: field("DATE"),
            track_number: field("TRACKNUMBER"),
            album_artist: field("ALBUMARTIST"),
            replaygain_track_gain: field("REPLAYGAIN_TRACK_GAIN"),
            replaygain_track_peak: field("REPLAYGAIN_TRACK_PEAK"),
        }
    }
}

pub fn read_vorbis_comments(path: &Path) -> io::Result<Option<VorbisComments>> {
    let file = File::open(path)?;
    read_vorbis_comments_from(BufReader::new(file))
}

/// Walk the block chain and parse the first VORBIS_COMMENT block, if any.
pub fn read_vorbis_comments_from<R: Read + Seek>(mut reader: R) -> io::Result<Option<VorbisComments>> {
    let mut signature = [0u8; 4];
    reader.read_exact(&mut signature)?;
    if signature != FLAC_SIGNATURE {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            "not a FLAC stream (missing 'fLaC' signature)",
        ));
    }

    loop {
        let mut header = [0u8; BLOCK_HEADER_LEN];
        reader.read_exact(&mut header)?;
        let block = MetadataBlock::from_header(header);

        if block.block_type == BLOCK_VORBIS_COMMENT {
            let mut payload = vec![0u8; block.length as usize];
            reader.read_exact(&mut payload)?;
            return VorbisComments::parse(&payload).map(Some);
        }
        if block.is_last {
            return Ok(None);
        }
        reader.seek(SeekFrom::Current(i64::from(block.length)))?;
    }
}

fn read_u32_le(cursor: &mut &[u8]) -> io::Result<u32> {
    if cursor.len() < 4 {
        return Err(ErrorKind::UnexpectedEof.into());
    }
    let (head, rest) = cursor.split_at(4);
    *cursor = rest;
    Ok(u32::from_le_bytes([head[0], head[1], head[2], head[3]]))
}

fn read_string(cursor: &mut &[u8]) -> io::Result<String> {
    let len = read_u32_le(cursor)? as usize;
    if cursor.len() < len {
        return Err(ErrorKind::UnexpectedEof.into());
    }
    let (head, rest) = cursor.split_at(len);
    *cursor = rest;
    Ok(String::from_utf8_lossy(head).into_owned())
}
