use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::checksum::{self, ContentFingerprint};
use crate::container::{self, TrackTags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintSource {
    Header,
    Computed,
}

/// A corpus member and its audio fingerprint, or the reason it has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub fingerprint: Option<ContentFingerprint>,
    pub source: Option<FingerprintSource>,
    pub fingerprint_error: Option<String>,
    pub tags: TrackTags,
}

impl FileRecord {
    pub fn with_fingerprint(
        path: PathBuf,
        size_bytes: u64,
        fingerprint: ContentFingerprint,
        source: FingerprintSource,
    ) -> Self {
        Self {
            path,
            size_bytes,
            fingerprint: Some(fingerprint),
            source: Some(source),
            fingerprint_error: None,
            tags: TrackTags::default(),
        }
    }

    pub fn failed(path: PathBuf, size_bytes: u64, error: impl Into<String>) -> Self {
        Self {
            path,
            size_bytes,
            fingerprint: None,
            source: None,
            fingerprint_error: Some(error.into()),
            tags: TrackTags::default(),
        }
    }

    pub fn with_tags(mut self, tags: TrackTags) -> Self {
        self.tags = tags;
        self
    }
}

/// Fingerprint one file, preferring the non-zero value embedded in STREAMINFO
/// and decoding the audio only when there is none.
pub fn fingerprint_record(path: &Path, block_frames: usize) -> FileRecord {
    let size_bytes = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => return FileRecord::failed(path.to_path_buf(), 0, e.to_string()),
    };

    let tags = container::read_vorbis_comments(path)
        .ok()
        .flatten()
        .map(|comments| TrackTags::from(&comments))
        .unwrap_or_default();

    if let Ok(info) = container::read_stream_info(path) {
        if let Some(fingerprint) = info.header_fingerprint() {
            return FileRecord::with_fingerprint(
                path.to_path_buf(),
                size_bytes,
                fingerprint,
                FingerprintSource::Header,
            )
            .with_tags(tags);
        }
    }

    trace!("No embedded MD5 for {}, decoding", path.display());
    let record = match checksum::fingerprint_file(path, block_frames) {
        Ok(fingerprint) => FileRecord::with_fingerprint(
            path.to_path_buf(),
            size_bytes,
            fingerprint,
            FingerprintSource::Computed,
        ),
        Err(e) => FileRecord::failed(path.to_path_buf(), size_bytes, e.to_string()),
    };
    record.with_tags(tags)
}
