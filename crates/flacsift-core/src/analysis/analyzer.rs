use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use super::aggregate::{checksum_findings, merge_findings};
use super::filename::check_filename;
use super::findings::{
    derive_status, suggest_repairs, Category, FileStatus, Finding, RepairSuggestion,
};
use crate::checksum::{self, ContentFingerprint};
use crate::config::{AppConfig, PaddingPolicy, DEFAULT_BLOCK_FRAMES};
use crate::container::{self, MetadataBlock, ScanResult, StreamInfo, TrackTags};

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub padding: PaddingPolicy,
    pub block_frames: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            padding: PaddingPolicy::default(),
            block_frames: DEFAULT_BLOCK_FRAMES,
        }
    }
}

impl From<&AppConfig> for AnalysisOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            padding: config.padding,
            block_frames: config.block_frames,
        }
    }
}

/// Everything learned about one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub status: FileStatus,
    pub findings: Vec<Finding>,
    pub blocks: Vec<MetadataBlock>,
    pub stream_info: Option<StreamInfo>,
    /// Average over the whole file, tags and padding included.
    pub bitrate_kbps: Option<u32>,
    pub tags: TrackTags,
    pub fingerprint_header: Option<ContentFingerprint>,
    pub fingerprint_computed: Option<ContentFingerprint>,
    pub repair_suggestions: Vec<RepairSuggestion>,
}

impl FileReport {
    fn from_findings(path: &Path, size_bytes: u64, findings: Vec<Finding>) -> Self {
        let status = derive_status(&findings);
        let repair_suggestions = suggest_repairs(status, &findings);
        Self {
            path: path.to_path_buf(),
            size_bytes,
            status,
            findings,
            blocks: Vec::new(),
            stream_info: None,
            bitrate_kbps: None,
            tags: TrackTags::default(),
            fingerprint_header: None,
            fingerprint_computed: None,
            repair_suggestions,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }
}

/// Run the full per-file pipeline. Never fails: every problem becomes a finding.
pub fn analyze_file(path: &Path, options: &AnalysisOptions) -> FileReport {
    let size_bytes = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            return FileReport::from_findings(
                path,
                0,
                vec![Finding::error(Category::Io, format!("Cannot read file: {}", e))],
            )
        }
    };

    let scan = match container::scan_file(path) {
        Ok(scan) => scan,
        Err(e) => {
            return FileReport::from_findings(
                path,
                size_bytes,
                vec![Finding::error(Category::Io, format!("Cannot open file: {}", e))],
            )
        }
    };

    let mut stream_findings = Vec::new();
    let stream_info = if scan.is_valid_container {
        match container::read_stream_info(path) {
            Ok(info) => Some(info),
            Err(e) => {
                stream_findings.push(Finding::error(
                    Category::Stream,
                    format!("Stream info unreadable: {}", e),
                ));
                None
            }
        }
    } else {
        None
    };

    let threshold = options
        .padding
        .threshold_for(stream_info.map(|info| info.bits_per_sample));
    let mut validation = container::validate_blocks(&scan.blocks, threshold);

    let tags = if scan.is_valid_container {
        match container::read_vorbis_comments(path) {
            Ok(comments) => comments.as_ref().map(TrackTags::from).unwrap_or_default(),
            Err(e) => {
                validation.push(Finding::warning(
                    Category::Metadata,
                    format!("Vorbis comment block unreadable: {}", e),
                ));
                TrackTags::default()
            }
        }
    } else {
        TrackTags::default()
    };

    let fingerprint_header = stream_info.and_then(|info| info.header_fingerprint());
    let (checksum, fingerprint_computed) = match stream_info {
        Some(_) => {
            let computed = checksum::fingerprint_file(path, options.block_frames);
            let findings = checksum_findings(fingerprint_header, &computed);
            (findings, computed.ok())
        }
        None => (Vec::new(), None),
    };

    let filename = path
        .file_name()
        .map(|name| check_filename(&name.to_string_lossy()))
        .unwrap_or_default();

    let findings = merge_findings(&scan, validation, stream_findings, checksum, filename);
    trace!("{}: {} findings", path.display(), findings.len());

    let ScanResult { blocks, .. } = scan;
    FileReport {
        blocks,
        stream_info,
        bitrate_kbps: stream_info.and_then(|info| average_bitrate_kbps(size_bytes, &info)),
        tags,
        fingerprint_header,
        fingerprint_computed,
        ..FileReport::from_findings(path, size_bytes, findings)
    }
}

fn average_bitrate_kbps(size_bytes: u64, info: &StreamInfo) -> Option<u32> {
    let duration = info.duration_secs();
    if duration <= 0.0 {
        return None;
    }
    Some((size_bytes as f64 * 8.0 / duration / 1000.0) as u32)
}
