use super::findings::{Category, Finding};
use crate::checksum::ContentFingerprint;
use crate::container::ScanResult;
use crate::error::ChecksumError;

/// Findings implied by comparing the embedded fingerprint with the computed one.
///
/// `header` is `None` when the file carries an all-zero signature.
pub fn checksum_findings(
    header: Option<ContentFingerprint>,
    computed: &Result<ContentFingerprint, ChecksumError>,
) -> Vec<Finding> {
    match (header, computed) {
        (_, Err(e)) => vec![Finding::error(
            Category::Checksum,
            format!("MD5 calculation error: {}", e),
        )],
        (Some(header), Ok(computed)) if header != *computed => vec![Finding::error(
            Category::Checksum,
            format!("MD5 mismatch: header={}, calculated={}", header, computed),
        )],
        (Some(_), Ok(_)) => Vec::new(),
        (None, Ok(computed)) => vec![Finding::warning(
            Category::Checksum,
            format!("MD5 signature is unset (0) in header; calculated {}", computed),
        )],
    }
}

/// Merge per-stage findings in pipeline order: block scan, block validation,
/// then everything that needed the decoded stream.
pub fn merge_findings(
    scan: &ScanResult,
    validation: Vec<Finding>,
    stream: Vec<Finding>,
    checksum: Vec<Finding>,
    filename: Vec<Finding>,
) -> Vec<Finding> {
    let mut findings: Vec<Finding> = scan
        .scan_errors
        .iter()
        .map(|e| Finding::error(Category::Header, format!("Header Error: {}", e)))
        .collect();
    findings.extend(validation);
    findings.extend(stream);
    findings.extend(checksum);
    findings.extend(filename);
    findings
}
