use super::blocks::MetadataBlock;
use super::{BLOCK_PADDING, BLOCK_SEEKTABLE, BLOCK_STREAMINFO, SEEKPOINT_LEN};
use crate::analysis::findings::{Category, Finding};

/// Structural checks over a scanned block chain.
///
/// Every rule runs; a block may trip more than one.
pub fn validate_blocks(blocks: &[MetadataBlock], padding_threshold: u32) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !blocks.iter().any(|b| b.block_type == BLOCK_STREAMINFO) {
        findings.push(Finding::error(
            Category::Metadata,
            "Critical: stream-info block missing",
        ));
    }

    for block in blocks {
        if block.block_type == BLOCK_PADDING && block.length > padding_threshold {
            findings.push(Finding::error(
                Category::Metadata,
                format!(
                    "Oversized padding block ({} KB, limit {} KB). This indicates probable corruption.",
                    block.length / 1024,
                    padding_threshold / 1024
                ),
            ));
        }

        if block.block_type == BLOCK_SEEKTABLE && block.length % SEEKPOINT_LEN != 0 {
            findings.push(Finding::error(
                Category::Metadata,
                format!(
                    "Invalid seek-table size ({} bytes), must be a multiple of {}.",
                    block.length, SEEKPOINT_LEN
                ),
            ));
        }
    }

    findings
}
