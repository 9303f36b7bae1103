//! Duplicate detection: audio-equivalence buckets refined by byte identity.

pub mod grouping;
pub mod record;

pub use grouping::{find_duplicate_groups, DedupeOutcome, DuplicateGroup};
pub use record::{fingerprint_record, FileRecord, FingerprintSource};
