use ahash::AHashMap;
use rayon::prelude::*;
use serde::Serialize;
use std::hash::Hash;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::record::FileRecord;
use crate::checksum::ContentFingerprint;
use crate::hasher;

/// Files sharing one audio fingerprint.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub fingerprint: ContentFingerprint,
    /// Members in discovery order.
    pub files: Vec<FileRecord>,
    /// Byte-identical subsets, each in discovery order, ordered by first member.
    pub strict_groups: Vec<Vec<PathBuf>>,
}

impl DuplicateGroup {
    /// Audio-equivalent members that belong to no strict group.
    pub fn remainder(&self) -> Vec<&PathBuf> {
        self.files
            .iter()
            .map(|f| &f.path)
            .filter(|p| !self.strict_groups.iter().any(|g| g.contains(*p)))
            .collect()
    }

    /// Bytes reclaimable by keeping one copy of each strict group.
    pub fn strict_wasted_bytes(&self) -> u64 {
        self.strict_groups
            .iter()
            .map(|group| {
                let size = self
                    .files
                    .iter()
                    .find(|f| Some(&f.path) == group.first())
                    .map(|f| f.size_bytes)
                    .unwrap_or(0);
                size * (group.len() as u64 - 1)
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DedupeOutcome {
    pub groups: Vec<DuplicateGroup>,
    /// Files that could not be fingerprinted and took no part in grouping.
    pub excluded: Vec<FileRecord>,
    pub total_files: usize,
}

/// Bucket records by fingerprint and split each shared bucket into byte-identical
/// subsets. Buckets come out in discovery order; singleton buckets are dropped.
pub fn find_duplicate_groups(records: Vec<FileRecord>) -> DedupeOutcome {
    let total_files = records.len();
    let mut excluded = Vec::new();
    let mut buckets: Vec<(ContentFingerprint, Vec<FileRecord>)> = Vec::new();
    let mut index: AHashMap<ContentFingerprint, usize> = AHashMap::new();

    for record in records {
        let Some(fingerprint) = record.fingerprint else {
            warn!(
                "Skipping: {} Reason: {}",
                record.path.display(),
                record.fingerprint_error.as_deref().unwrap_or("no fingerprint")
            );
            excluded.push(record);
            continue;
        };
        let slot = *index.entry(fingerprint).or_insert_with(|| {
            buckets.push((fingerprint, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(record);
    }

    let groups: Vec<DuplicateGroup> = buckets
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(fingerprint, files)| {
            let strict_groups = strict_partition(&files)
                .into_iter()
                .map(|members| members.into_iter().map(|i| files[i].path.clone()).collect())
                .collect();
            DuplicateGroup {
                fingerprint,
                files,
                strict_groups,
            }
        })
        .collect();

    debug!(
        "{} fingerprint groups, {} files excluded",
        groups.len(),
        excluded.len()
    );

    DedupeOutcome {
        groups,
        excluded,
        total_files,
    }
}

/// Indices of byte-identical members, narrowed by size, then by a hash of the
/// leading bytes, and confirmed by a full-content hash.
fn strict_partition(members: &[FileRecord]) -> Vec<Vec<usize>> {
    let all: Vec<usize> = (0..members.len()).collect();
    let mut groups = Vec::new();

    for by_size in partition_by(&all, |i| Some(members[i].size_bytes)) {
        for by_head in partition_by(&by_size, |i| {
            hasher::partial_hash(&members[i].path)
                .map_err(|e| warn!("Error hashing {}: {}", members[i].path.display(), e))
                .ok()
        }) {
            groups.extend(partition_by(&by_head, |i| {
                hasher::full_hash(&members[i].path)
                    .map_err(|e| warn!("Error hashing {}: {}", members[i].path.display(), e))
                    .ok()
            }));
        }
    }

    groups.sort_by_key(|group| group[0]);
    groups
}

/// Split `indices` by key, keeping first-seen order both across and within
/// parts. Members without a key and parts of one are dropped.
fn partition_by<K, F>(indices: &[usize], key: F) -> Vec<Vec<usize>>
where
    K: Hash + Eq + Send,
    F: Fn(usize) -> Option<K> + Sync,
{
    if indices.len() < 2 {
        return Vec::new();
    }

    let keys: Vec<Option<K>> = indices.par_iter().map(|&i| key(i)).collect();

    let mut parts: Vec<Vec<usize>> = Vec::new();
    let mut slots: AHashMap<K, usize> = AHashMap::new();
    for (&i, k) in indices.iter().zip(keys) {
        let Some(k) = k else { continue };
        let slot = *slots.entry(k).or_insert_with(|| {
            parts.push(Vec::new());
            parts.len() - 1
        });
        parts[slot].push(i);
    }

    parts.retain(|part| part.len() > 1);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::FingerprintSource;
    use std::fs;
    use tempfile::tempdir;

    fn record(path: PathBuf, fp: u8) -> FileRecord {
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        FileRecord::with_fingerprint(
            path,
            size,
            ContentFingerprint::new([fp; 16]),
            FingerprintSource::Header,
        )
    }

    #[test]
    fn test_partition_keeps_first_seen_order() {
        let parts = partition_by(&[0, 1, 2, 3, 4, 5], |i| Some(i % 3));
        assert_eq!(parts, vec![vec![0, 3], vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn test_partition_drops_unkeyed_and_singletons() {
        let parts = partition_by(&[0, 1, 2, 3], |i| if i == 0 { None } else { Some(i / 2) });
        assert_eq!(parts, vec![vec![2, 3]]);
    }

    #[test]
    fn test_singletons_are_not_reported() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a.flac");
        let b = tmp.path().join("b.flac");
        fs::write(&a, b"aaaa").unwrap();
        fs::write(&b, b"aaaa").unwrap();

        // Byte-identical, but different audio fingerprints: never compared.
        let outcome = find_duplicate_groups(vec![record(a, 1), record(b, 2)]);
        assert!(outcome.groups.is_empty());
        assert_eq!(outcome.total_files, 2);
    }

    #[test]
    fn test_failed_records_are_excluded() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a.flac");
        fs::write(&a, b"aaaa").unwrap();

        let outcome = find_duplicate_groups(vec![
            record(a.clone(), 1),
            FileRecord::failed(tmp.path().join("bad.flac"), 10, "decode error"),
            record(a, 1),
        ]);
        assert_eq!(outcome.excluded.len(), 1);
        assert_eq!(outcome.groups.len(), 1);
        assert_eq!(outcome.groups[0].files.len(), 2);
    }

    #[test]
    fn test_strict_groups_and_remainder() {
        let tmp = tempdir().unwrap();
        let paths: Vec<PathBuf> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| tmp.path().join(format!("{}.flac", n)))
            .collect();
        fs::write(&paths[0], b"tagged one + audio").unwrap();
        fs::write(&paths[1], b"tagged two + audio").unwrap(); // same size as a, different bytes
        fs::write(&paths[2], b"tagged one + audio").unwrap();
        fs::write(&paths[3], b"tagged two + audio").unwrap();
        fs::write(&paths[4], b"longer tag block + audio").unwrap();

        let records = paths.iter().map(|p| record(p.clone(), 7)).collect();
        let outcome = find_duplicate_groups(records);

        assert_eq!(outcome.groups.len(), 1);
        let group = &outcome.groups[0];
        assert_eq!(group.files.len(), 5);
        assert_eq!(
            group.strict_groups,
            vec![
                vec![paths[0].clone(), paths[2].clone()],
                vec![paths[1].clone(), paths[3].clone()],
            ]
        );
        assert_eq!(group.remainder(), vec![&paths[4]]);
        assert_eq!(group.strict_wasted_bytes(), 18 * 2);
    }

    #[test]
    fn test_buckets_in_discovery_order() {
        let tmp = tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..4)
            .map(|i| tmp.path().join(format!("{}.flac", i)))
            .collect();
        for (i, p) in paths.iter().enumerate() {
            fs::write(p, vec![i as u8; 8]).unwrap();
        }

        let records = vec![
            record(paths[0].clone(), 9),
            record(paths[1].clone(), 3),
            record(paths[2].clone(), 3),
            record(paths[3].clone(), 9),
        ];
        let outcome = find_duplicate_groups(records);
        let order: Vec<_> = outcome.groups.iter().map(|g| g.fingerprint).collect();
        assert_eq!(
            order,
            vec![ContentFingerprint::new([9; 16]), ContentFingerprint::new([3; 16])]
        );
        assert!(outcome.groups.iter().all(|g| g.strict_groups.is_empty()));
    }
}
