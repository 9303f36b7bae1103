//! Whole-file byte hashing, used only to refine audio-equivalence buckets.

use std::fs::File;
use std::hash::Hasher as _;
use std::io::{self, Read};
use std::path::Path;
use twox_hash::XxHash64;

/// Leading bytes covered by the quick hash. Tags and padding live here.
pub const PARTIAL_HASH_LENGTH: usize = 64 * 1024;

const READ_CHUNK: usize = 64 * 1024;

pub type FullHash = [u8; 32];

/// XxHash64 over the first `PARTIAL_HASH_LENGTH` bytes.
pub fn partial_hash(path: &Path) -> io::Result<u64> {
    let mut f = File::open(path)?;
    let mut buffer = vec![0; PARTIAL_HASH_LENGTH];
    let mut filled = 0;
    while filled < buffer.len() {
        match f.read(&mut buffer[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    buffer.truncate(filled);
    Ok(hash_data(&buffer))
}

/// BLAKE3 over the entire file, streamed in fixed chunks.
pub fn full_hash(path: &Path) -> io::Result<FullHash> {
    let mut f = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0; READ_CHUNK];
    loop {
        let n = f.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(*hasher.finalize().as_bytes())
}

pub fn hash_data(data: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(data);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_full_hash_matches_one_shot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.bin");
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &data).unwrap();

        assert_eq!(full_hash(&path).unwrap(), *blake3::hash(&data).as_bytes());
    }

    #[test]
    fn test_partial_hash_ignores_tail() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        let mut data = vec![0x5Au8; PARTIAL_HASH_LENGTH + 10];
        fs::write(&a, &data).unwrap();
        *data.last_mut().unwrap() = 0x00;
        fs::write(&b, &data).unwrap();

        assert_eq!(partial_hash(&a).unwrap(), partial_hash(&b).unwrap());
        assert_ne!(full_hash(&a).unwrap(), full_hash(&b).unwrap());
    }

    #[test]
    fn test_missing_file() {
        assert!(full_hash(Path::new("/nonexistent/x.flac")).is_err());
    }
}
