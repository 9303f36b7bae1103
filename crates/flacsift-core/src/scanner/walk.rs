use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use walkdir::{DirEntry, WalkDir};

/// Expand root paths into the ordered list of FLAC files beneath them.
///
/// Roots are visited in the order given and directories in file-name order, so
/// the same inputs always produce the same list. Files inside the quarantine
/// folder and paths matching an ignore glob are skipped. Unreadable entries are
/// logged and skipped.
pub fn find_flac_files(
    root_paths: &[&str],
    ignore_globs: &[&str],
    quarantine_dir_name: &str,
) -> Vec<PathBuf> {
    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    let mut files = Vec::new();

    for root in root_paths {
        let root = Path::new(root);
        if !root.exists() {
            warn!("Path '{}' does not exist.", root.display());
            continue;
        }

        if root.is_file() {
            if is_flac(root) && !is_ignored(root, &ignore_patterns) {
                files.push(root.to_path_buf());
            }
            continue;
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| keep_entry(entry, &ignore_patterns, quarantine_dir_name));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    error!("Error walking {}: {}", root.display(), err);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_flac(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    files
}

fn keep_entry(entry: &DirEntry, ignore_patterns: &[Pattern], quarantine_dir_name: &str) -> bool {
    if entry.file_type().is_dir() && entry.file_name() == quarantine_dir_name {
        return false;
    }
    !is_ignored(entry.path(), ignore_patterns)
}

fn is_ignored(path: &Path, ignore_patterns: &[Pattern]) -> bool {
    ignore_patterns
        .iter()
        .any(|pattern| pattern.matches_path(path))
}

fn is_flac(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("flac"))
        .unwrap_or(false)
}
