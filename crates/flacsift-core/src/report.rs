//! CSV export of per-file reports and duplicate groups.

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::analysis::{FileReport, Finding, RepairAction};
use crate::dedupe::DuplicateGroup;
use crate::error::Error;

#[derive(Debug, Serialize)]
struct FileReportRow {
    path: String,
    status: &'static str,
    size_bytes: u64,
    sample_rate: Option<u32>,
    channels: Option<u32>,
    bits_per_sample: Option<u32>,
    duration_secs: Option<String>,
    bitrate_kbps: Option<u32>,
    expected_pcm_bytes: Option<u64>,
    md5_header: Option<String>,
    md5_calculated: Option<String>,
    errors: String,
    warnings: String,
    repair: &'static str,
    artist: Option<String>,
    album: Option<String>,
    title: Option<String>,
    album_artist: Option<String>,
    track_number: Option<String>,
    genre: Option<String>,
    date: Option<String>,
    replaygain_track_gain: Option<String>,
    replaygain_track_peak: Option<String>,
}

#[derive(Debug, Serialize)]
struct DuplicateRow {
    group: usize,
    audio_md5: String,
    kind: &'static str,
    strict_set: Option<usize>,
    path: String,
    size_bytes: u64,
    artist: Option<String>,
    album: Option<String>,
    title: Option<String>,
}

pub fn write_file_reports<W: Write>(writer: W, reports: &[FileReport]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    for report in reports {
        let info = report.stream_info.as_ref();
        let tags = &report.tags;
        let repair = report
            .repair_suggestions
            .iter()
            .map(|s| match s.action {
                RepairAction::Reencode => "reencode",
                RepairAction::Rename => "rename",
            })
            .next()
            .unwrap_or("");

        wtr.serialize(FileReportRow {
            path: report.path.to_string_lossy().into_owned(),
            status: report.status.as_str(),
            size_bytes: report.size_bytes,
            sample_rate: info.map(|i| i.sample_rate),
            channels: info.map(|i| i.channels),
            bits_per_sample: info.map(|i| i.bits_per_sample),
            duration_secs: info.map(|i| format!("{:.2}", i.duration_secs())),
            bitrate_kbps: report.bitrate_kbps,
            expected_pcm_bytes: info.map(|i| i.expected_pcm_bytes()),
            md5_header: report.fingerprint_header.map(|f| f.to_hex()),
            md5_calculated: report.fingerprint_computed.map(|f| f.to_hex()),
            errors: join_messages(report.errors()),
            warnings: join_messages(report.warnings()),
            repair,
            artist: tags.artist.clone(),
            album: tags.album.clone(),
            title: tags.title.clone(),
            album_artist: tags.album_artist.clone(),
            track_number: tags.track_number.clone(),
            genre: tags.genre.clone(),
            date: tags.date.clone(),
            replaygain_track_gain: tags.replaygain_track_gain.clone(),
            replaygain_track_peak: tags.replaygain_track_peak.clone(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row per file; strict members first, then the audio-only remainder.
pub fn write_duplicate_groups<W: Write>(writer: W, groups: &[DuplicateGroup]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    for (group_idx, group) in groups.iter().enumerate() {
        let strict = group
            .strict_groups
            .iter()
            .enumerate()
            .flat_map(|(set_idx, set)| set.iter().map(move |path| (Some(set_idx + 1), path)));
        let remainder = group.remainder().into_iter().map(|path| (None, path));

        for (strict_set, path) in strict.chain(remainder) {
            let record = group.files.iter().find(|f| &f.path == path);
            let tags = record.map(|r| &r.tags);
            wtr.serialize(DuplicateRow {
                group: group_idx + 1,
                audio_md5: group.fingerprint.to_hex(),
                kind: if strict_set.is_some() { "strict" } else { "audio-only" },
                strict_set,
                path: path.to_string_lossy().into_owned(),
                size_bytes: record.map(|r| r.size_bytes).unwrap_or(0),
                artist: tags.and_then(|t| t.artist.clone()),
                album: tags.and_then(|t| t.album.clone()),
                title: tags.and_then(|t| t.title.clone()),
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_file_reports(path: &Path, reports: &[FileReport]) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    write_file_reports(file, reports)
}

pub fn export_duplicate_groups(path: &Path, groups: &[DuplicateGroup]) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    write_duplicate_groups(file, groups)
}

fn join_messages<'a>(findings: impl Iterator<Item = &'a Finding>) -> String {
    findings
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::ContentFingerprint;
    use crate::container::TrackTags;
    use crate::analysis::{Category, FileStatus, RepairSuggestion};
    use crate::container::StreamInfo;
    use crate::dedupe::{FileRecord, FingerprintSource};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn test_file_report_row() {
        let header = ContentFingerprint::new([0x11; 16]);
        let computed = ContentFingerprint::new([0x22; 16]);
        let report = FileReport {
            path: PathBuf::from("music/01 Intro?.flac"),
            size_bytes: 2_000_000,
            status: FileStatus::Invalid,
            findings: vec![
                Finding::error(Category::Checksum, "MD5 mismatch"),
                Finding::warning(Category::Filename, "reserved character '?'"),
            ],
            blocks: Vec::new(),
            stream_info: Some(StreamInfo {
                sample_rate: 44100,
                channels: 2,
                bits_per_sample: 16,
                total_samples: 441_000,
                md5: header,
            }),
            bitrate_kbps: Some(1600),
            tags: TrackTags {
                artist: Some("Broadcast".to_string()),
                track_number: Some("1".to_string()),
                ..TrackTags::default()
            },
            fingerprint_header: Some(header),
            fingerprint_computed: Some(computed),
            repair_suggestions: vec![RepairSuggestion {
                action: RepairAction::Reencode,
                reason: "structural corruption detected",
            }],
        };

        let mut out = Vec::new();
        write_file_reports(&mut out, &[report]).unwrap();

        let mut rdr = csv::Reader::from_reader(out.as_slice());
        let headers = rdr.headers().unwrap().clone();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let row: HashMap<&str, &str> = headers.iter().zip(rows[0].iter()).collect();

        assert_eq!(row["path"], "music/01 Intro?.flac");
        assert_eq!(row["status"], "INVALID");
        assert_eq!(row["duration_secs"], "10.00");
        assert_eq!(row["bitrate_kbps"], "1600");
        assert_eq!(row["expected_pcm_bytes"], "1764000");
        assert_eq!(row["md5_header"], "11".repeat(16));
        assert_eq!(row["md5_calculated"], "22".repeat(16));
        assert_eq!(row["errors"], "[checksum] MD5 mismatch");
        assert_eq!(row["warnings"], "[filename] reserved character '?'");
        assert_eq!(row["repair"], "reencode");
        assert_eq!(row["artist"], "Broadcast");
        assert_eq!(row["track_number"], "1");
        assert_eq!(row["album"], "");
    }

    #[test]
    fn test_duplicate_rows_strict_first() {
        let fp = ContentFingerprint::new([0xAB; 16]);
        let rec = |name: &str, size| {
            FileRecord::with_fingerprint(PathBuf::from(name), size, fp, FingerprintSource::Header)
        };
        let tagged = TrackTags {
            artist: Some("Can".to_string()),
            album: Some("Tago Mago".to_string()),
            title: Some("Halleluhwah".to_string()),
            ..TrackTags::default()
        };
        let group = DuplicateGroup {
            fingerprint: fp,
            files: vec![
                rec("c.flac", 30).with_tags(tagged),
                rec("a.flac", 10),
                rec("b.flac", 10),
            ],
            strict_groups: vec![vec![PathBuf::from("a.flac"), PathBuf::from("b.flac")]],
        };

        let mut out = Vec::new();
        write_duplicate_groups(&mut out, &[group]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "group,audio_md5,kind,strict_set,path,size_bytes,artist,album,title"
        );
        assert!(lines[1].ends_with("strict,1,a.flac,10,,,"));
        assert!(lines[2].ends_with("strict,1,b.flac,10,,,"));
        assert!(lines[3].ends_with("audio-only,,c.flac,30,Can,Tago Mago,Halleluhwah"));
        assert_eq!(lines.len(), 4);
    }
}
