use crate::analysis::{analyze_file, AnalysisOptions, FileReport, FileStatus};
use crate::config::{self, AppConfig};
use crate::dedupe::{self, DedupeOutcome};
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner;
use ahash::AHashSet;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct ScanEngine {
    config: AppConfig,
    cancel_token: Arc<AtomicBool>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub total: usize,
    pub valid: usize,
    pub valid_with_warnings: usize,
    pub invalid: usize,
}

impl AnalysisSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = AnalysisSummary {
            total: reports.len(),
            ..Default::default()
        };
        for report in reports {
            match report.status {
                FileStatus::Valid => summary.valid += 1,
                FileStatus::ValidWithWarnings => summary.valid_with_warnings += 1,
                FileStatus::Invalid => summary.invalid += 1,
            }
        }
        summary
    }
}

#[derive(Debug)]
pub struct AnalysisRun {
    /// One report per analyzed file, in discovery order.
    pub reports: Vec<FileReport>,
    /// Files never started because the run was cancelled.
    pub skipped: Vec<PathBuf>,
    pub summary: AnalysisSummary,
    pub discover_duration: Duration,
    pub analyze_duration: Duration,
}

#[derive(Debug)]
pub struct DedupeRun {
    pub outcome: DedupeOutcome,
    pub skipped: Vec<PathBuf>,
    pub discover_duration: Duration,
    pub fingerprint_duration: Duration,
    pub grouping_duration: Duration,
}

impl ScanEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cancel_token: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting the token stops new files from being started. Files already in
    /// flight finish and keep their results.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_token)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.load(Ordering::Relaxed)
    }

    /// Resolve the configured roots into the ordered FLAC file list.
    ///
    /// Fails when no root is configured or none of them exists. A file reached
    /// through more than one spelling of a root is listed once.
    pub fn discover(&self) -> Result<Vec<PathBuf>, Error> {
        if self.config.root_paths.is_empty() {
            return Err(Error::Other("no root paths configured".to_string()));
        }

        let non_overlapping = config::non_overlapping_directories(self.config.root_paths.clone());
        info!("Processing paths: {:?}", non_overlapping);

        if !non_overlapping.iter().any(|root| Path::new(root).exists()) {
            return Err(Error::Other(format!(
                "none of the configured root paths exist: {:?}",
                non_overlapping
            )));
        }

        let root_path_slices: Vec<&str> = non_overlapping.iter().map(|s| s.as_str()).collect();
        let ignore_pattern_slices: Vec<&str> =
            self.config.ignore_patterns.iter().map(|s| s.as_str()).collect();

        let found = scanner::find_flac_files(
            &root_path_slices,
            &ignore_pattern_slices,
            &self.config.quarantine_dir_name,
        );

        let mut seen: AHashSet<PathBuf> = AHashSet::with_capacity(found.len());
        let mut files = Vec::with_capacity(found.len());
        for path in found {
            let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            if seen.insert(canonical) {
                files.push(path);
            } else {
                debug!("Already listed under another root: {}", path.display());
            }
        }

        Ok(files)
    }

    /// Structural and checksum analysis of every discovered file.
    pub fn analyze(&self, reporter: &dyn ProgressReporter) -> Result<AnalysisRun, Error> {
        let discover_start = Instant::now();
        let files = self.discover()?;
        let discover_duration = discover_start.elapsed();
        reporter.on_discover_complete(files.len(), discover_duration.as_secs_f64());
        info!("{} FLAC files found", files.len());

        let pool = self.build_pool()?;
        let options = AnalysisOptions::from(&self.config);

        let analyze_start = Instant::now();
        reporter.on_analyze_start(files.len());
        let (reports, skipped) =
            self.run_per_file(&pool, &files, reporter, |path| analyze_file(path, &options));
        let analyze_duration = analyze_start.elapsed();

        let summary = AnalysisSummary::from_reports(&reports);
        reporter.on_analyze_complete(summary.invalid, analyze_duration.as_secs_f64());
        debug!(
            "Analysis completed in {:.2}s: {} valid, {} with warnings, {} invalid",
            analyze_duration.as_secs_f64(),
            summary.valid,
            summary.valid_with_warnings,
            summary.invalid,
        );

        Ok(AnalysisRun {
            reports,
            skipped,
            summary,
            discover_duration,
            analyze_duration,
        })
    }

    /// Fingerprint every discovered file, then group by audio content.
    pub fn dedupe(&self, reporter: &dyn ProgressReporter) -> Result<DedupeRun, Error> {
        let discover_start = Instant::now();
        let files = self.discover()?;
        let discover_duration = discover_start.elapsed();
        reporter.on_discover_complete(files.len(), discover_duration.as_secs_f64());
        info!("{} FLAC files found", files.len());

        let pool = self.build_pool()?;
        let block_frames = self.config.block_frames;

        // Phase 1: fingerprints
        let fingerprint_start = Instant::now();
        reporter.on_fingerprint_start(files.len());
        let (records, skipped) = self.run_per_file(&pool, &files, reporter, |path| {
            dedupe::fingerprint_record(path, block_frames)
        });
        let fingerprint_duration = fingerprint_start.elapsed();
        let excluded = records.iter().filter(|r| r.fingerprint.is_none()).count();
        reporter.on_fingerprint_complete(excluded, fingerprint_duration.as_secs_f64());
        debug!(
            "Fingerprints completed in {:.2}s, {} excluded",
            fingerprint_duration.as_secs_f64(),
            excluded
        );

        // Phase 2: grouping
        let grouping_start = Instant::now();
        reporter.on_grouping_start();
        let outcome = pool.install(|| dedupe::find_duplicate_groups(records));
        let grouping_duration = grouping_start.elapsed();
        reporter.on_grouping_complete(outcome.groups.len(), grouping_duration.as_secs_f64());
        debug!(
            "Grouping completed in {:.2}s, {} groups",
            grouping_duration.as_secs_f64(),
            outcome.groups.len()
        );

        Ok(DedupeRun {
            outcome,
            skipped,
            discover_duration,
            fingerprint_duration,
            grouping_duration,
        })
    }

    fn build_pool(&self) -> Result<ThreadPool, Error> {
        let workers = self.config.effective_workers();
        info!("Running with {} workers", workers);
        Ok(rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("flacsift-worker-{}", i))
            .build()?)
    }

    /// Apply `work` to every file on the pool. Results keep input order no matter
    /// which worker finished first; files not started before cancellation are
    /// returned separately.
    fn run_per_file<T, F>(
        &self,
        pool: &ThreadPool,
        files: &[PathBuf],
        reporter: &dyn ProgressReporter,
        work: F,
    ) -> (Vec<T>, Vec<PathBuf>)
    where
        T: Send,
        F: Fn(&Path) -> T + Sync,
    {
        let total = files.len();
        let done = AtomicUsize::new(0);

        let outputs: Vec<Option<T>> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    if self.is_cancelled() {
                        return None;
                    }
                    let output = work(path.as_path());
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    reporter.on_file_progress(finished, total);
                    Some(output)
                })
                .collect()
        });

        let mut completed = Vec::with_capacity(total);
        let mut skipped = Vec::new();
        for (path, output) in files.iter().zip(outputs) {
            match output {
                Some(output) => completed.push(output),
                None => skipped.push(path.clone()),
            }
        }
        if !skipped.is_empty() {
            warn!("Run cancelled, {} files not processed", skipped.len());
        }

        (completed, skipped)
    }
}
