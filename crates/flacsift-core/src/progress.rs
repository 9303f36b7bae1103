/// Trait for reporting run progress.
///
/// The CLI implements it with indicatif bars. All methods have default no-op
/// implementations and may be called from worker threads.
pub trait ProgressReporter: Send + Sync {
    fn on_discover_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_analyze_start(&self, _total_files: usize) {}
    fn on_analyze_complete(&self, _invalid_files: usize, _duration_secs: f64) {}
    fn on_fingerprint_start(&self, _total_files: usize) {}
    fn on_fingerprint_complete(&self, _excluded_files: usize, _duration_secs: f64) {}
    fn on_grouping_start(&self) {}
    fn on_grouping_complete(&self, _groups: usize, _duration_secs: f64) {}
    fn on_file_progress(&self, _files_done: usize, _total_files: usize) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
