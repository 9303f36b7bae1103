use flacsift_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Analyze and fingerprint phases: progress bar (total known after discovery)
/// - Grouping phase: spinner
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.lock();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.lock().take() {
            pb.finish_and_clear();
        }
    }

    fn start_files_bar(&self, label: &str, total_files: usize) {
        let pb = ProgressBar::new(total_files as u64);
        let template = format!(
            "  {{spinner:.cyan}} {} [{{bar:30.cyan/dim}}] {{pos}}/{{len}} files ({{eta}} remaining)",
            label
        );
        if let Ok(style) = ProgressStyle::with_template(&template) {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn start_spinner(&self, message: &'static str) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }
}

impl ProgressReporter for CliReporter {
    fn on_discover_complete(&self, total_files: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Discovery complete: {} FLAC files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_analyze_start(&self, total_files: usize) {
        self.start_files_bar("Analyzing", total_files);
    }

    fn on_analyze_complete(&self, invalid_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Analysis complete: {} invalid files in {:.2}s",
            invalid_files, duration_secs
        );
    }

    fn on_fingerprint_start(&self, total_files: usize) {
        self.start_files_bar("Fingerprinting", total_files);
    }

    fn on_fingerprint_complete(&self, excluded_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Fingerprints complete: {} files excluded in {:.2}s",
            excluded_files, duration_secs
        );
    }

    fn on_grouping_start(&self) {
        self.start_spinner("Comparing file contents...");
    }

    fn on_grouping_complete(&self, groups: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Grouping complete: {} duplicate groups in {:.2}s",
            groups, duration_secs
        );
    }

    fn on_file_progress(&self, files_done: usize, total_files: usize) {
        if let Some(pb) = self.lock().as_ref() {
            if pb.length() != Some(total_files as u64) {
                pb.set_length(total_files as u64);
            }
            pb.set_position(files_done as u64);
        }
    }
}
