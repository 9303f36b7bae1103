pub mod analysis;
pub mod checksum;
pub mod config;
pub mod container;
pub mod dedupe;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod progress;
pub mod report;
pub mod scanner;

pub use config::AppConfig;
pub use engine::{AnalysisRun, AnalysisSummary, DedupeRun, ScanEngine};
pub use error::{ChecksumError, Error};
pub use progress::{ProgressReporter, SilentReporter};
