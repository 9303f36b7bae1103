pub mod aggregate;
pub mod analyzer;
pub mod filename;
pub mod findings;

pub use analyzer::{analyze_file, AnalysisOptions, FileReport};
pub use findings::{Category, FileStatus, Finding, RepairAction, RepairSuggestion, Severity};
