use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "flacsift")]
#[command(about = "FLAC integrity checker and audio-aware deduper", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace); overrides TRACING_LEVEL
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors; overrides TRACING_LEVEL
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Log level requested on the command line, if any.
    pub fn log_level(&self) -> Option<&'static str> {
        match (self.quiet, self.verbose) {
            (true, _) => Some("warn"),
            (false, 0) => None,
            (false, 1) => Some("debug"),
            (false, _) => Some("trace"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check container structure and audio checksums of every FLAC file
    Analyze(RunArgs),
    /// Find files with identical audio, split into byte-identical sets
    Dedupe(RunArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Files or directories to scan; replaces `root_paths` from the config
    pub paths: Vec<String>,

    /// Worker threads (clamped to 1..=61)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Write the results to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
