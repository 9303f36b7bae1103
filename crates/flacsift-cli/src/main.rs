mod commands;
mod logging;
mod progress;

use std::process;
use std::sync::atomic::Ordering;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, RunArgs};
use dotenv::dotenv;
use flacsift_core::analysis::FileStatus;
use flacsift_core::{report, AppConfig, ScanEngine};
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let args = Cli::parse();
    let _guard = logging::init_logger(args.log_level());

    let config = match flacsift_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let outcome = match args.command {
        Some(Commands::Analyze(run)) => run_analyze(apply_overrides(config, &run), &run),
        Some(Commands::Dedupe(run)) => run_dedupe(apply_overrides(config, &run), &run),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = outcome {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn apply_overrides(mut config: AppConfig, run: &RunArgs) -> AppConfig {
    if !run.paths.is_empty() {
        config = config.with_root_paths(run.paths.clone());
    }
    if run.workers.is_some() {
        config.workers = run.workers;
    }
    config
}

/// Ctrl-C stops new files from starting; the run still reports what finished.
fn install_interrupt_handler(engine: &ScanEngine) {
    let token = engine.cancel_token();
    if let Err(err) = ctrlc::set_handler(move || {
        eprintln!("Interrupted, finishing files in progress...");
        token.store(true, Ordering::Relaxed);
    }) {
        warn!("Could not install Ctrl-C handler: {}", err);
    }
}

fn run_analyze(config: AppConfig, run: &RunArgs) -> anyhow::Result<()> {
    let engine = ScanEngine::new(config);
    install_interrupt_handler(&engine);

    let reporter = CliReporter::new();
    let result = engine.analyze(&reporter).context("analysis failed")?;

    for report in &result.reports {
        if report.findings.is_empty() {
            continue;
        }
        let status = match report.status {
            FileStatus::Invalid => report.status.as_str().red(),
            FileStatus::ValidWithWarnings => report.status.as_str().yellow(),
            FileStatus::Valid => report.status.as_str().green(),
        };
        println!("{} {}", status, report.path.display());
        for finding in &report.findings {
            println!("    {}", finding);
        }
        for suggestion in &report.repair_suggestions {
            println!("    -> {:?}: {}", suggestion.action, suggestion.reason);
        }
    }

    if let Some(path) = &run.output {
        report::export_file_reports(path, &result.reports)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    println!();
    info!(
        "Discover: {}, Analyze: {}",
        format!("{:.2}s", result.discover_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.analyze_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files: {} valid, {} with warnings, {} invalid",
        result.summary.total,
        format!("{}", result.summary.valid).green(),
        format!("{}", result.summary.valid_with_warnings).yellow(),
        format!("{}", result.summary.invalid).red(),
    );
    if !result.skipped.is_empty() {
        warn!("{} files skipped after interrupt", result.skipped.len());
    }

    Ok(())
}

fn run_dedupe(config: AppConfig, run: &RunArgs) -> anyhow::Result<()> {
    let engine = ScanEngine::new(config);
    install_interrupt_handler(&engine);

    let reporter = CliReporter::new();
    let result = engine.dedupe(&reporter).context("duplicate search failed")?;
    let outcome = &result.outcome;

    for (idx, group) in outcome.groups.iter().enumerate() {
        println!(
            "Group {} [{}] {} files",
            idx + 1,
            group.fingerprint.to_hex().cyan(),
            group.files.len()
        );
        for (set_idx, strict) in group.strict_groups.iter().enumerate() {
            println!("    identical set {}:", set_idx + 1);
            for path in strict {
                println!("        {}", path.display());
            }
        }
        let remainder = group.remainder();
        if !remainder.is_empty() {
            println!("    same audio, different bytes:");
            for path in remainder {
                println!("        {}", path.display());
            }
        }
    }

    if let Some(path) = &run.output {
        report::export_duplicate_groups(path, &outcome.groups)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    let strict_sets: usize = outcome.groups.iter().map(|g| g.strict_groups.len()).sum();
    let wasted: u64 = outcome.groups.iter().map(|g| g.strict_wasted_bytes()).sum();

    println!();
    info!(
        "Discover: {}, Fingerprint: {}, Group: {}",
        format!("{:.2}s", result.discover_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.fingerprint_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.grouping_duration.as_secs_f64()).green(),
    );
    info!(
        "{} audio groups, {} identical sets, {} bytes reclaimable",
        format!("{}", outcome.groups.len()).red(),
        format!("{}", strict_sets).red(),
        format!("{}", wasted).red(),
    );
    if !outcome.excluded.is_empty() {
        warn!(
            "{} of {} files could not be fingerprinted",
            outcome.excluded.len(),
            outcome.total_files
        );
    }
    if !result.skipped.is_empty() {
        warn!("{} files skipped after interrupt", result.skipped.len());
    }

    Ok(())
}
