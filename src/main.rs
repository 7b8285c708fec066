//! Main entry point for the zipfix CLI application.
//!
//! Each input archive is repaired on tokio's blocking pool; results are
//! printed in the order the files were given.

use anyhow::Result;
use clap::Parser;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use zipfix::{Cli, RepairError, RepairReport, ScanReport, inspect, repair_async};

/// Application entry point.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = unique_paths(&cli.files);

    let failed = if cli.check {
        check_files(&paths, &cli)
    } else {
        repair_files(paths, &cli).await?
    };

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Drop repeated inputs so no archive is repaired twice concurrently.
///
/// Paths are compared after canonicalization; a path that cannot be
/// canonicalized (e.g. missing) is compared as given and left for the
/// repair to report.
fn unique_paths(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .iter()
        .cloned()
        .filter(|p| seen.insert(p.canonicalize().unwrap_or_else(|_| p.clone())))
        .collect()
}

/// Report pseudo-encrypted headers without writing anything.
///
/// Returns `true` if any file could not be read.
fn check_files(paths: &[PathBuf], cli: &Cli) -> bool {
    let mut failed = false;

    for path in paths {
        match inspect(path) {
            Ok(report) => {
                if cli.verbose {
                    print_headers(&report);
                }
                let flagged = report.flagged_count();
                if flagged > 0 {
                    if !cli.is_very_quiet() {
                        println!("{}: {} pseudo-encrypted header(s)", path.display(), flagged);
                    }
                } else if !cli.is_quiet() {
                    println!("{}: clean", path.display());
                }
            }
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failed = true;
            }
        }
    }

    failed
}

/// Repair every file concurrently and print the outcomes in input order.
///
/// Returns `true` if any repair failed with a real error.
async fn repair_files(paths: Vec<PathBuf>, cli: &Cli) -> Result<bool> {
    let mut tasks = JoinSet::new();
    for (index, path) in paths.iter().cloned().enumerate() {
        tasks.spawn(async move { (index, repair_async(path).await) });
    }

    let mut results: Vec<(usize, Result<RepairReport, RepairError>)> =
        Vec::with_capacity(paths.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(index, _)| *index);

    let mut failed = false;
    for (path, (_, outcome)) in paths.iter().zip(results) {
        match outcome {
            Ok(report) => {
                if cli.verbose {
                    print_headers(&report.scan);
                }
                if !cli.is_quiet() {
                    println!("{}", report.status_message());
                }
            }
            Err(e) if e.is_informational() => {
                if !cli.is_very_quiet() {
                    println!("{}: {}", display_name(path), e);
                }
            }
            Err(e) => {
                eprintln!("{}: repair failed: {}", display_name(path), e);
                failed = true;
            }
        }
    }

    Ok(failed)
}

/// Print one line per header: kind, offset, flags.
fn print_headers(report: &ScanReport) {
    println!("{:>4}  {:>10}  {:>6}  Status", "Kind", "Offset", "Flags");
    println!("{}", "-".repeat(40));
    for record in &report.records {
        let flags = record
            .flags
            .map(|f| format!("0x{:04x}", f))
            .unwrap_or_else(|| "  --  ".to_string());
        let status = if record.pseudo_encrypted {
            "encrypted"
        } else {
            "ok"
        };
        println!(
            "{:>4}  {:>10}  {}  {}",
            record.kind.short_name(),
            record.offset,
            flags,
            status
        );
    }
    println!("{}", "-".repeat(40));
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
