#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use sizetree::cli::Args;
use sizetree::logging;
use sizetree::report::{self, ReportConfig};
use sizetree::tree::{ScanError, Scanner};
use std::io::ErrorKind;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Report written but some entries could not be read.
const EXIT_PARTIAL: u8 = 3;
/// Conventional status for termination by SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    match run_app() {
        Ok(code) => code,
        Err(e) => {
            if matches!(e.downcast_ref::<ScanError>(), Some(ScanError::Cancelled)) {
                eprintln!("sizetree: interrupted");
                return ExitCode::from(EXIT_INTERRUPTED);
            }
            eprintln!("sizetree: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_app() -> Result<ExitCode> {
    let args = Args::parse().validated();
    logging::init(args.verbose, args.quiet);

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        warn!("cannot install interrupt handler: {e}");
    }

    let outcome = Scanner::new().with_cancel_flag(cancel).build(&args.dir)?;
    info!(
        directories = outcome.root.dir_count(),
        bytes = outcome.root.size,
        "scan finished"
    );

    let config = ReportConfig {
        max_depth: args.max_depth,
    };
    let mut stdout = report::buffered_stdout();
    match report::write_report(&mut stdout, &outcome.root, &config) {
        Ok(()) => {}
        // Reader went away (e.g. piped into `head`); the status still
        // reflects the scan.
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
        Err(e) => return Err(e).context("failed to write report"),
    }

    if outcome.is_complete() {
        return Ok(ExitCode::SUCCESS);
    }
    if !args.quiet {
        eprintln!(
            "sizetree: {} entries could not be read, their sizes were counted as 0",
            outcome.issues.len()
        );
    }
    Ok(ExitCode::from(EXIT_PARTIAL))
}
