//! dedupe - byte-for-byte duplicate file finder
//!
//! Walks a directory tree under a depth budget, narrows candidates by size,
//! hashes them (SHA-256 or BLAKE3) on a bounded pool and reports every file
//! whose content was already seen. Duplicates can then be removed, moved to
//! the trash, or (by default) only listed.
//!
//! The pipeline lives in [`duplicates::DuplicateFinder`]; [`run_app`] is the
//! binary's entry point.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{
    delete_batch, AutoConfirm, Confirm, ConsoleReporter, DeleteConfig, DeletionMode, TerminalPrompt,
};
use crate::cli::{Cli, OutputFormat};
use crate::config::Settings;
use crate::duplicates::{DuplicateFinder, FinderError, ScanReport};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};
use crate::signal::ShutdownHandler;

/// Run the application with stdout for reports and the terminal prompt
/// (or auto-confirm with `--yes`).
///
/// # Errors
///
/// Returns an error for invalid configuration, an unusable root, an
/// interrupted scan, a strict-mode failure, or an unanswerable prompt.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let mut stdout = io::stdout();
    if cli.yes {
        run_with(&cli, &mut stdout, &mut AutoConfirm)
    } else {
        run_with(&cli, &mut stdout, &mut TerminalPrompt)
    }
}

/// Run a scan and the deletion step, writing the report to `out`.
///
/// Logging is not initialized here.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with<W: Write + Send>(
    cli: &Cli,
    out: &mut W,
    confirm: &mut dyn Confirm,
) -> Result<ExitCode> {
    let settings = Settings::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_cli(cli);
    settings.validate()?;
    log::debug!("Effective settings: {:?}", settings);

    let shutdown = signal::install_handler()?;

    let mut finder_config = settings.finder_config().with_shutdown_flag(shutdown.flag());
    if settings.progress {
        let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(false));
        finder_config = finder_config.with_progress_callback(progress);
    }

    // Removal lines and prompts show absolute paths.
    let root = std::path::absolute(&cli.path).unwrap_or_else(|_| cli.path.clone());
    let report = DuplicateFinder::new(finder_config)
        .find_duplicates(&root)
        .with_context(|| format!("Scan of {} failed", cli.path.display()))?;

    // The text report precedes the prompt; the JSON document waits for
    // the final exit code.
    if cli.output == OutputFormat::Text {
        TextOutput::new(&report).write_to(out)?;
    }

    let exit_code = offer_removal(cli, &report, &shutdown, out, confirm)?;

    if cli.output == OutputFormat::Json {
        JsonOutput::new(&report, exit_code).write_to(out, true)?;
    }
    Ok(exit_code)
}

/// Confirm and run the deletion step, returning the final exit code.
fn offer_removal<W: Write + Send>(
    cli: &Cli,
    report: &ScanReport,
    shutdown: &ShutdownHandler,
    out: &mut W,
    confirm: &mut dyn Confirm,
) -> Result<ExitCode> {
    let exit_code = ExitCode::from_report(report);
    if report.duplicates.is_empty() {
        return Ok(exit_code);
    }

    if shutdown.is_shutdown_requested() {
        return Err(FinderError::Interrupted.into());
    }

    let mode = cli.deletion_mode();
    if mode.is_destructive() {
        let targets = report.resolved_duplicates();
        if !confirm.confirm(&targets)? {
            log::info!("Deletion declined, nothing removed");
            return Ok(exit_code);
        }
        if shutdown.is_shutdown_requested() {
            return Err(FinderError::Interrupted.into());
        }
    }

    // JSON stays machine-readable on stdout.
    let all_succeeded = match cli.output {
        OutputFormat::Text => remove_duplicates(report, mode, &ConsoleReporter::new(&mut *out)),
        OutputFormat::Json => remove_duplicates(report, mode, &ConsoleReporter::new(io::stderr())),
    };

    if all_succeeded {
        Ok(exit_code)
    } else {
        Ok(ExitCode::PartialSuccess)
    }
}

fn remove_duplicates<W: Write + Send>(
    report: &ScanReport,
    mode: DeletionMode,
    reporter: &ConsoleReporter<W>,
) -> bool {
    let result = delete_batch(
        &report.root,
        &report.duplicates,
        &DeleteConfig::new(mode),
        Some(reporter),
    );
    if mode.is_destructive() {
        eprintln!("{}", result.summary());
    }
    result.all_succeeded()
}
