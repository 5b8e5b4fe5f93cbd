//! Command-line interface definitions for dedupe.
//!
//! This module defines all CLI arguments using the clap derive API.
//! Tuning options are `Option`s so that values not given on the command
//! line fall through to the config file and environment layers.
//!
//! # Example
//!
//! ```bash
//! # Dry run: list what would be removed
//! dedupe ~/Downloads
//!
//! # Remove duplicates after a y/N prompt
//! dedupe --delete ~/Downloads
//!
//! # Move duplicates to the trash without asking
//! dedupe --delete --trash --yes ~/Downloads
//!
//! # JSON report, BLAKE3, shallow scan
//! dedupe -o json --algorithm blake3 --max-depth 3 ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::actions::DeletionMode;
use crate::scanner::HashAlgorithm;

/// Find byte-for-byte duplicate files and remove all but one copy.
///
/// Without --delete nothing is touched: every duplicate is printed as
/// `rm <path>`.
#[derive(Debug, Parser)]
#[command(name = "dedupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Depth budget; the root counts as one level (default: 10)
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub max_depth: Option<usize>,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub io_threads: Option<usize>,

    /// Number of threads for directory traversal (default: 4)
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub walk_threads: Option<usize>,

    /// Content digest algorithm (default: sha256)
    #[arg(long, value_enum, value_name = "ALG")]
    pub algorithm: Option<HashAlgorithm>,

    /// Abort on the first unreadable entry instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Actually delete duplicates (default is a dry run)
    #[arg(long)]
    pub delete: bool,

    /// With --delete, move files to the system trash instead of unlinking
    #[arg(long, requires = "delete")]
    pub trash: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Path to a TOML config file
    ///
    /// If not specified, a default platform-specific path is used.
    #[arg(long, value_name = "FILE", env = "DEDUPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Deletion mode selected by `--delete` and `--trash`.
    #[must_use]
    pub fn deletion_mode(&self) -> DeletionMode {
        DeletionMode::from_flags(self.delete, self.trash)
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary and groups
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a strictly positive integer.
///
/// # Examples
///
/// ```
/// use dedupe::cli::parse_positive;
///
/// assert_eq!(parse_positive("4").unwrap(), 4);
/// assert!(parse_positive("0").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the string is not a number or is zero.
pub fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: '{s}'"))?;
    if n == 0 {
        return Err("Value must be at least 1".to_string());
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_minimal() {
        let cli = Cli::try_parse_from(["dedupe", "/tmp"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("/tmp"));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.max_depth, None);
        assert_eq!(cli.algorithm, None);
        assert_eq!(cli.output, OutputFormat::Text);
        assert_eq!(cli.deletion_mode(), DeletionMode::DryRun);
    }

    #[test]
    fn test_cli_parse_all_options() {
        let cli = Cli::try_parse_from([
            "dedupe",
            "-vv",
            "--max-depth",
            "3",
            "--io-threads",
            "8",
            "--walk-threads",
            "2",
            "--algorithm",
            "blake3",
            "--strict",
            "--delete",
            "--trash",
            "-y",
            "-o",
            "json",
            "--config",
            "/etc/dedupe.toml",
            "--no-progress",
            "--json-errors",
            "/data",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.max_depth, Some(3));
        assert_eq!(cli.io_threads, Some(8));
        assert_eq!(cli.walk_threads, Some(2));
        assert_eq!(cli.algorithm, Some(HashAlgorithm::Blake3));
        assert!(cli.strict);
        assert!(cli.yes);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/dedupe.toml")));
        assert!(cli.no_progress);
        assert!(cli.json_errors);
        assert_eq!(cli.deletion_mode(), DeletionMode::Trash);
    }

    #[test]
    fn test_cli_delete_without_trash_is_permanent() {
        let cli = Cli::try_parse_from(["dedupe", "--delete", "/data"]).unwrap();
        assert_eq!(cli.deletion_mode(), DeletionMode::Permanent);
    }

    #[test]
    fn test_cli_trash_requires_delete() {
        assert!(Cli::try_parse_from(["dedupe", "--trash", "/data"]).is_err());
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["dedupe", "-q", "-v", "/data"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_depth() {
        assert!(Cli::try_parse_from(["dedupe", "--max-depth", "0", "/data"]).is_err());
    }

    #[test]
    fn test_cli_requires_path() {
        assert!(Cli::try_parse_from(["dedupe"]).is_err());
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive(" 12 ").unwrap(), 12);
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-1").is_err());
        assert!(parse_positive("abc").is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
