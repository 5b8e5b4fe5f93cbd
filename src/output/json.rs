//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/data",
//!   "duplicates": ["b.txt"],
//!   "groups": [
//!     { "hash": "2cf24d...", "size": 5, "kept": "a.txt", "duplicates": ["b.txt"] }
//!   ],
//!   "truncated": ["deep/dir"],
//!   "skipped": [{ "path": "locked", "error": "Permission denied: locked" }],
//!   "summary": {
//!     "total_files": 4,
//!     "total_size": 17,
//!     "candidate_files": 3,
//!     "hashed_files": 3,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 5,
//!     "scan_duration_ms": 3,
//!     "exit_code": 0,
//!     "exit_code_name": "DD000"
//!   }
//! }
//! ```
//!
//! Paths are relative to `root`, exactly as the pipeline reports them.

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanReport, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::ScanError;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Digest as hexadecimal string (64 characters)
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// The file that is kept
    pub kept: String,
    /// The files that would be removed
    pub duplicates: Vec<String>,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.digest_hex(),
            size: group.size,
            kept: group.kept.to_string_lossy().into_owned(),
            duplicates: group
                .duplicates
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// A skipped entry in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSkipped {
    /// Path that could not be processed
    pub path: String,
    /// Error description
    pub error: String,
}

impl From<&ScanError> for JsonSkipped {
    fn from(err: &ScanError) -> Self {
        Self {
            path: err.path().to_string_lossy().into_owned(),
            error: err.to_string(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files found
    pub total_files: usize,
    /// Total size of all files found in bytes
    pub total_size: u64,
    /// Files sharing their size with another file
    pub candidate_files: usize,
    /// Candidates hashed successfully
    pub hashed_files: usize,
    /// Number of duplicate sets
    pub duplicate_groups: usize,
    /// Number of removable duplicates
    pub duplicate_files: usize,
    /// Space that can be reclaimed (bytes)
    pub reclaimable_space: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            candidate_files: summary.candidate_files,
            hashed_files: summary.hashed_files,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Scan root
    pub root: String,
    /// Flat ordered removal list
    pub duplicates: Vec<String>,
    /// Duplicate sets
    pub groups: Vec<JsonDuplicateGroup>,
    /// Directories cut off by the depth budget
    pub truncated: Vec<String>,
    /// Entries skipped because of errors
    pub skipped: Vec<JsonSkipped>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON view of a report.
    ///
    /// # Example
    ///
    /// ```
    /// use dedupe::duplicates::ScanReport;
    /// use dedupe::error::ExitCode;
    /// use dedupe::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(&ScanReport::default(), ExitCode::NoDuplicates);
    /// assert!(output.duplicates.is_empty());
    /// assert_eq!(output.summary.exit_code, 2);
    /// ```
    #[must_use]
    pub fn new(report: &ScanReport, exit_code: ExitCode) -> Self {
        let lossy = |p: &std::path::PathBuf| p.to_string_lossy().into_owned();
        let summary = &report.summary;
        Self {
            root: report.root.to_string_lossy().into_owned(),
            duplicates: report.duplicates.iter().map(lossy).collect(),
            groups: report.groups.iter().map(JsonDuplicateGroup::from).collect(),
            truncated: summary.truncated.iter().map(lossy).collect(),
            skipped: summary.skipped.iter().map(JsonSkipped::from).collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
