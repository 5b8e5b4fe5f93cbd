//! Human-readable report.
//!
//! ```text
//! Scanned 4 files (17 B), 3 candidates, 3 hashed
//! 1 duplicate group(s), 1 duplicate file(s), 5 B reclaimable
//!
//! [2cf24dba5fb0] 5 B x 2
//!   keep a.txt
//!   dup  b.txt
//! ```
//!
//! Skipped entries and truncated directories follow the groups when present.

use std::io::{self, Write};

use crate::duplicates::ScanReport;

/// Length of the digest prefix shown per group.
const SHORT_HASH_LEN: usize = 12;

/// Writes a [`ScanReport`] as plain text.
#[derive(Debug)]
pub struct TextOutput<'a> {
    report: &'a ScanReport,
}

impl<'a> TextOutput<'a> {
    /// Create a text view of `report`.
    #[must_use]
    pub fn new(report: &'a ScanReport) -> Self {
        Self { report }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let summary = &self.report.summary;

        writeln!(
            out,
            "Scanned {} files ({}), {} candidates, {} hashed",
            summary.total_files,
            summary.total_size_display(),
            summary.candidate_files,
            summary.hashed_files
        )?;
        writeln!(
            out,
            "{} duplicate group(s), {} duplicate file(s), {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        )?;

        for group in &self.report.groups {
            let hex = group.digest_hex();
            writeln!(out)?;
            writeln!(
                out,
                "[{}] {} x {}",
                &hex[..SHORT_HASH_LEN],
                bytesize::ByteSize::b(group.size),
                group.len()
            )?;
            writeln!(out, "  keep {}", group.kept.display())?;
            for dup in &group.duplicates {
                writeln!(out, "  dup  {}", dup.display())?;
            }
        }

        if !summary.skipped.is_empty() {
            writeln!(out)?;
            writeln!(out, "Skipped {} entr(ies):", summary.skipped.len())?;
            for err in &summary.skipped {
                writeln!(out, "  {err}")?;
            }
        }

        if !summary.truncated.is_empty() {
            writeln!(out)?;
            writeln!(
                out,
                "Not explored (depth budget reached) {} director(ies):",
                summary.truncated.len()
            )?;
            for dir in &summary.truncated {
                writeln!(out, "  {}", dir.display())?;
            }
        }

        Ok(())
    }
}
