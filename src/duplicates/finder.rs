//! Duplicate finder: the walk → size → hash → group pipeline.
//!
//! # Overview
//!
//! This module orchestrates duplicate detection:
//! 1. **Walk**: collect [`FileRecord`]s under the root within the depth budget
//! 2. **Size grouping**: keep files whose size is shared (see [`super::groups`])
//! 3. **Hashing**: digest every candidate on a bounded thread pool
//! 4. **Hash grouping**: flag every file whose digest was already seen
//!
//! Each stage fully completes before the next begins.
//!
//! # Ordering
//!
//! Records leave the walker sorted by relative path and hashing preserves
//! input order, so the kept file of every duplicate set is the one with the
//! lexicographically smallest relative path, and repeated runs over an
//! unchanged tree return the same list.
//!
//! # Error policy
//!
//! With `strict = false` (the default) unreadable entries and files that
//! fail to hash are skipped, logged and listed in [`ScanSummary::skipped`].
//! With `strict = true` the first such error aborts the scan. A missing root
//! or a root that is not a directory always aborts.
//!
//! # Example
//!
//! ```no_run
//! use dedupe::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_max_depth(5));
//! let report = finder.find_duplicates(Path::new(".")).unwrap();
//! for path in &report.duplicates {
//!     println!("duplicate: {}", path.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::groups::{duplicate_sizes, filter_candidates, find_removable, group_by_digest};
use super::DuplicateGroup;
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{
    FileRecord, HashAlgorithm, HashError, HashedFileRecord, Hasher, ScanError, Walker,
    WalkerConfig, DEFAULT_MAX_DEPTH, DEFAULT_WALK_THREADS,
};

/// Default number of hashing threads.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Threshold for logging large files.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024; // 100MB

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Depth budget for traversal.
    pub max_depth: usize,
    /// Number of traversal threads.
    pub walk_threads: usize,
    /// Number of I/O threads for parallel hashing.
    pub io_threads: usize,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Fail-fast on any walk or hash error.
    pub strict: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("max_depth", &self.max_depth)
            .field("walk_threads", &self.walk_threads)
            .field("io_threads", &self.io_threads)
            .field("algorithm", &self.algorithm)
            .field("strict", &self.strict)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            walk_threads: DEFAULT_WALK_THREADS,
            io_threads: DEFAULT_IO_THREADS,
            algorithm: HashAlgorithm::default(),
            strict: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the depth budget (minimum 1).
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Set the number of traversal threads.
    #[must_use]
    pub fn with_walk_threads(mut self, threads: usize) -> Self {
        self.walk_threads = threads.max(1);
        self
    }

    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set fail-fast on any error.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.max_depth, self.walk_threads)
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files found by the walk
    pub total_files: usize,
    /// Total size of all files found, in bytes
    pub total_size: u64,
    /// Files whose size is shared by another file
    pub candidate_files: usize,
    /// Candidates successfully hashed
    pub hashed_files: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Number of duplicate sets
    pub duplicate_groups: usize,
    /// Number of removable duplicates (excluding kept files)
    pub duplicate_files: usize,
    /// Space freed by removing every duplicate
    pub reclaimable_space: u64,
    /// Directories not explored because the depth budget ran out
    pub truncated: Vec<PathBuf>,
    /// Entries skipped because of walk or hash errors
    pub skipped: Vec<ScanError>,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Whether any entry was skipped.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }
}

/// Result of a complete scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Root the relative paths are based on
    pub root: PathBuf,
    /// Relative paths to remove, in discovery order
    pub duplicates: Vec<PathBuf>,
    /// The same duplicates grouped by digest, with the kept file
    pub groups: Vec<DuplicateGroup>,
    /// Statistics
    pub summary: ScanSummary,
}

impl ScanReport {
    /// Absolute (root-joined) paths of every duplicate.
    #[must_use]
    pub fn resolved_duplicates(&self) -> Vec<PathBuf> {
        self.duplicates.iter().map(|p| self.root.join(p)).collect()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A walk or hash error in strict mode.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Statistics from the hashing stage.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Files that entered the stage
    pub input_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Bytes read
    pub bytes_hashed: u64,
    /// Files that failed to hash
    pub errors: Vec<HashError>,
    /// Whether the stage was cut short by shutdown
    pub interrupted: bool,
}

/// Hash every candidate on a pool of `io_threads` workers.
///
/// Paths are resolved against `base`. The returned records keep the input
/// order; failed files are left out and reported in [`HashStats::errors`].
#[must_use]
pub fn hash_candidates(
    base: &Path,
    candidates: Vec<FileRecord>,
    hasher: &Hasher,
    io_threads: usize,
    progress: Option<&Arc<dyn ProgressCallback>>,
) -> (Vec<HashedFileRecord>, HashStats) {
    let mut stats = HashStats {
        input_files: candidates.len(),
        ..Default::default()
    };

    if candidates.is_empty() {
        log::debug!("Hashing: No files to process");
        return (Vec::new(), stats);
    }

    if let Some(callback) = progress {
        callback.on_phase_start(PHASE_HASHING, candidates.len());
    }

    log::info!(
        "Hashing {} candidate files with {} ({} threads)",
        candidates.len(),
        hasher.algorithm(),
        io_threads
    );

    let hash_one = |(idx, record): (usize, FileRecord)| {
        let path = record.resolve(base);

        if record.size > LARGE_FILE_THRESHOLD {
            log::debug!(
                "Hashing large file ({} MB): {}",
                record.size / (1024 * 1024),
                path.display()
            );
        }

        let result = hasher.full_hash(&path);

        if let Some(callback) = progress {
            callback.on_progress(idx + 1, path.to_string_lossy().as_ref());
            if result.is_ok() {
                callback.on_item_completed(record.size);
            }
        }

        (record, result)
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(io_threads.max(1))
        .build();
    let results: Vec<(FileRecord, Result<_, HashError>)> = match pool {
        Ok(pool) => pool.install(|| {
            candidates
                .into_par_iter()
                .enumerate()
                .map(hash_one)
                .collect()
        }),
        Err(e) => {
            log::warn!(
                "Failed to create hashing pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            candidates
                .into_par_iter()
                .enumerate()
                .map(hash_one)
                .collect()
        }
    };

    let mut hashed = Vec::with_capacity(results.len());
    for (record, result) in results {
        match result {
            Ok(digest) => {
                stats.hashed_files += 1;
                stats.bytes_hashed += record.size;
                log::trace!("Hashed: {}", record.relative_path.display());
                hashed.push(HashedFileRecord::new(record, digest));
            }
            Err(e) if e.is_interrupted() => stats.interrupted = true,
            Err(e) => {
                log::warn!("Failed to hash {}: {}", record.relative_path.display(), e);
                stats.errors.push(e);
            }
        }
    }

    if let Some(callback) = progress {
        callback.on_phase_end(PHASE_HASHING);
    }

    (hashed, stats)
}

/// Strict mode turns the first error into the scan's failure; otherwise
/// every error is logged and handed back as a skipped entry.
fn apply_error_policy(
    strict: bool,
    errors: Vec<ScanError>,
) -> Result<Vec<ScanError>, FinderError> {
    if strict {
        return match errors.into_iter().next() {
            Some(first) => Err(FinderError::Scan(first)),
            None => Ok(Vec::new()),
        };
    }
    for e in &errors {
        log::warn!("Skipped: {}", e);
    }
    Ok(errors)
}

/// Duplicate finder that orchestrates the detection pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::with_algorithm(config.algorithm);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(Arc::clone(flag));
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find all duplicate files under `root`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The root does not exist or is not a directory
    /// - The scan is interrupted by shutdown signal
    /// - Any entry fails in strict mode
    pub fn find_duplicates(&self, root: &Path) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();

        if !root.exists() {
            return Err(FinderError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.to_path_buf()));
        }

        log::info!(
            "Starting duplicate scan of {} (depth budget {})",
            root.display(),
            self.config.max_depth
        );

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let mut walker = Walker::new(root, self.config.walker_config());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(Arc::clone(callback));
        }

        let outcome = walker.walk();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }

        if outcome.interrupted || self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut skipped = apply_error_policy(self.config.strict, outcome.errors)?;

        if !outcome.truncated.is_empty() {
            let count = outcome.truncated.len();
            log::warn!(
                "{} director{} not explored because the depth budget ({}) was reached",
                count,
                if count == 1 { "y" } else { "ies" },
                self.config.max_depth
            );
        }

        let mut report = self.find_duplicates_in_records(root, outcome.records)?;
        report.summary.truncated = outcome.truncated;
        skipped.append(&mut report.summary.skipped);
        report.summary.skipped = skipped;
        report.summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            report.summary.duplicate_groups,
            report.summary.duplicate_files,
            report.summary.reclaimable_display()
        );

        Ok(report)
    }

    /// Run the size, hash and grouping stages over pre-collected records.
    ///
    /// Records are processed in the order given; `base` is the directory
    /// their relative paths are resolved against.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::Interrupted` on shutdown, or the first hash
    /// error in strict mode.
    pub fn find_duplicates_in_records(
        &self,
        base: &Path,
        records: Vec<FileRecord>,
    ) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        let sizes = duplicate_sizes(&records);
        let (candidates, size_stats) = filter_candidates(records, &sizes);
        summary.total_files = size_stats.total_files;
        summary.total_size = size_stats.total_size;
        summary.candidate_files = size_stats.candidates;

        log::info!(
            "Found {} files ({})",
            summary.total_files,
            summary.total_size_display()
        );

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if candidates.is_empty() {
            log::info!("No potential duplicates found after size grouping");
            summary.scan_duration = start_time.elapsed();
            return Ok(ScanReport {
                root: base.to_path_buf(),
                summary,
                ..Default::default()
            });
        }

        let (hashed, hash_stats) = hash_candidates(
            base,
            candidates,
            &self.hasher,
            self.config.io_threads,
            self.config.progress_callback.as_ref(),
        );

        if hash_stats.interrupted || self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let hash_errors = hash_stats.errors.into_iter().map(ScanError::from).collect();
        summary.skipped = apply_error_policy(self.config.strict, hash_errors)?;

        summary.hashed_files = hash_stats.hashed_files;
        summary.bytes_hashed = hash_stats.bytes_hashed;

        let duplicates = find_removable(&hashed);
        let groups = group_by_digest(&hashed);

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = duplicates.len();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        Ok(ScanReport {
            root: base.to_path_buf(),
            duplicates,
            groups,
            summary,
        })
    }
}
