//! Directory walker implementation using jwalk for parallel traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree under a depth budget and collecting a [`FileRecord`] for every
//! regular file in scope.
//!
//! # Features
//!
//! - Parallel directory reading on a dedicated, fixed-size rayon pool
//! - Depth budget with observable truncation: directories at the boundary
//!   that still have children are reported instead of silently dropped
//! - Symlinks are never followed
//! - Graceful shutdown via atomic flag
//! - Deterministic output: records are sorted by relative path
//!
//! # Depth budget
//!
//! The root consumes one unit of the budget and each level below it one
//! more, so a file `d` levels below the root is collected iff
//! `d < max_depth`. With `max_depth = 1` nothing below the root is read.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jwalk::{Parallelism, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// A single item produced by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
    /// A regular file within the depth budget.
    File(FileRecord),
    /// A non-empty directory whose children were not read because the
    /// depth budget ran out. The path is relative to the root (`.` for
    /// the root itself).
    Truncated(PathBuf),
}

/// Everything collected by a complete walk.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Regular files, sorted by relative path
    pub records: Vec<FileRecord>,
    /// Directories left unexplored by the depth budget, sorted
    pub truncated: Vec<PathBuf>,
    /// Entries that could not be read and were skipped
    pub errors: Vec<ScanError>,
    /// Whether the walk stopped early because of a shutdown request
    pub interrupted: bool,
}

/// Directory walker for parallel file discovery.
pub struct Walker {
    /// Root path to walk; also the base for relative paths
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given root.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dedupe::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::new(3, 2));
    /// ```
    #[must_use]
    pub fn new(root: &Path, config: WalkerConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            shutdown_flag: None,
            progress_callback: None,
        }
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

    /// Root directory of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Deepest entry depth jwalk should yield (root is depth 0).
    fn boundary_depth(&self) -> usize {
        self.config.max_depth.max(1) - 1
    }

    fn relative(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Walk the tree, yielding files, truncated directories and errors.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; the caller decides whether to abort. Iteration ends
    /// early once the shutdown flag is set.
    pub fn entries(&self) -> impl Iterator<Item = Result<WalkEntry, ScanError>> + '_ {
        let boundary = self.boundary_depth();

        let walk_dir = WalkDir::new(&self.root)
            .max_depth(boundary)
            .follow_links(false)
            .skip_hidden(false)
            .sort(true)
            .parallelism(Parallelism::RayonNewPool(self.config.threads.max(1)));

        let mut files_seen = 0usize;

        walk_dir
            .into_iter()
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(mut entry) => {
                    let path = entry.path();
                    let file_type = entry.file_type;

                    if file_type.is_dir() {
                        if let Some(err) = entry.read_children_error.take() {
                            return Some(Err(self.handle_jwalk_error(path, err)));
                        }
                        if entry.depth == boundary && has_children(&path) {
                            let rel = self.relative(&path);
                            log::warn!(
                                "Depth budget {} reached, not descending into {}",
                                self.config.max_depth,
                                rel.display()
                            );
                            return Some(Ok(WalkEntry::Truncated(rel)));
                        }
                        return None;
                    }

                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    let metadata = match fs::symlink_metadata(&path) {
                        Ok(m) => m,
                        Err(e) => return Some(Err(self.handle_io_error(&path, e))),
                    };

                    if !metadata.is_file() {
                        log::trace!("Skipping non-regular file: {}", path.display());
                        return None;
                    }

                    files_seen += 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback.on_progress(files_seen, path.to_string_lossy().as_ref());
                    }

                    Some(Ok(WalkEntry::File(FileRecord::new(
                        self.relative(&path),
                        metadata.len(),
                    ))))
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(Err(self.handle_jwalk_error(path, e)))
                }
            })
    }

    /// Walk the whole tree and collect the results.
    ///
    /// Records and truncated directories are sorted by relative path, so
    /// the outcome does not depend on traversal scheduling.
    #[must_use]
    pub fn walk(&self) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        // jwalk can report an unreadable directory both on the entry and as
        // an iterator error.
        let mut error_paths = HashSet::new();

        for result in self.entries() {
            match result {
                Ok(WalkEntry::File(record)) => outcome.records.push(record),
                Ok(WalkEntry::Truncated(dir)) => outcome.truncated.push(dir),
                Err(e) => {
                    if error_paths.insert(e.path().to_path_buf()) {
                        outcome.errors.push(e);
                    }
                }
            }
        }

        outcome.interrupted = self.is_shutdown_requested();
        outcome
            .records
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        outcome.truncated.sort();

        log::debug!(
            "Walk of {} complete: {} files, {} truncated, {} errors",
            self.root.display(),
            outcome.records.len(),
            outcome.truncated.len(),
            outcome.errors.len()
        );

        outcome
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        match error.kind() {
            std::io::ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
            }
            _ => log::warn!("Cannot stat {}: {}", path.display(), error),
        }
        ScanError::from_io(path, error)
    }

    /// Handle jwalk errors, keeping the I/O error kind where available.
    fn handle_jwalk_error(&self, path: PathBuf, error: jwalk::Error) -> ScanError {
        log::warn!("Walker error for {}: {}", path.display(), error);
        match error.io_error().map(std::io::Error::kind) {
            Some(std::io::ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
            Some(std::io::ErrorKind::NotFound) => ScanError::NotFound(path),
            _ => ScanError::Io {
                path,
                source: std::io::Error::other(error.to_string()),
            },
        }
    }
}

/// Whether a directory has at least one entry.
fn has_children(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut it) => it.next().is_some(),
        Err(e) => {
            log::debug!("Cannot inspect {}: {}", dir.display(), e);
            false
        }
    }
}
