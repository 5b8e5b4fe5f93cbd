//! File deletion for confirmed duplicates.
//!
//! # Overview
//!
//! [`delete_batch`] consumes the ordered list of relative duplicate paths
//! and applies a [`DeletionMode`] to each:
//! - [`DeletionMode::DryRun`] (default): nothing is touched, each file is
//!   reported as `rm <absolute path>`
//! - [`DeletionMode::Permanent`]: `std::fs::remove_file`
//! - [`DeletionMode::Trash`]: move to the system trash (recoverable)
//!
//! The mode is an explicit value handed in by the caller.
//!
//! # Example
//!
//! ```no_run
//! use dedupe::actions::delete::{delete_batch, DeleteConfig, NoopDeleteCallback};
//! use std::path::{Path, PathBuf};
//!
//! let paths = vec![PathBuf::from("b.txt")];
//! let result = delete_batch::<NoopDeleteCallback>(
//!     Path::new("/data"),
//!     &paths,
//!     &DeleteConfig::default(),
//!     None,
//! );
//! println!("{}", result.summary());
//! ```

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How duplicates are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionMode {
    /// Report what would be removed without touching the filesystem.
    #[default]
    DryRun,
    /// Unlink files.
    Permanent,
    /// Move files to the system trash.
    Trash,
}

impl DeletionMode {
    /// Pick the mode from the `--delete` and `--trash` flags.
    #[must_use]
    pub fn from_flags(delete: bool, trash: bool) -> Self {
        match (delete, trash) {
            (false, _) => Self::DryRun,
            (true, false) => Self::Permanent,
            (true, true) => Self::Trash,
        }
    }

    /// Whether this mode modifies the filesystem.
    #[must_use]
    pub fn is_destructive(self) -> bool {
        !matches!(self, Self::DryRun)
    }
}

impl fmt::Display for DeletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DryRun => write!(f, "dry run"),
            Self::Permanent => write!(f, "permanent"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Result of handling one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Absolute path that was handled.
    pub path: PathBuf,
    /// Size of the file in bytes.
    pub size: u64,
    /// Mode that was applied.
    pub mode: DeletionMode,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, mode: DeletionMode) -> Self {
        Self { path, size, mode }
    }

    /// Whether the file was only reported, not removed.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.mode == DeletionMode::DryRun
    }
}

/// Results of a batch deletion operation.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Files handled successfully.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their errors.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes freed (or that would be freed in a dry run).
    pub bytes_freed: u64,
    /// Mode the batch ran in.
    pub mode: DeletionMode,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = bytesize::ByteSize::b(self.bytes_freed);
        let verb = match self.mode {
            DeletionMode::DryRun => "Would delete",
            DeletionMode::Permanent => "Deleted",
            DeletionMode::Trash => "Moved to trash",
        };
        if self.all_succeeded() {
            format!("{verb} {} file(s), {freed}", self.success_count())
        } else {
            format!(
                "{verb} {} file(s), {} failed, {freed}",
                self.success_count(),
                self.failure_count()
            )
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    /// How files are removed.
    pub mode: DeletionMode,
    /// Continue on error (process remaining files even if some fail).
    pub continue_on_error: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            mode: DeletionMode::DryRun,
            continue_on_error: true,
        }
    }
}

impl DeleteConfig {
    /// Create config for the given mode.
    #[must_use]
    pub fn new(mode: DeletionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Enable/disable continue on error.
    #[must_use]
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback: Send + Sync {
    /// Called before each file is handled.
    fn on_before_delete(&self, path: &Path, index: usize, total: usize);

    /// Called after a file was handled.
    fn on_delete_success(&self, result: &DeleteResult);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &str);

    /// Called when batch operation completes.
    fn on_complete(&self, result: &BatchDeleteResult);
}

/// Callback that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDeleteCallback;

impl DeleteProgressCallback for NoopDeleteCallback {
    fn on_before_delete(&self, _: &Path, _: usize, _: usize) {}
    fn on_delete_success(&self, _: &DeleteResult) {}
    fn on_delete_failure(&self, _: &Path, _: &str) {}
    fn on_complete(&self, _: &BatchDeleteResult) {}
}

/// Callback that prints one line per file to a writer.
///
/// Dry-run entries are printed as `rm <path>`, real deletions as
/// `removed <path>` or `trashed <path>`.
pub struct ConsoleReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Reporter writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn line(&self, text: fmt::Arguments<'_>) {
        if let Ok(mut out) = self.out.lock() {
            if let Err(e) = writeln!(out, "{text}") {
                log::debug!("Cannot write deletion report: {}", e);
            }
        }
    }
}

impl<W: Write + Send> DeleteProgressCallback for ConsoleReporter<W> {
    fn on_before_delete(&self, _: &Path, _: usize, _: usize) {}

    fn on_delete_success(&self, result: &DeleteResult) {
        let verb = match result.mode {
            DeletionMode::DryRun => "rm",
            DeletionMode::Permanent => "removed",
            DeletionMode::Trash => "trashed",
        };
        self.line(format_args!("{verb} {}", result.path.display()));
    }

    fn on_delete_failure(&self, path: &Path, error: &str) {
        self.line(format_args!("failed {}: {error}", path.display()));
    }

    fn on_complete(&self, _: &BatchDeleteResult) {}
}

/// Apply `mode` to a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `TrashFailed` if the trash operation fails
/// - `Io` for any other failure
pub fn delete_file(path: &Path, mode: DeletionMode) -> Result<DeleteResult, DeleteError> {
    let size = fs::symlink_metadata(path)
        .map_err(|e| DeleteError::from_io(path, e))?
        .len();

    match mode {
        DeletionMode::DryRun => {
            log::debug!("Dry run: would remove {}", path.display());
        }
        DeletionMode::Permanent => {
            fs::remove_file(path).map_err(|e| {
                log::error!("Delete failed for {}: {}", path.display(), e);
                DeleteError::from_io(path, e)
            })?;
            log::info!("Deleted: {} ({} bytes)", path.display(), size);
        }
        DeletionMode::Trash => {
            trash::delete(path).map_err(|e| {
                log::error!("Trash operation failed for {}: {}", path.display(), e);
                DeleteError::TrashFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?;
            log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
        }
    }

    Ok(DeleteResult::new(path.to_path_buf(), size, mode))
}

/// Delete (or simulate deleting) every path in order.
///
/// Relative paths are resolved against `base`. Failures are logged and
/// collected; processing continues unless `continue_on_error` is false.
pub fn delete_batch<C: DeleteProgressCallback>(
    base: &Path,
    paths: &[PathBuf],
    config: &DeleteConfig,
    callback: Option<&C>,
) -> BatchDeleteResult {
    let mut result = BatchDeleteResult {
        mode: config.mode,
        ..Default::default()
    };
    let total = paths.len();

    log::info!("Processing {} duplicate(s) in {} mode", total, config.mode);

    for (index, relative) in paths.iter().enumerate() {
        let path = base.join(relative);

        if let Some(cb) = callback {
            cb.on_before_delete(&path, index, total);
        }

        match delete_file(&path, config.mode) {
            Ok(del) => {
                result.bytes_freed += del.size;
                if let Some(cb) = callback {
                    cb.on_delete_success(&del);
                }
                result.successes.push(del);
            }
            Err(e) => {
                let error_msg = e.to_string();
                log::warn!("Failed to delete {}: {}", path.display(), error_msg);

                if let Some(cb) = callback {
                    cb.on_delete_failure(&path, &error_msg);
                }

                result.failures.push((path, error_msg));

                if !config.continue_on_error {
                    log::info!("Stopping batch deletion due to error (continue_on_error=false)");
                    break;
                }
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_complete(&result);
    }

    log::info!("{}", result.summary());

    result
}
