//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Depth-bounded parallel directory walking using jwalk
//! - Streaming content hashing with SHA-256 or BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Full-content file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dedupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let outcome = walker.walk();
//! for record in &outcome.records {
//!     println!("{}: {} bytes", record.relative_path.display(), record.size);
//! }
//! for dir in &outcome.truncated {
//!     eprintln!("not explored (depth budget): {}", dir.display());
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

pub use hasher::{digest_to_hex, hex_to_digest, Digest, HashAlgorithm, Hasher};
pub use walker::{WalkEntry, WalkOutcome, Walker};

/// Default depth budget for directory traversal.
///
/// The root consumes one unit, so with the default files up to nine
/// directory levels below the root are collected.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default number of traversal worker threads.
pub const DEFAULT_WALK_THREADS: usize = 4;

/// A regular file discovered by the walker.
///
/// The path is relative to the scan root, which is also the base every
/// later stage resolves paths against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Create a new FileRecord.
    #[must_use]
    pub fn new(relative_path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            relative_path: relative_path.into(),
            size,
        }
    }

    /// Resolve this record against a base directory.
    #[must_use]
    pub fn resolve(&self, base: &Path) -> PathBuf {
        base.join(&self.relative_path)
    }
}

/// A [`FileRecord`] together with the digest of its full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedFileRecord {
    /// The record that was hashed
    pub record: FileRecord,
    /// Digest of the file content
    pub digest: Digest,
}

impl HashedFileRecord {
    /// Create a new hashed record.
    #[must_use]
    pub fn new(record: FileRecord, digest: Digest) -> Self {
        Self { record, digest }
    }

    /// Relative path of the underlying file.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.record.relative_path
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Depth budget. The root counts as one level; a file `d` levels below
    /// the root is collected iff `d < max_depth`.
    pub max_depth: usize,

    /// Number of threads in the traversal pool.
    pub threads: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            threads: DEFAULT_WALK_THREADS,
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// Both values are clamped to at least 1.
    #[must_use]
    pub fn new(max_depth: usize, threads: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
            threads: threads.max(1),
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A candidate file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Classify an I/O error for a path into the matching variant.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::Io { path, .. } => path,
            Self::Hash(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The digest engine failed to produce a digest.
    #[error("Hash engine error for {path}: {message}")]
    Engine {
        /// Path being hashed
        path: PathBuf,
        /// Description of the failure
        message: String,
    },
}

impl HashError {
    /// Classify an I/O error for a path into the matching variant.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } | Self::Engine { path, .. } => path,
        }
    }

    /// Whether this error was caused by a shutdown request.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::Interrupted)
    }
}
