//! Full-content file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] computes a 32-byte digest of a file's entire content. Bytes
//! are read through a fixed-size buffer and fed incrementally into the
//! digest engine, so memory use does not depend on file size.
//!
//! Two engines are supported:
//! - SHA-256 (default)
//! - BLAKE3
//!
//! Every call to [`Hasher::full_hash`] owns its engine state, so a single
//! `Hasher` can be shared across threads.
//!
//! # Example
//!
//! ```no_run
//! use dedupe::scanner::{digest_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.full_hash(Path::new("some/file.bin")).unwrap();
//! println!("{}", digest_to_hex(&digest));
//! ```

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::HashError;

/// A 32-byte content digest.
pub type Digest = [u8; 32];

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithm used for content hashing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

/// Per-file engine state.
enum Engine {
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl Engine {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(bytes),
            Self::Blake3(h) => {
                h.update(bytes);
            }
        }
    }

    fn finalize(self, path: &Path) -> Result<Digest, HashError> {
        let output: Vec<u8> = match self {
            Self::Sha256(h) => h.finalize().to_vec(),
            Self::Blake3(h) => h.finalize().as_bytes().to_vec(),
        };
        Digest::try_from(output.as_slice()).map_err(|_| HashError::Engine {
            path: path.to_path_buf(),
            message: format!("expected 32-byte digest, engine produced {}", output.len()),
        })
    }
}

/// Streaming file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    buffer_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a SHA-256 hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_algorithm(HashAlgorithm::default())
    }

    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            buffer_size: DEFAULT_BUFFER_SIZE,
            shutdown_flag: None,
        }
    }

    /// Set the read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Set the shutdown flag. Hashing stops between reads once it is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Algorithm used by this hasher.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `PermissionDenied` / `Io` if the file cannot be opened
    ///   or a read fails mid-stream (an interrupted read caused by shutdown
    ///   is reported as `Io` with [`ErrorKind::Interrupted`])
    /// - `Engine` if the digest engine fails
    pub fn full_hash(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file, path)
    }

    /// Hash everything readable from `reader`, attributing errors to `path`.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::full_hash`], minus the open step.
    pub fn hash_reader<R: Read>(&self, mut reader: R, path: &Path) -> Result<Digest, HashError> {
        let mut engine = Engine::new(self.algorithm);
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(ErrorKind::Interrupted, "Shutdown"),
                });
            }

            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            engine.update(&buffer[..n]);
        }

        engine.finalize(path)
    }
}

/// Render a digest as lowercase hexadecimal (64 characters).
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    use std::fmt::Write;

    digest.iter().fold(String::with_capacity(64), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// Parse a 64-character hexadecimal string back into a digest.
#[must_use]
pub fn hex_to_digest(hex: &str) -> Option<Digest> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    let mut digest = [0u8; 32];
    for (i, byte) in digest.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(digest)
}
