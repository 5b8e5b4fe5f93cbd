//! Layered application settings.
//!
//! Values are merged from lowest to highest priority:
//! 1. Built-in defaults
//! 2. TOML config file (`--config`, or `config.toml` in the platform
//!    config directory)
//! 3. Environment variables prefixed with `DEDUPE_` (e.g. `DEDUPE_IO_THREADS=8`)
//! 4. Command-line flags
//!
//! ```toml
//! max_depth = 10
//! io_threads = 4
//! walk_threads = 4
//! algorithm = "sha256"
//! strict = false
//! progress = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::duplicates::{FinderConfig, DEFAULT_IO_THREADS};
use crate::scanner::{HashAlgorithm, DEFAULT_MAX_DEPTH, DEFAULT_WALK_THREADS};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DEDUPE_";

/// Errors from loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong type.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Effective settings for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Depth budget; the root counts as one level.
    pub max_depth: usize,
    /// Hashing threads.
    pub io_threads: usize,
    /// Traversal threads.
    pub walk_threads: usize,
    /// Content digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Abort on the first walk or hash error.
    pub strict: bool,
    /// Show progress bars.
    pub progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            io_threads: DEFAULT_IO_THREADS,
            walk_threads: DEFAULT_WALK_THREADS,
            algorithm: HashAlgorithm::default(),
            strict: false,
            progress: true,
        }
    }
}

/// Default platform-specific config file location.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dedupe").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Settings {
    /// Merge defaults, the config file and the environment.
    ///
    /// With `config_path = None` the default location is used and a
    /// missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing, a layer fails
    /// to parse, or the merged values are invalid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                log::debug!("Loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = default_config_path() {
                    log::debug!("Looking for config at {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        let settings: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
            .extract()
            .map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(depth) = cli.max_depth {
            self.max_depth = depth;
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = threads;
        }
        if let Some(threads) = cli.walk_threads {
            self.walk_threads = threads;
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if cli.strict {
            self.strict = true;
        }
        if cli.no_progress || cli.quiet {
            self.progress = false;
        }
        self
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a zero depth or thread count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid("io_threads must be at least 1".into()));
        }
        if self.walk_threads == 0 {
            return Err(ConfigError::Invalid(
                "walk_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Finder configuration for these settings.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_max_depth(self.max_depth)
            .with_io_threads(self.io_threads)
            .with_walk_threads(self.walk_threads)
            .with_algorithm(self.algorithm)
            .with_strict(self.strict)
    }
}
