//! Output formatters for duplicate scan results.
//!
//! - [`text`]: human-readable summary and groups
//! - [`json`]: machine-readable report for scripting
//!
//! # Example
//!
//! ```no_run
//! use dedupe::duplicates::DuplicateFinder;
//! use dedupe::error::ExitCode;
//! use dedupe::output::JsonOutput;
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let output = JsonOutput::new(&report, ExitCode::from_report(&report));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
