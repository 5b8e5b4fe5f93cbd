//! File actions module.
//!
//! This module is the deletion gateway at the end of the pipeline:
//! - [`prompt`]: asking the user before anything is removed
//! - [`delete`]: dry run, permanent deletion or move to trash
//!
//! ```no_run
//! use dedupe::actions::{delete_batch, AutoConfirm, Confirm, ConsoleReporter, DeleteConfig};
//! use std::path::{Path, PathBuf};
//!
//! let duplicates = vec![PathBuf::from("b.txt")];
//! if AutoConfirm.confirm(&duplicates).unwrap() {
//!     let reporter = ConsoleReporter::stdout();
//!     delete_batch(Path::new("/data"), &duplicates, &DeleteConfig::default(), Some(&reporter));
//! }
//! ```

pub mod delete;
pub mod prompt;

pub use delete::{
    delete_batch, delete_file, BatchDeleteResult, ConsoleReporter, DeleteConfig, DeleteError,
    DeleteProgressCallback, DeleteResult, DeletionMode, NoopDeleteCallback,
};
pub use prompt::{AutoConfirm, Confirm, PromptError, TerminalPrompt};
