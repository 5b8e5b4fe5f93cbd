//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based candidate filtering
//! - Full-content hashing on a bounded pool
//! - Digest grouping and selection of removable files
//! - Orchestration of the whole pipeline ([`DuplicateFinder`])

pub mod finder;
pub mod groups;

pub use finder::{
    hash_candidates, DuplicateFinder, FinderConfig, FinderError, HashStats, ScanReport,
    ScanSummary, DEFAULT_IO_THREADS,
};
pub use groups::{
    duplicate_sizes, filter_candidates, find_removable, group_by_digest, DuplicateGroup,
    GroupingStats, SizeIndex,
};
