//! Size-based candidate filtering and digest-based grouping.
//!
//! # Overview
//!
//! The two pure stages of the pipeline live here:
//!
//! - **Size grouping**: [`duplicate_sizes`] builds the set of sizes shared
//!   by two or more files, and [`filter_candidates`] keeps the records whose
//!   size is in that set. Files with a unique size can never be duplicates
//!   and are never hashed. Size 0 is treated like any other size.
//! - **Hash grouping**: [`find_removable`] walks hashed records in order and
//!   returns every record whose digest was already seen. The first record
//!   for each digest is the one kept. [`group_by_digest`] builds the
//!   reporting view ([`DuplicateGroup`]) over the same input.
//!
//! # Example
//!
//! ```
//! use dedupe::duplicates::{duplicate_sizes, filter_candidates};
//! use dedupe::scanner::FileRecord;
//!
//! let files = vec![
//!     FileRecord::new("a.txt", 5),
//!     FileRecord::new("b.txt", 5),
//!     FileRecord::new("d.txt", 2),
//! ];
//!
//! let sizes = duplicate_sizes(&files);
//! assert!(sizes.contains(&5));
//! assert!(!sizes.contains(&2));
//!
//! let (candidates, stats) = filter_candidates(files, &sizes);
//! assert_eq!(candidates.len(), 2);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::scanner::{digest_to_hex, Digest, FileRecord, HashedFileRecord};

/// Sizes that occur more than once across a set of records.
pub type SizeIndex = HashSet<u64>;

/// Compute the set of sizes shared by at least two records.
#[must_use]
pub fn duplicate_sizes(records: &[FileRecord]) -> SizeIndex {
    let mut seen = HashSet::with_capacity(records.len());
    let mut shared = SizeIndex::new();

    for record in records {
        if !seen.insert(record.size) {
            shared.insert(record.size);
        }
    }

    shared
}

/// Statistics from size grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of records processed
    pub total_files: usize,
    /// Total size of all records in bytes
    pub total_size: u64,
    /// Number of distinct sizes shared by 2+ files
    pub shared_sizes: usize,
    /// Number of records kept as duplicate candidates
    pub candidates: usize,
    /// Number of records dropped because their size is unique
    pub eliminated_unique: usize,
    /// Number of empty files among the candidates
    pub empty_candidates: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Keep only the records whose size is in `sizes`, preserving input order.
#[must_use]
pub fn filter_candidates(
    records: impl IntoIterator<Item = FileRecord>,
    sizes: &SizeIndex,
) -> (Vec<FileRecord>, GroupingStats) {
    let mut stats = GroupingStats {
        shared_sizes: sizes.len(),
        ..Default::default()
    };

    let candidates: Vec<FileRecord> = records
        .into_iter()
        .filter(|record| {
            stats.total_files += 1;
            stats.total_size += record.size;
            if sizes.contains(&record.size) {
                stats.candidates += 1;
                if record.size == 0 {
                    stats.empty_candidates += 1;
                }
                true
            } else {
                stats.eliminated_unique += 1;
                log::trace!(
                    "Eliminated unique size {}: {}",
                    record.size,
                    record.relative_path.display()
                );
                false
            }
        })
        .collect();

    log::info!(
        "Size grouping: {} files → {} candidates ({:.1}% eliminated)",
        stats.total_files,
        stats.candidates,
        stats.elimination_rate()
    );

    (candidates, stats)
}

/// Return the relative paths of all removable duplicates, in encounter order.
///
/// The first record carrying a digest is kept; every later record with
/// the same digest is appended to the result.
///
/// # Example
///
/// ```
/// use dedupe::duplicates::find_removable;
/// use dedupe::scanner::{FileRecord, HashedFileRecord};
/// use std::path::PathBuf;
///
/// let hashed = vec![
///     HashedFileRecord::new(FileRecord::new("a.txt", 5), [1; 32]),
///     HashedFileRecord::new(FileRecord::new("b.txt", 5), [1; 32]),
///     HashedFileRecord::new(FileRecord::new("c.txt", 5), [2; 32]),
/// ];
///
/// assert_eq!(find_removable(&hashed), vec![PathBuf::from("b.txt")]);
/// ```
#[must_use]
pub fn find_removable(records: &[HashedFileRecord]) -> Vec<PathBuf> {
    let mut seen: HashSet<Digest> = HashSet::with_capacity(records.len());

    records
        .iter()
        .filter(|r| !seen.insert(r.digest))
        .map(|r| r.record.relative_path.clone())
        .collect()
}

/// A confirmed set of identical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by every file in the group
    pub digest: Digest,
    /// File size in bytes
    pub size: u64,
    /// The first-seen file, which is kept
    pub kept: PathBuf,
    /// Later files with the same digest, in encounter order
    pub duplicates: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of files in this group, including the kept one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.duplicates.len() + 1
    }

    /// Groups always contain the kept file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bytes freed by removing every duplicate.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicates.len() as u64
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }
}

/// Build duplicate groups from hashed records.
///
/// Groups are ordered by the position of their kept file in the input.
/// Digests seen only once produce no group.
#[must_use]
pub fn group_by_digest(records: &[HashedFileRecord]) -> Vec<DuplicateGroup> {
    let mut index: HashMap<Digest, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for r in records {
        match index.get(&r.digest) {
            Some(&i) => groups[i].duplicates.push(r.record.relative_path.clone()),
            None => {
                index.insert(r.digest, groups.len());
                groups.push(DuplicateGroup {
                    digest: r.digest,
                    size: r.record.size,
                    kept: r.record.relative_path.clone(),
                    duplicates: Vec::new(),
                });
            }
        }
    }

    groups.retain(|g| !g.duplicates.is_empty());

    for group in &groups {
        log::debug!(
            "Duplicate group {}: {} files, {} bytes each",
            group.digest_hex(),
            group.len(),
            group.size
        );
    }

    groups
}
