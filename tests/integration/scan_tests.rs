use super::common::{paths, write_file};
use dedupe::duplicates::{DuplicateFinder, FinderConfig};
use dedupe::scanner::{digest_to_hex, HashAlgorithm};
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.duplicates.is_empty());
    assert_eq!(report.summary.total_files, 0);
    assert_eq!(report.summary.hashed_files, 0);
}

#[test]
fn test_scan_unique_sizes_never_hashed() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a", b"1");
    write_file(dir.path(), "b", b"22");
    write_file(dir.path(), "c", b"333");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.duplicates.is_empty());
    assert_eq!(report.summary.total_files, 3);
    assert_eq!(report.summary.candidate_files, 0);
    assert_eq!(report.summary.hashed_files, 0);
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a", b"abcd");
    write_file(dir.path(), "b", b"wxyz");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.duplicates.is_empty());
    assert_eq!(report.summary.hashed_files, 2);
}

#[test]
fn test_scan_hello_world() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"hello");
    write_file(dir.path(), "b.txt", b"hello");
    write_file(dir.path(), "c.txt", b"world");
    write_file(dir.path(), "d.txt", b"hi");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicates, paths(&["b.txt"]));
    assert_eq!(
        report.groups[0].digest_hex(),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn test_scan_n_copies_flags_n_minus_one() {
    let dir = tempdir().unwrap();
    for name in ["c1", "c2", "c3", "c4", "c5"] {
        write_file(dir.path(), name, b"copy");
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicates, paths(&["c2", "c3", "c4", "c5"]));
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].len(), 5);
    assert_eq!(report.summary.reclaimable_space, 16);
}

#[test]
fn test_scan_nested_duplicates() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "photos/2020/img.jpg", b"jpeg bytes");
    write_file(dir.path(), "backup/img.jpg", b"jpeg bytes");
    write_file(dir.path(), "backup/notes.txt", b"notes");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    // "backup/..." sorts first and is kept.
    assert_eq!(report.groups[0].kept.to_str(), Some("backup/img.jpg"));
    assert_eq!(report.duplicates, paths(&["photos/2020/img.jpg"]));
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        let content = (i % 5).to_string();
        write_file(dir.path(), &format!("d{}/f{i}", i % 4), content.as_bytes());
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(8));
    let first = finder.find_duplicates(dir.path()).unwrap();
    let second = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.duplicates, second.duplicates);
    assert_eq!(first.duplicates.len(), 15);
}

#[test]
fn test_scan_thread_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    for i in 0..30 {
        let content = (i % 7).to_string();
        write_file(dir.path(), &format!("f{i:02}"), content.as_bytes());
    }

    let narrow = FinderConfig::default()
        .with_io_threads(1)
        .with_walk_threads(1);
    let wide = FinderConfig::default()
        .with_io_threads(16)
        .with_walk_threads(8);

    let single = DuplicateFinder::new(narrow).find_duplicates(dir.path());
    let many = DuplicateFinder::new(wide).find_duplicates(dir.path());

    assert_eq!(single.unwrap().duplicates, many.unwrap().duplicates);
}

#[test]
fn test_scan_blake3_digest() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a", b"hello");
    write_file(dir.path(), "b", b"hello");

    let config = FinderConfig::default().with_algorithm(HashAlgorithm::Blake3);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(
        report.groups[0].digest_hex(),
        digest_to_hex(blake3::hash(b"hello").as_bytes())
    );
}
