use super::common::write_file;
use dedupe::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dedupe::scanner::{HashError, ScanError};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = DuplicateFinder::with_defaults().find_duplicates(&missing);

    match result {
        Err(FinderError::PathNotFound(p)) => assert_eq!(p, missing),
        other => panic!("expected PathNotFound, got {other:?}"),
    }
}

#[test]
fn test_file_root_is_fatal() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "plain.txt", b"x");

    let result = DuplicateFinder::with_defaults().find_duplicates(&file);

    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[test]
fn test_vanished_candidate_is_skipped() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a", b"same");
    write_file(dir.path(), "b", b"same");

    let records = vec![
        dedupe::scanner::FileRecord::new("a", 4),
        dedupe::scanner::FileRecord::new("b", 4),
        dedupe::scanner::FileRecord::new("c", 4),
    ];
    let report = DuplicateFinder::with_defaults()
        .find_duplicates_in_records(dir.path(), records)
        .unwrap();

    assert_eq!(report.duplicates, vec![PathBuf::from("b")]);
    assert!(report.summary.is_partial());
    assert!(matches!(
        &report.summary.skipped[0],
        ScanError::Hash(HashError::NotFound(p)) if p == &dir.path().join("c")
    ));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    /// Root ignores permission bits, in which case these tests prove nothing.
    fn permissions_enforced(path: &std::path::Path) -> bool {
        fs::File::open(path).is_err()
    }

    #[test]
    fn test_unreadable_file_partial_success() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a", b"same");
        write_file(dir.path(), "b", b"same");
        let locked = write_file(dir.path(), "c", b"same");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if !permissions_enforced(&locked) {
            return;
        }

        let report = DuplicateFinder::with_defaults()
            .find_duplicates(dir.path())
            .unwrap();

        assert_eq!(report.duplicates, vec![PathBuf::from("b")]);
        assert_eq!(report.summary.skipped.len(), 1);
        assert!(matches!(
            report.summary.skipped[0],
            ScanError::Hash(HashError::PermissionDenied(_))
        ));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn test_unreadable_file_strict_fails() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a", b"same");
        let locked = write_file(dir.path(), "b", b"same");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if !permissions_enforced(&locked) {
            return;
        }

        let result = DuplicateFinder::new(FinderConfig::default().with_strict(true))
            .find_duplicates(dir.path());

        let Err(FinderError::Scan(err)) = result else {
            panic!("strict scan should fail on the unreadable file");
        };
        assert!(matches!(
            err,
            ScanError::Hash(HashError::PermissionDenied(_))
        ));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn test_unreadable_directory_skipped() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a", b"same");
        write_file(dir.path(), "b", b"same");
        write_file(dir.path(), "locked/inner", b"same");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = DuplicateFinder::with_defaults()
            .find_duplicates(dir.path())
            .unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.duplicates, vec![PathBuf::from("b")]);
        assert!(report.summary.is_partial());
        assert!(report
            .summary
            .skipped
            .iter()
            .any(|e| e.path().ends_with("locked")));
    }
}
