use super::common::{paths, write_file};
use dedupe::duplicates::{DuplicateFinder, FinderConfig};
use tempfile::tempdir;

fn finder(depth: usize) -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_max_depth(depth))
}

#[test]
fn test_default_budget_reaches_nine_levels() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "top", b"same");
    write_file(dir.path(), "1/2/3/4/5/6/7/8/deep", b"same");

    let report = finder(10).find_duplicates(dir.path()).unwrap();

    // 9 levels below the root: still inside the default budget.
    assert_eq!(report.duplicates, paths(&["top"]));
    assert!(report.summary.truncated.is_empty());
}

#[test]
fn test_default_budget_stops_at_ten_levels() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "top", b"same");
    write_file(dir.path(), "1/2/3/4/5/6/7/8/9/too_deep", b"same");

    let report = finder(10).find_duplicates(dir.path()).unwrap();

    assert!(report.duplicates.is_empty());
    assert_eq!(report.summary.truncated, paths(&["1/2/3/4/5/6/7/8/9"]));
    assert_eq!(report.summary.total_files, 1);
}

#[test]
fn test_budget_one_scans_nothing() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a", b"x");
    write_file(dir.path(), "b", b"x");

    let report = finder(1).find_duplicates(dir.path()).unwrap();

    assert!(report.duplicates.is_empty());
    assert_eq!(report.summary.total_files, 0);
    assert_eq!(report.summary.truncated, paths(&["."]));
}

#[test]
fn test_larger_budget_finds_more() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/file", b"dup");
    write_file(dir.path(), "b/c/file", b"dup");

    let shallow = finder(3).find_duplicates(dir.path()).unwrap();
    assert!(shallow.duplicates.is_empty());
    assert_eq!(shallow.summary.truncated, paths(&["b/c"]));

    let deep = finder(4).find_duplicates(dir.path()).unwrap();
    assert_eq!(deep.duplicates, paths(&["b/c/file"]));
}
