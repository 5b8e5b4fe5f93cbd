use super::common::write_file;
use clap::Parser;
use dedupe::actions::AutoConfirm;
use dedupe::cli::Cli;
use dedupe::duplicates::FinderError;
use dedupe::error::{ExitCode, StructuredError};
use std::path::Path;
use tempfile::tempdir;

fn cli_for(root: &Path, config: &Path, extra: &[&str]) -> Cli {
    let mut args = vec![
        "dedupe",
        "--no-progress",
        "--config",
        config.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    args.push(root.to_str().unwrap());
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_text_report_lists_groups() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"hello");
    write_file(dir.path(), "b.txt", b"hello");
    let config = write_file(dir.path(), "cfg/config.toml", b"");

    let cli = cli_for(dir.path(), &config, &[]);
    let mut out = Vec::new();
    let code = dedupe::run_with(&cli, &mut out, &mut AutoConfirm).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(text.contains("1 duplicate group(s)"));
    assert!(text.contains("  keep a.txt"));
    assert!(text.contains("  dup  b.txt"));
}

#[test]
fn test_config_file_depth_applies() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a", b"same");
    write_file(dir.path(), "sub/b", b"same");
    let cfg = tempdir().unwrap();
    let config = write_file(cfg.path(), "config.toml", b"max_depth = 2\n");

    let cli = cli_for(dir.path(), &config, &[]);
    let mut out = Vec::new();
    let code = dedupe::run_with(&cli, &mut out, &mut AutoConfirm).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
    assert!(String::from_utf8(out).unwrap().contains("  sub\n"));

    // The command line beats the file.
    let cli = cli_for(dir.path(), &config, &["--max-depth", "3"]);
    let mut out = Vec::new();
    let code = dedupe::run_with(&cli, &mut out, &mut AutoConfirm).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_missing_root_error_and_code() {
    let dir = tempdir().unwrap();
    let config = write_file(dir.path(), "config.toml", b"");

    let cli = cli_for(&dir.path().join("missing"), &config, &[]);
    let err = dedupe::run_with(&cli, &mut Vec::new(), &mut AutoConfirm).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<FinderError>(),
        Some(FinderError::PathNotFound(_))
    ));
    let code = ExitCode::from_error(&err);
    assert_eq!(code, ExitCode::GeneralError);

    let structured = StructuredError::new(&err, code);
    assert_eq!(structured.code, "DD001");
    assert!(structured.message.contains("Path not found"));
}

#[test]
fn test_missing_config_file_is_error() {
    let dir = tempdir().unwrap();
    let cli = cli_for(dir.path(), &dir.path().join("nope.toml"), &[]);

    let err = dedupe::run_with(&cli, &mut Vec::new(), &mut AutoConfirm).unwrap_err();
    assert!(format!("{err:#}").contains("Config file not found"));
}
