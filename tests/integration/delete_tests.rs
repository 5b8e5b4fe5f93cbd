use super::common::write_file;
use clap::Parser;
use dedupe::actions::{
    delete_batch, Confirm, DeleteConfig, DeletionMode, NoopDeleteCallback, PromptError,
};
use dedupe::cli::Cli;
use dedupe::error::ExitCode;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Answers every prompt the same way and records what it was asked.
struct ScriptedConfirm {
    answer: bool,
    asked: Vec<Vec<PathBuf>>,
}

impl ScriptedConfirm {
    fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, paths: &[PathBuf]) -> Result<bool, PromptError> {
        self.asked.push(paths.to_vec());
        Ok(self.answer)
    }
}

fn setup() -> (TempDir, TempDir) {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"hello");
    write_file(dir.path(), "b.txt", b"hello");
    write_file(dir.path(), "c.txt", b"world");
    write_file(dir.path(), "d.txt", b"hi");

    let cfg = tempdir().unwrap();
    write_file(cfg.path(), "config.toml", b"");
    (dir, cfg)
}

/// Removes every file it is asked about before agreeing, so each deletion
/// that follows fails.
struct VanishingConfirm;

impl Confirm for VanishingConfirm {
    fn confirm(&mut self, paths: &[PathBuf]) -> Result<bool, PromptError> {
        for path in paths {
            fs::remove_file(path)?;
        }
        Ok(true)
    }
}

fn run(
    root: &Path,
    cfg: &Path,
    extra: &[&str],
    confirm: &mut dyn Confirm,
) -> (ExitCode, String) {
    let config = cfg.join("config.toml");
    let mut args = vec![
        "dedupe",
        "--no-progress",
        "--config",
        config.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    args.push(root.to_str().unwrap());

    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let code = dedupe::run_with(&cli, &mut out, confirm).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_dry_run_prints_rm_and_keeps_files() {
    let (dir, cfg) = setup();
    let mut confirm = ScriptedConfirm::new(true);

    let (code, out) = run(dir.path(), cfg.path(), &[], &mut confirm);

    assert_eq!(code, ExitCode::Success);
    let rm_line = |name: &str| format!("rm {}", dir.path().join(name).display());
    assert!(out.contains(&rm_line("b.txt")));
    assert!(!out.contains(&rm_line("a.txt")));
    assert!(confirm.asked.is_empty());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_delete_confirmed_removes_exactly_duplicates() {
    let (dir, cfg) = setup();
    let mut confirm = ScriptedConfirm::new(true);

    let (code, _) = run(dir.path(), cfg.path(), &["--delete"], &mut confirm);

    assert_eq!(code, ExitCode::Success);
    assert_eq!(confirm.asked, vec![vec![dir.path().join("b.txt")]]);
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
    assert!(dir.path().join("c.txt").exists());
    assert!(dir.path().join("d.txt").exists());
}

#[test]
fn test_delete_declined_removes_nothing() {
    let (dir, cfg) = setup();
    let mut confirm = ScriptedConfirm::new(false);

    let (_, out) = run(dir.path(), cfg.path(), &["--delete"], &mut confirm);

    assert_eq!(confirm.asked.len(), 1);
    assert!(dir.path().join("b.txt").exists());
    assert!(!out.contains("removed"));
}

#[test]
fn test_no_duplicates_no_prompt() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "only", b"one");
    let cfg = tempdir().unwrap();
    write_file(cfg.path(), "config.toml", b"");
    let mut confirm = ScriptedConfirm::new(true);

    let (code, _) = run(dir.path(), cfg.path(), &["--delete"], &mut confirm);

    assert_eq!(code, ExitCode::NoDuplicates);
    assert!(confirm.asked.is_empty());
}

#[test]
fn test_json_output_keeps_stdout_clean() {
    let (dir, cfg) = setup();
    let mut confirm = ScriptedConfirm::new(true);

    let (_, out) = run(dir.path(), cfg.path(), &["-o", "json"], &mut confirm);

    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["duplicates"][0].as_str(), Some("b.txt"));
    assert_eq!(parsed["summary"]["exit_code_name"].as_str(), Some("DD000"));
}

#[test]
fn test_json_exit_code_reflects_failed_deletion() {
    let (dir, cfg) = setup();

    let (code, out) = run(
        dir.path(),
        cfg.path(),
        &["--delete", "-o", "json"],
        &mut VanishingConfirm,
    );

    assert_eq!(code, ExitCode::PartialSuccess);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["summary"]["exit_code"].as_i64(), Some(3));
    assert_eq!(parsed["summary"]["exit_code_name"].as_str(), Some("DD003"));
    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_delete_batch_permanent_on_nested_paths() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "keep/x", b"1");
    write_file(dir.path(), "drop/x", b"1");

    let result = delete_batch::<NoopDeleteCallback>(
        dir.path(),
        &[PathBuf::from("drop/x")],
        &DeleteConfig::new(DeletionMode::Permanent),
        None,
    );

    assert!(result.all_succeeded());
    assert_eq!(result.bytes_freed, 1);
    assert!(dir.path().join("keep/x").exists());
    assert!(!dir.path().join("drop/x").exists());
}
