//! Integration tests for the archive-relocate binary.
//!
//! Each test runs the built binary against a temporary config file and a
//! local directory store, so no object store is needed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const SOURCE: &str = "123/5d5892d3-1f74-4ccf-91af-548dfc9767aa/20240101120000-xyz123";
const TARGET: &str = "5d/5d5892d3-1f74-4ccf-91af-548dfc9767aa/202401/01/120000.tar.gz";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.ini"), config).unwrap();
        fs::write(dir.path().join("archive.tgz"), b"payload").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_archive-relocate"))
            .arg("--config")
            .arg(self.path("config.ini"))
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("ARCHIVE_RELOCATE_ACCESS_KEY")
            .env_remove("ARCHIVE_RELOCATE_SECRET_KEY")
            .output()
            .expect("failed to run archive-relocate")
    }

    fn relocate(&self, s3_path: &str, extra: &[&str]) -> Output {
        let file = self.path("archive.tgz");
        let store = self.path("store");
        let mut args = vec![
            "relocate",
            "--s3-path",
            s3_path,
            "--file",
            file.to_str().unwrap(),
            "--local-store",
            store.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_relocate_prints_report_and_stores_archive() {
    let ws = Workspace::new("[storage]\nbucket = archives\n");
    let output = ws.relocate(SOURCE, &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(report["path"], TARGET);
    assert_eq!(report["original_path"], SOURCE);
    assert_eq!(report["metadata"]["external_organization"], "123");

    let stored = ws.path("store").join("archives").join(TARGET);
    assert_eq!(fs::read(stored).unwrap(), b"payload");
}

#[test]
fn test_relocate_with_prefix_and_broker_values() {
    let ws = Workspace::new(
        "[storage]\nbucket = archives\n[archive]\npath_prefix = v2\nname_pattern = $tenant/$cluster_id[:2]/$archive\n",
    );
    let output = ws.relocate(SOURCE, &["--set", "tenant=acme", "--bucket", "other"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(report["path"], "v2/acme/5d/20240101120000-xyz123");
    assert!(ws
        .path("store")
        .join("other/v2/acme/5d/20240101120000-xyz123")
        .is_file());
}

#[test]
fn test_relocate_mismatch_exits_with_failure() {
    let ws = Workspace::new("[storage]\nbucket = archives\n");
    let output = ws.relocate("not/a/valid/path", &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("archive pattern name incorrect: 'not/a/valid/path'"));
    assert!(!ws.path("store").exists());
}

#[test]
fn test_relocate_without_bucket_is_a_config_error() {
    let ws = Workspace::new("");
    let output = ws.relocate(SOURCE, &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("storage.bucket"));
}

#[test]
fn test_invalid_name_pattern_is_rejected() {
    let ws = Workspace::new("[storage]\nbucket = archives\n[archive]\nname_pattern = ${oops\n");
    let output = ws.relocate(SOURCE, &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("archive.name_pattern"));
}

#[test]
fn test_resolve_shows_target() {
    let ws = Workspace::new("");
    let output = ws.run(&["resolve", SOURCE]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("cluster_id 5d5892d3-1f74-4ccf-91af-548dfc9767aa"));
    assert!(out.contains(&format!("target     {}", TARGET)));
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.ini");
    let run = |extra: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_archive-relocate"))
            .arg("--config")
            .arg(&config)
            .arg("init")
            .args(extra)
            .output()
            .unwrap()
    };

    assert!(run(&[]).status.success());
    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("name_pattern = $cluster_id[:2]/$cluster_id/$year$month/$day/$time.tar.gz"));

    let second = run(&[]);
    assert_eq!(second.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&second.stderr).contains("already exists"));

    assert!(run(&["--force"]).status.success());
    assert!(Path::new(&config).is_file());
}
