//! Exit status and output of the `krb-term` and `krb-draw` binaries.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::*;

const TERM: &str = env!("CARGO_BIN_EXE_krb-term");
const DRAW: &str = env!("CARGO_BIN_EXE_krb-draw");

fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("KRB_CELL_WIDTH")
        .env_remove("KRB_CELL_HEIGHT")
        .env_remove("KRB_SCALE")
        .output()
        .unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn assert_usage_failure(output: &Output, bin_name: &str) {
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage:"), "no usage in {stderr:?}");
    assert!(stderr.contains(bin_name), "no program name in {stderr:?}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_argument_exits_with_usage() {
    assert_usage_failure(&run(TERM, &[]), "krb-term");
    assert_usage_failure(&run(DRAW, &[]), "krb-draw");
}

#[test]
fn test_missing_file_exits_with_usage() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.krb");

    for (bin, name) in [(TERM, "krb-term"), (DRAW, "krb-draw")] {
        let output = run(bin, &[path_str(&absent)]);
        assert_usage_failure(&output, name);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.starts_with("error: "), "{stderr:?}");
        assert!(stderr.contains("absent.krb"));
    }
}

#[test]
fn test_undecodable_file_exits_with_usage() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"not a krb document").unwrap();

    for (bin, name) in [(TERM, "krb-term"), (DRAW, "krb-draw")] {
        let output = run(bin, &[path_str(file.path())]);
        assert_usage_failure(&output, name);
        assert!(String::from_utf8_lossy(&output.stderr).contains("magic"));
    }
}

#[test]
fn test_invalid_scale_exits_with_usage() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, &sample().bytes()).unwrap();

    let output = run(DRAW, &[path_str(file.path()), "--scale", "0"]);
    assert_usage_failure(&output, "krb-draw");
}

#[test]
fn test_valid_document_prints_and_succeeds() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, &sample().bytes()).unwrap();
    let path = path_str(file.path());

    let term = run(TERM, &[path, "--plain"]);
    assert_eq!(term.status.code(), Some(0));
    let frame = String::from_utf8_lossy(&term.stdout);
    assert!(frame.contains("Hello"));
    assert!(frame.contains("World"));
    assert!(!frame.contains('\x1b'));

    let ansi = run(TERM, &[path]);
    assert_eq!(ansi.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&ansi.stdout).starts_with("\x1b[?2026h"));

    let draw = run(DRAW, &[path]);
    assert_eq!(draw.status.code(), Some(0));
    let list = String::from_utf8_lossy(&draw.stdout);
    assert_eq!(list.lines().count(), 15);
    assert!(list.contains("text 21 37 20px #FFCC00FF \"Hello\""));
    assert!(draw.stderr.is_empty());
}
