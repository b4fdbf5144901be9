use super::*;
use crate::error::Error;
use std::path::PathBuf;

fn temp_workspace(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("mender_test_tools_{}", std::process::id()))
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn run_captures_stdout() {
    let output = run_command("echo hello", 5).await.unwrap();
    assert_eq!(output, "hello");
}

#[tokio::test]
async fn run_reports_exit_code() {
    let output = run_command("echo oops >&2; exit 3", 5).await.unwrap();
    assert!(output.contains("oops"));
    assert!(output.contains("exit code: 3"));
}

#[tokio::test]
async fn run_times_out_and_discards_output() {
    let err = run_command("echo partial; sleep 5", 1).await.unwrap_err();
    assert!(matches!(err, Error::Timeout(1)));
}

#[test]
fn cap_output_truncates_at_a_utf8_boundary() {
    let long = "é".repeat(crate::constants::RUN_MAX_OUTPUT_SIZE);
    let capped = run::cap_output(&long);
    assert!(capped.contains("output truncated"));
    assert!(capped.len() < long.len());
}

#[test]
fn scan_lists_dirs_first_sorted() {
    let dir = temp_workspace("scan");
    std::fs::create_dir(dir.join("zeta")).unwrap();
    std::fs::create_dir(dir.join("alpha")).unwrap();
    std::fs::write(dir.join("b.txt"), "b").unwrap();
    std::fs::write(dir.join("a.txt"), "a").unwrap();

    let output = scan_dir(dir.to_str().unwrap()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, ["alpha/", "zeta/", "a.txt", "b.txt"]);
}

#[test]
fn scan_missing_directory_is_not_found() {
    let err = scan_dir("/nonexistent/mender/scan/dir").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn scan_caps_entry_count() {
    let dir = temp_workspace("scan_cap");
    for i in 0..crate::constants::SCAN_MAX_ENTRIES + 10 {
        std::fs::write(dir.join(format!("f{i:04}.txt")), "x").unwrap();
    }
    let output = scan_dir(dir.to_str().unwrap()).unwrap();
    assert_eq!(
        output.lines().count(),
        crate::constants::SCAN_MAX_ENTRIES + 1
    );
    assert!(output.ends_with("... (+10 more)"));
}

#[test]
fn search_reports_path_line_and_content() {
    let dir = temp_workspace("search");
    std::fs::write(dir.join("code.py"), "def alpha():\n    return 1\n").unwrap();
    std::fs::write(dir.join("notes.txt"), "alpha is first\n").unwrap();

    let matches = search_files("alpha", &dir, None).unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().any(|m| m.starts_with("code.py:1:")));
}

#[test]
fn search_honors_include_filter() {
    let dir = temp_workspace("search_include");
    std::fs::write(dir.join("code.py"), "needle\n").unwrap();
    std::fs::write(dir.join("notes.txt"), "needle\n").unwrap();

    let matches = search_files("needle", &dir, Some("*.py")).unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].starts_with("code.py:"));
}

#[test]
fn search_skips_binary_files() {
    let dir = temp_workspace("search_binary");
    std::fs::write(dir.join("blob.bin"), b"needle\x00needle").unwrap();

    let matches = search_files("needle", &dir, None).unwrap();
    assert!(matches.is_empty());
}

#[test]
fn search_rejects_invalid_regex() {
    let dir = temp_workspace("search_regex");
    let err = search_files("[invalid", &dir, None).unwrap_err();
    assert!(matches!(err, Error::Syntax(_)));
}
