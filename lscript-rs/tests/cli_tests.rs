//! Run scripts through the `lscript` binary and check stdout, stderr and the
//! exit status.  Each test writes its script into a fresh temp directory and
//! passes `-f` so no user rc file influences the result.

use std::path::Path;
use std::process::{Command, Output};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the binary built by this Cargo workspace.
fn binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_lscript"))
}

fn lscript(args: &[&str], cwd: &Path) -> Output {
    Command::new(binary())
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn lscript binary")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn runs_script_file_and_prints_echo() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("prog.ls"), "set a, 10\nset b, 3\nsub a, b\necho a\n").unwrap();

    let out = lscript(&["-f", "prog.ls"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "7\n");
}

#[test]
fn inline_source() {
    let dir = tempfile::tempdir().unwrap();
    let out = lscript(&["-f", "-c", "set s, 'hi\\x21'\necho s"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "hi!\n");
}

#[test]
fn error_prints_message_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.ls"), "set a, 1\necho a\ninc undefinedVar\n").unwrap();

    let out = lscript(&["-f", "bad.ls"], dir.path());
    assert!(!out.status.success());
    // output produced before the failure is still shown
    assert_eq!(stdout(&out), "1\n");
    let err = stderr(&out);
    assert!(err.starts_with("lscript: runtime error on line 3"), "{err}");
    assert!(err.contains("inc undefinedVar"), "{err}");
}

#[test]
fn dump_vars_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let out = lscript(&["-f", "-v", "-c", "set zed, 'z'\nset abc, [ 'x' ]\nset n, 2.5"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "abc = ['x']\nn = 2.5\nzed = z\n");
}

#[test]
fn explicit_rc_file_changes_comment_marker() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("rc"), "comment = ;\n").unwrap();
    std::fs::write(dir.path().join("prog.ls"), "; a comment\nset a, 1 ; trailing\necho a\n").unwrap();

    let out = lscript(&["-f", "rc", "prog.ls"], dir.path());
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "1\n");
}

#[test]
fn rc_file_in_working_directory_is_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".lscriptrc"), "comment = //\n").unwrap();
    std::fs::write(dir.path().join("prog.ls"), "// header\nset a, 2\necho a\n").unwrap();

    let out = Command::new(binary())
        .arg("prog.ls")
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("LSCRIPTRC")
        .env("XDG_CONFIG_HOME", dir.path().join("no-such-config"))
        .output()
        .expect("spawn");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "2\n");
}

#[test]
fn missing_script_reports_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = lscript(&["-f", "absent.ls"], dir.path());
    assert!(!out.status.success());
    assert!(stderr(&out).contains("cannot load script absent.ls"));
}

#[test]
fn usage_on_bad_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let out = lscript(&[], dir.path());
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Usage:"));
}
