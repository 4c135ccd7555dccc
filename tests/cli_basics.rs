use assert_cmd::cargo; // handy crate for testing CLIs
use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git must be installed to run these tests");
    assert!(status.success(), "git {args:?} failed");
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
}

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Usage"))
        .stdout(predicates::str::contains("--model"));
}

#[test]
fn prints_version() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn fails_outside_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.current_dir(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path())
        .arg("--no-model")
        .assert()
        .failure()
        .stderr(predicates::str::contains("not inside a git repository"));
}

#[test]
fn nothing_staged_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.current_dir(dir.path())
        .arg("--no-model")
        .assert()
        .success()
        .stdout(predicates::str::contains("No staged changes"));
}

#[test]
fn rejecting_leaves_history_untouched() {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    git(dir.path(), &["add", "a.txt"]);

    let mut cmd = cargo::cargo_bin_cmd!();
    cmd.current_dir(dir.path())
        .arg("--no-model")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("cancelled"));

    let log = Command::new("git")
        .args(["rev-parse", "--verify", "HEAD"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(!log.status.success(), "no commit should exist");
}

#[test]
fn accepting_creates_the_commit() {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    git(dir.path(), &["add", "a.txt"]);

    let mut cmd = cargo::cargo_bin_cmd!();
    cmd.current_dir(dir.path())
        .arg("--no-model")
        .write_stdin("e\nfeat: add greeting file\ny\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("Successfully committed"));

    let subject = Command::new("git")
        .args(["log", "-1", "--format=%s"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&subject.stdout).trim(), "feat: add greeting file");
}

fn repo_with_staged_file() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    git(dir.path(), &["add", "a.txt"]);
    dir
}

#[test]
fn first_generation_failure_is_reported_once() {
    let dir = repo_with_staged_file();

    let mut cmd = cargo::cargo_bin_cmd!();
    let assert = cmd
        .current_dir(dir.path())
        .args(["--api-base", "http://127.0.0.1:1/v1", "--timeout", "5"])
        .write_stdin("")
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("failed to generate a commit message"), "stderr was: {stderr}");
    assert_eq!(stderr.matches("network error").count(), 1, "stderr was: {stderr}");
    assert!(!stderr.contains("ERROR"), "stderr was: {stderr}");
}

#[cfg(unix)]
#[test]
fn interrupt_at_the_prompt_cancels_without_committing() {
    use std::io::Read;
    use std::process::Stdio;

    let dir = repo_with_staged_file();
    let mut child = Command::new(env!("CARGO_BIN_EXE_ai-commit"))
        .arg("--no-model")
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Keep stdin open so the prompt is still waiting when the signal lands.
    let _stdin = child.stdin.take().unwrap();
    let mut stdout = child.stdout.take().unwrap();
    let mut seen = Vec::new();
    let mut buf = [0u8; 4096];
    while !String::from_utf8_lossy(&seen).contains("Use this message?") {
        let n = stdout.read(&mut buf).unwrap();
        assert!(n > 0, "exited before prompting: {}", String::from_utf8_lossy(&seen));
        seen.extend_from_slice(&buf[..n]);
    }

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    stdout.read_to_end(&mut seen).unwrap();
    let exit = child.wait().unwrap();
    let printed = String::from_utf8_lossy(&seen);

    assert_eq!(exit.code(), Some(0), "stdout was: {printed}");
    assert!(printed.contains("Operation cancelled by user"), "stdout was: {printed}");

    let head = Command::new("git")
        .args(["rev-parse", "--verify", "HEAD"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(!head.status.success(), "no commit should exist");
}
