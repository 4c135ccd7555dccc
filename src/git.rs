use crate::error::{CommitError, GitError};
use std::io::{ErrorKind, Write};
use std::process::{Command as GitCommand, Stdio};

/// Raw `git diff --cached` output for one session. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDiff(String);

impl StagedDiff {
    /// Wrap diff text; whitespace-only input means nothing is staged.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(StagedDiff(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outcome of the final commit: git's own summary on success.
pub type CommitResult = Result<String, CommitError>;

/// Where staged changes come from.
#[cfg_attr(test, mockall::automock)]
pub trait DiffSource {
    /// `Ok(None)` when nothing is staged.
    fn staged_diff(&self) -> Result<Option<StagedDiff>, GitError>;
}

/// Performs the one history-mutating action.
#[cfg_attr(test, mockall::automock)]
pub trait Committer {
    fn commit(&self, message: &str) -> CommitResult;
}

/// `DiffSource` + `Committer` backed by the `git` binary in the current directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl DiffSource for GitCli {
    fn staged_diff(&self) -> Result<Option<StagedDiff>, GitError> {
        ensure_repository()?;
        let diff = git_output(&["diff", "--cached"])?;
        log::debug!("Staged diff is {} bytes", diff.len());
        Ok(StagedDiff::new(diff))
    }
}

impl Committer for GitCli {
    fn commit(&self, message: &str) -> CommitResult {
        commit_with_message(message)
    }
}

/// Run a git command and capture stdout as String.
pub fn git_output(args: &[&str]) -> Result<String, GitError> {
    let output = GitCommand::new("git")
        .args(args)
        .output()
        .map_err(|e| spawn_error(args, e))?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            args: args.join(" "),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Fail with `NoRepository` unless the working directory is inside a git repository.
pub fn ensure_repository() -> Result<(), GitError> {
    match git_output(&["rev-parse", "--git-dir"]) {
        Ok(dir) => {
            log::trace!("Using git dir {}", dir.trim());
            Ok(())
        }
        Err(GitError::CommandFailed { stderr, .. }) => Err(GitError::NoRepository(stderr)),
        Err(e) => Err(e),
    }
}

/// Create a commit with exactly `message`, fed to `git commit -F -` on stdin.
pub fn commit_with_message(message: &str) -> CommitResult {
    run_with_message(commit_command(), message)
}

// `whitespace` keeps lines starting with '#' whatever `commit.cleanup` says.
fn commit_command() -> GitCommand {
    let mut cmd = GitCommand::new("git");
    cmd.args(["commit", "--cleanup=whitespace", "-F", "-"]);
    cmd
}

fn run_with_message(mut cmd: GitCommand, message: &str) -> CommitResult {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(CommitError::Spawn)?;

    let write_result = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(message.as_bytes()),
        None => Ok(()),
    };

    let output = child.wait_with_output().map_err(CommitError::Spawn)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        if let Err(e) = &write_result {
            log::debug!("Writing the commit message to git failed: {e}");
        }
        let combined = format!("{}{}", stdout, stderr).trim().to_string();
        return Err(CommitError::Rejected { output: combined });
    }
    write_result.map_err(CommitError::Spawn)?;

    Ok(stdout.trim().to_string())
}

fn spawn_error(args: &[&str], source: std::io::Error) -> GitError {
    if source.kind() == ErrorKind::NotFound {
        GitError::NotInstalled(source)
    } else {
        GitError::Io {
            args: args.join(" "),
            source,
        }
    }
}
