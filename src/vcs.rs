//! Process-backed collaborators: git for history and pushes, `rbt` for reviews.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::PushError;

/// Version-control queries and the single mutating push.
pub trait VersionControl {
    /// Full ref of the checked-out branch, e.g. `refs/heads/master`.
    fn current_branch_ref(&self) -> Result<String, PushError>;
    /// Abbreviated upstream tracking ref of `branch`.
    fn upstream_of(&self, branch: &str) -> Result<String, PushError>;
    fn merge_base(&self, a: &str, b: &str) -> Result<String, PushError>;
    /// Commit id a ref points at.
    fn resolve(&self, reference: &str) -> Result<String, PushError>;
    /// Commits in `range`, oldest first.
    fn rev_list(&self, range: &str) -> Result<Vec<String>, PushError>;
    /// Commit metadata and full message of `rev`.
    fn show(&self, rev: &str) -> Result<String, PushError>;
    /// Remote configured for `branch`.
    fn branch_remote(&self, branch: &str) -> Result<String, PushError>;
    fn push(&self, remote: &str, refspec: &str, dry_run: bool) -> Result<(), PushError>;
}

pub trait ReviewClient {
    /// Marks review `id` submitted with `description` as the closing text.
    fn close(&self, id: &str, description: &str) -> Result<(), PushError>;
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn_error(program: &str) -> impl FnOnce(std::io::Error) -> PushError {
    let program = program.to_string();
    move |source| PushError::Spawn { program, source }
}

/// Runs `program` to completion and returns its trimmed stdout.
pub fn run_command(program: &str, args: &[&str]) -> Result<String, PushError> {
    let command_line = command_line(program, args);
    debug!(command = %command_line, "running");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(spawn_error(program))?;

    if !output.status.success() {
        return Err(PushError::CommandFailed {
            command: command_line,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Runs a mutating `program` with stdout and stderr left on the terminal,
/// so its own progress report (e.g. `git push --dry-run`) stays visible.
pub fn run_passthrough(program: &str, args: &[&str]) -> Result<(), PushError> {
    let command_line = command_line(program, args);
    debug!(command = %command_line, "running");

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(spawn_error(program))?;

    if !status.success() {
        return Err(PushError::CommandExited {
            command: command_line,
            status,
        });
    }
    Ok(())
}

/// `git` found on the search path, run in the current directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git;

impl Git {
    fn git(&self, args: &[&str]) -> Result<String, PushError> {
        run_command("git", args)
    }
}

impl VersionControl for Git {
    fn current_branch_ref(&self) -> Result<String, PushError> {
        self.git(&["symbolic-ref", "HEAD"])
    }

    fn upstream_of(&self, branch: &str) -> Result<String, PushError> {
        self.git(&["rev-parse", "--abbrev-ref", &format!("{branch}@{{upstream}}")])
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<String, PushError> {
        self.git(&["merge-base", a, b])
    }

    fn resolve(&self, reference: &str) -> Result<String, PushError> {
        self.git(&["rev-parse", "--verify", reference])
    }

    fn rev_list(&self, range: &str) -> Result<Vec<String>, PushError> {
        let out = self.git(&["rev-list", "--reverse", range])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn show(&self, rev: &str) -> Result<String, PushError> {
        self.git(&["--no-pager", "show", "--no-color", "--no-patch", rev])
    }

    fn branch_remote(&self, branch: &str) -> Result<String, PushError> {
        self.git(&["config", "--get", &format!("branch.{branch}.remote")])
    }

    fn push(&self, remote: &str, refspec: &str, dry_run: bool) -> Result<(), PushError> {
        let mut args = vec!["push"];
        if dry_run {
            args.push("--dry-run");
        }
        args.extend([remote, refspec]);
        run_passthrough("git", &args)
    }
}

/// ReviewBoard's `rbt` command-line client, authenticated out-of-band.
#[derive(Debug, Clone)]
pub struct Rbt {
    program: String,
}

impl Rbt {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ReviewClient for Rbt {
    fn close(&self, id: &str, description: &str) -> Result<(), PushError> {
        run_passthrough(&self.program, &["close", "--description", description, id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run_command("definitely-not-a-real-binary-7f3a", &[]).unwrap_err();
        assert!(matches!(err, PushError::Spawn { ref program, .. } if program == "definitely-not-a-real-binary-7f3a"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_fatal() {
        let err = run_command("sh", &["-c", "echo boom >&2; exit 3"]).unwrap_err();
        match err {
            PushError::CommandFailed { command, status, stderr } => {
                assert_eq!(command, "sh -c echo boom >&2; exit 3");
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn passthrough_reports_exit_status() {
        let err = run_passthrough("sh", &["-c", "exit 4"]).unwrap_err();
        match err {
            PushError::CommandExited { command, status } => {
                assert_eq!(command, "sh -c exit 4");
                assert_eq!(status.code(), Some(4));
            }
            other => panic!("unexpected error: {other}"),
        }
        run_passthrough("sh", &["-c", "echo visible >&2"]).unwrap();
    }

    #[test]
    fn passthrough_missing_program_is_a_spawn_error() {
        let err = run_passthrough("definitely-not-a-real-binary-7f3a", &["push"]).unwrap_err();
        assert!(matches!(err, PushError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn stdout_is_trimmed() {
        let out = run_command("sh", &["-c", "printf '  abc123\\n\\n'"]).unwrap();
        assert_eq!(out, "abc123");
    }
}
