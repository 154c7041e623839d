//! Child-process execution for git invocations.
//!
//! The runner is deliberately small: it spawns the external binary with the
//! invocation's working directory set, waits for it to exit, and decodes both
//! output streams as text. The one piece of policy lives in the exit
//! handling: git reports some purely informational conditions with a non-zero
//! status and nothing on stderr, and those exits are reported back to the
//! caller as successes (see [`exit_is_benign`]).

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors returned by git invocations.
#[derive(Error, Debug)]
pub enum GitError {
    /// The child exited non-zero and wrote diagnostics to stderr.
    #[error("git exited with status {code}: {stderr}")]
    CommandFailed {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// Invalid inputs were provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Underlying IO error (missing binary, permissions, spawn failure).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One external command execution: an argument vector (program name first)
/// plus the working directory to run it in.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    cwd: PathBuf,
}

impl Invocation {
    /// Build an invocation from an argument vector and a working directory.
    pub fn new<I, S>(args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
        }
    }

    /// The full argument vector, program name first.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The directory the child process runs in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Captured result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    code: i32,
    stdout: String,
    stderr: String,
}

impl Outcome {
    /// Exit code of the child. Signal-terminated children report -1.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Captured standard output.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured standard error.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// True when the invocation was reported as successful.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Non-zero exits with a silent stderr are reported as successes.
///
/// git uses this shape for informational conditions that are not failures,
/// so only a non-empty stderr turns a non-zero exit into an error.
fn exit_is_benign(stderr: &str) -> bool {
    stderr.is_empty()
}

/// Execute an invocation and wait for it to finish.
///
/// Blocking: one child per call, no timeout, no retries. The child runs with
/// stdin closed and `GIT_TERMINAL_PROMPT=0` so it can never sit waiting for
/// credentials. Both output streams are captured as UTF-8 text (lossy).
pub fn run(invocation: &Invocation) -> Result<Outcome, GitError> {
    let (program, args) = invocation
        .args
        .split_first()
        .ok_or_else(|| GitError::InvalidInput("empty argument vector".to_string()))?;

    log::debug!(
        "running '{}' in '{}'",
        invocation,
        invocation.cwd.display()
    );

    let output = Command::new(program)
        .args(args)
        .current_dir(&invocation.cwd)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        return Ok(Outcome {
            code: 0,
            stdout,
            stderr,
        });
    }

    let code = output.status.code().unwrap_or(-1);

    if exit_is_benign(&stderr) {
        log::debug!("'{}' exited {} with empty stderr, reporting success", invocation, code);
        return Ok(Outcome {
            code: 0,
            stdout,
            stderr: String::new(),
        });
    }

    log::error!(
        "'{}' failed with status {}: {}",
        invocation,
        code,
        stderr.trim()
    );
    Err(GitError::CommandFailed {
        code,
        stdout,
        stderr,
    })
}
