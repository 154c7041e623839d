//! Builders for the supported git subcommands.
//!
//! Each builder assembles exactly one [`Invocation`] from typed parameters
//! and hands it to the runner. Nothing here inspects repository state; the
//! external tool stays a black box and its exit status and streams come back
//! in the [`Outcome`].
//!
//! [`GitCli`] methods take the repository path explicitly. The module-level
//! free functions mirror them but default the path to the caller's current
//! directory, resolved freshly on every call.

use std::env;
use std::path::{Path, PathBuf};

use crate::runner::{self, GitError, Invocation, Outcome};

/// Remote used by `pull` and `push` when none is given.
const DEFAULT_REMOTE: &str = "origin";

/// Validate a branch name before it lands in an argument vector.
///
/// Rejects:
/// - Empty strings
/// - Strings containing `..`
/// - Strings starting with `-` (would parse as a flag)
/// - Strings containing null bytes or control characters
fn validate_ref(value: &str, what: &str) -> Result<(), GitError> {
    if value.is_empty() {
        return Err(GitError::InvalidInput(format!("{} cannot be empty", what)));
    }
    if value.contains("..") {
        return Err(GitError::InvalidInput(format!(
            "{} cannot contain '..'",
            what
        )));
    }
    if value.starts_with('-') {
        return Err(GitError::InvalidInput(format!(
            "{} cannot start with '-'",
            what
        )));
    }
    if value.bytes().any(|b| b == 0 || b < 0x20) {
        return Err(GitError::InvalidInput(format!(
            "{} cannot contain null or control characters",
            what
        )));
    }
    Ok(())
}

/// Validate a remote name. Same rules as [`validate_ref`], plus path
/// separators are rejected.
fn validate_remote(value: &str, what: &str) -> Result<(), GitError> {
    validate_ref(value, what)?;
    if value.contains('/') || value.contains('\\') {
        return Err(GitError::InvalidInput(format!(
            "{} cannot contain path separators",
            what
        )));
    }
    Ok(())
}

/// Validate a pathspec or URL operand.
///
/// Looser than [`validate_ref`]: `..` and separators are legitimate in paths
/// and URLs, so only emptiness, a leading `-`, and control characters are
/// rejected.
fn validate_operand(value: &str, what: &str) -> Result<(), GitError> {
    if value.is_empty() {
        return Err(GitError::InvalidInput(format!("{} cannot be empty", what)));
    }
    if value.starts_with('-') {
        return Err(GitError::InvalidInput(format!(
            "{} cannot start with '-'",
            what
        )));
    }
    if value.bytes().any(|b| b == 0 || b < 0x20) {
        return Err(GitError::InvalidInput(format!(
            "{} cannot contain null or control characters",
            what
        )));
    }
    Ok(())
}

/// Git CLI wrapper.
///
/// Holds the program name so tests and non-PATH installs can point at a
/// different binary.
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Create a new GitCli instance using the system git.
    pub fn new() -> Self {
        Self {
            program: "git".into(),
        }
    }

    /// Create a GitCli that runs a specific program instead of `git`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn invocation<'a>(
        &'a self,
        args: impl IntoIterator<Item = &'a str>,
        cwd: &Path,
    ) -> Invocation {
        Invocation::new(std::iter::once(self.program.as_str()).chain(args), cwd)
    }

    /// Stage changes. Stages the full tree when `path` is `None`.
    pub fn add(&self, path: Option<&str>, repo: &Path) -> Result<Outcome, GitError> {
        runner::run(&self.add_invocation(path, repo)?)
    }

    fn add_invocation(&self, path: Option<&str>, repo: &Path) -> Result<Invocation, GitError> {
        let invocation = match path {
            Some(path) => {
                validate_operand(path, "path")?;
                self.invocation(["add", path], repo)
            }
            None => self.invocation(["add", "--all"], repo),
        };
        Ok(invocation)
    }

    /// Check out a branch.
    ///
    /// With a `target` remote, the checked-out ref is `<target>/<branch>`,
    /// and a `destination` adds a second positional `<destination>/<branch>`
    /// operand. The two-operand form is kept as-is from the workflows this
    /// wrapper serves.
    pub fn checkout(
        &self,
        branch: &str,
        target: Option<&str>,
        destination: Option<&str>,
        repo: &Path,
    ) -> Result<Outcome, GitError> {
        runner::run(&self.checkout_invocation(branch, target, destination, repo)?)
    }

    fn checkout_invocation(
        &self,
        branch: &str,
        target: Option<&str>,
        destination: Option<&str>,
        repo: &Path,
    ) -> Result<Invocation, GitError> {
        validate_ref(branch, "branch")?;

        let Some(target) = target else {
            return Ok(self.invocation(["checkout", branch], repo));
        };

        validate_remote(target, "target")?;
        let remote_ref = format!("{}/{}", target, branch);

        let invocation = match destination {
            Some(destination) => {
                validate_remote(destination, "destination")?;
                let local_ref = format!("{}/{}", destination, branch);
                self.invocation(["checkout", remote_ref.as_str(), local_ref.as_str()], repo)
            }
            None => self.invocation(["checkout", remote_ref.as_str()], repo),
        };
        Ok(invocation)
    }

    /// Commit staged changes.
    ///
    /// The message is passed through as a single argument element; no shell
    /// is involved and no quote characters are added around it.
    pub fn commit(&self, message: &str, repo: &Path) -> Result<Outcome, GitError> {
        runner::run(&self.commit_invocation(message, repo)?)
    }

    fn commit_invocation(&self, message: &str, repo: &Path) -> Result<Invocation, GitError> {
        if message.is_empty() {
            return Err(GitError::InvalidInput(
                "commit message cannot be empty".to_string(),
            ));
        }
        Ok(self.invocation(["commit", "-m", message], repo))
    }

    /// Query working tree status.
    pub fn status(&self, repo: &Path) -> Result<Outcome, GitError> {
        runner::run(&self.invocation(["status"], repo))
    }

    /// Pull from a remote, defaulting to `origin`, optionally a specific
    /// branch.
    pub fn pull(
        &self,
        destination: Option<&str>,
        branch: Option<&str>,
        repo: &Path,
    ) -> Result<Outcome, GitError> {
        runner::run(&self.pull_invocation(destination, branch, repo)?)
    }

    fn pull_invocation(
        &self,
        destination: Option<&str>,
        branch: Option<&str>,
        repo: &Path,
    ) -> Result<Invocation, GitError> {
        let destination = destination.unwrap_or(DEFAULT_REMOTE);
        validate_remote(destination, "destination")?;

        let mut args = vec!["pull", destination];
        if let Some(branch) = branch {
            validate_ref(branch, "branch")?;
            args.push(branch);
        }
        Ok(self.invocation(args, repo))
    }

    /// Push to a remote. Mirrors [`GitCli::pull`].
    pub fn push(
        &self,
        destination: Option<&str>,
        branch: Option<&str>,
        repo: &Path,
    ) -> Result<Outcome, GitError> {
        runner::run(&self.push_invocation(destination, branch, repo)?)
    }

    fn push_invocation(
        &self,
        destination: Option<&str>,
        branch: Option<&str>,
        repo: &Path,
    ) -> Result<Invocation, GitError> {
        let destination = destination.unwrap_or(DEFAULT_REMOTE);
        validate_remote(destination, "destination")?;

        let mut args = vec!["push", destination];
        if let Some(branch) = branch {
            validate_ref(branch, "branch")?;
            args.push(branch);
        }
        Ok(self.invocation(args, repo))
    }

    /// Clone `url` into `target`.
    ///
    /// The child runs from the parent of `target` (created if missing); the
    /// target itself does not exist until the clone finishes, so it cannot
    /// be the working directory. The target is made absolute first so the
    /// positional argument keeps its meaning regardless of where the child
    /// runs.
    pub fn clone(&self, url: &str, target: &Path) -> Result<Outcome, GitError> {
        runner::run(&self.clone_invocation(url, target)?)
    }

    fn clone_invocation(&self, url: &str, target: &Path) -> Result<Invocation, GitError> {
        validate_operand(url, "url")?;

        let target = if target.is_absolute() {
            target.to_path_buf()
        } else {
            env::current_dir()?.join(target)
        };
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => env::current_dir()?,
        };
        std::fs::create_dir_all(&parent)?;

        let target_str = target
            .to_str()
            .ok_or_else(|| GitError::InvalidInput("target path is not valid UTF-8".to_string()))?;

        Ok(self.invocation(["clone", url, target_str], &parent))
    }
}

/// Resolve an explicit repository path, falling back to the current
/// directory. Resolved at call time, so a process that changes directory
/// sees the new location on its next call.
fn repo_or_cwd(repo: Option<&Path>) -> Result<PathBuf, GitError> {
    match repo {
        Some(repo) => Ok(repo.to_path_buf()),
        None => Ok(env::current_dir()?),
    }
}

/// Stage changes, the full tree when `path` is `None`.
///
/// Convenience wrapper around [`GitCli::add`].
pub fn add(path: Option<&str>, repo: Option<&Path>) -> Result<Outcome, GitError> {
    GitCli::new().add(path, &repo_or_cwd(repo)?)
}

/// Check out a branch, optionally via a remote target.
///
/// Convenience wrapper around [`GitCli::checkout`].
pub fn checkout(
    branch: &str,
    target: Option<&str>,
    destination: Option<&str>,
    repo: Option<&Path>,
) -> Result<Outcome, GitError> {
    GitCli::new().checkout(branch, target, destination, &repo_or_cwd(repo)?)
}

/// Commit staged changes with a message.
///
/// Convenience wrapper around [`GitCli::commit`].
pub fn commit(message: &str, repo: Option<&Path>) -> Result<Outcome, GitError> {
    GitCli::new().commit(message, &repo_or_cwd(repo)?)
}

/// Query working tree status.
///
/// Convenience wrapper around [`GitCli::status`].
pub fn status(repo: Option<&Path>) -> Result<Outcome, GitError> {
    GitCli::new().status(&repo_or_cwd(repo)?)
}

/// Pull from a remote, defaulting to `origin`.
///
/// Convenience wrapper around [`GitCli::pull`].
pub fn pull(
    destination: Option<&str>,
    branch: Option<&str>,
    repo: Option<&Path>,
) -> Result<Outcome, GitError> {
    GitCli::new().pull(destination, branch, &repo_or_cwd(repo)?)
}

/// Push to a remote, defaulting to `origin`.
///
/// Convenience wrapper around [`GitCli::push`].
pub fn push(
    destination: Option<&str>,
    branch: Option<&str>,
    repo: Option<&Path>,
) -> Result<Outcome, GitError> {
    GitCli::new().push(destination, branch, &repo_or_cwd(repo)?)
}

/// Clone `url` into `target`.
///
/// Convenience wrapper around [`GitCli::clone`].
pub fn clone(url: &str, target: &Path) -> Result<Outcome, GitError> {
    GitCli::new().clone(url, target)
}
