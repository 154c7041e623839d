//! Thin wrapper around the system `git` binary.
//!
//! Every operation shells out: the builders in [`commands`] assemble one
//! argument vector each, and the [`runner`] executes it in a caller-chosen
//! working directory, capturing the exit status and both output streams.
//! Nothing git-protocol-shaped happens in process; credentials, merging, and
//! diffing all belong to the external tool.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let cli = gitrun::GitCli::new();
//! cli.add(None, Path::new("/work/repo"))?;
//! cli.commit("update report", Path::new("/work/repo"))?;
//! cli.push(None, Some("main"), Path::new("/work/repo"))?;
//! # Ok::<(), gitrun::GitError>(())
//! ```

mod commands;
mod runner;

pub use commands::{add, checkout, clone, commit, pull, push, status, GitCli};
pub use runner::{run, GitError, Invocation, Outcome};
