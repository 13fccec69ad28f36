//! # Repository Handles
//!
//! This module provides the version-control interface used by the checkout
//! engine. It separates *what* the engine asks of `git` from *how* the
//! request is executed.
//!
//! ## Design
//!
//! - **`GitOperations`**: the execution seam. A single method runs one git
//!   operation in an explicit working directory and returns its captured
//!   stdout. `DefaultGitOperations` spawns the real `git` executable; tests
//!   substitute a mock that records calls and simulates side effects.
//!
//! - **`Repository`**: a handle binding a `GitOperations` implementation to
//!   one working directory. Every query the engine needs (`describe`,
//!   `remote_url`, `remotes`, ...) is a method here, so no caller ever changes
//!   the process working directory.
//!
//! Nothing in this module retries. A failed invocation surfaces as
//! `Error::VcsOperationFailed` and the caller decides whether it is fatal.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Runs `git <operation> <args...>` inside `workdir` and returns stdout.
    fn execute(&self, workdir: &Path, operation: &str, args: &[&str]) -> Result<String>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn execute(&self, workdir: &Path, operation: &str, args: &[&str]) -> Result<String> {
        crate::git::run(workdir, operation, args)
    }
}

/// A remote configured in a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// A git working directory paired with the operations used to drive it.
pub struct Repository<'a> {
    git: &'a dyn GitOperations,
    workdir: PathBuf,
}

impl<'a> Repository<'a> {
    /// Bind `git` to the working directory `workdir`.
    pub fn new(git: &'a dyn GitOperations, workdir: impl Into<PathBuf>) -> Self {
        Self {
            git,
            workdir: workdir.into(),
        }
    }

    /// The working directory every operation runs in.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run an arbitrary git operation and return its captured output.
    pub fn run(&self, operation: &str, args: &[&str]) -> Result<String> {
        self.git.execute(&self.workdir, operation, args)
    }

    /// Set `<section>.<key>` in the repository's local configuration.
    pub fn config_set(&self, section: &str, key: &str, value: &str) -> Result<()> {
        let name = format!("{}.{}", section, key);
        self.run("config", &[name.as_str(), value])?;
        Ok(())
    }

    /// Nearest tag, falling back to an abbreviated commit id.
    pub fn describe(&self) -> Result<String> {
        Ok(self
            .run("describe", &["--tags", "--always"])?
            .trim()
            .to_string())
    }

    /// URL of the default remote.
    pub fn remote_url(&self) -> Result<String> {
        Ok(self.run("ls-remote", &["--get-url"])?.trim().to_string())
    }

    /// All configured remotes, using their fetch URLs.
    pub fn remotes(&self) -> Result<Vec<Remote>> {
        let output = self.run("remote", &["-v"])?;
        Ok(parse_remotes(&output))
    }

    /// Check out `revision` in the working tree.
    pub fn checkout(&self, revision: &str) -> Result<()> {
        self.run("checkout", &[revision])?;
        Ok(())
    }
}

/// Parse `git remote -v` output into one entry per remote.
///
/// Lines look like `origin\thttps://example.com/repo.git (fetch)`; push lines
/// are ignored.
fn parse_remotes(output: &str) -> Vec<Remote> {
    output
        .lines()
        .filter_map(|line| {
            let (name, rest) = line.split_once(char::is_whitespace)?;
            let rest = rest.trim();
            let url = rest.strip_suffix("(fetch)")?.trim_end();
            Some(Remote {
                name: name.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}
