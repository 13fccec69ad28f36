//! Low-level git plumbing: spawning the `git` executable and reading or
//! writing the `.git` metadata marker of a working tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};
use crate::path::relative_path;

/// Name of the metadata marker in a working tree (directory or redirect file).
pub const GIT_MARKER: &str = ".git";

/// Prefix of a redirect file that points a working tree at its metadata.
const GITDIR_PREFIX: &str = "gitdir:";

/// Run `git <operation> <args...>` with `workdir` as its working directory
///
/// This uses the system git command, so SSH keys, credential helpers and any
/// other configuration from ~/.gitconfig apply unchanged. Stdout is returned
/// on success; a nonzero exit becomes `Error::VcsOperationFailed`.
pub fn run(workdir: &Path, operation: &str, args: &[&str]) -> Result<String> {
    debug!(
        "git {} {} (in {})",
        operation,
        args.join(" "),
        workdir.display()
    );

    let output = Command::new("git")
        .current_dir(workdir)
        .arg(operation)
        .args(args)
        .output()
        .map_err(|e| Error::VcsOperationFailed {
            operation: operation.to_string(),
            exit_code: None,
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::VcsOperationFailed {
            operation: operation.to_string(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Whether `dir` carries git metadata (a `.git` directory or redirect file)
pub fn has_metadata(dir: &Path) -> bool {
    dir.join(GIT_MARKER).exists()
}

/// Resolve the metadata directory of the repository whose working tree is
/// `worktree`.
///
/// A `.git` directory is returned as-is. A `.git` file is read as a
/// `gitdir: <path>` redirect, with relative targets resolved against the
/// working tree.
pub fn resolve_git_dir(worktree: &Path) -> Result<PathBuf> {
    let marker = worktree.join(GIT_MARKER);
    if marker.is_dir() {
        return Ok(marker);
    }

    let content = fs::read_to_string(&marker)?;
    let target = content
        .lines()
        .find_map(|line| line.strip_prefix(GITDIR_PREFIX))
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is not a gitdir redirect", marker.display()),
            ))
        })?;

    let target = Path::new(target);
    if target.is_absolute() {
        Ok(target.to_path_buf())
    } else {
        Ok(worktree.join(target))
    }
}

/// Write `<worktree>/.git` as a redirect to `git_dir`, expressed relative to
/// the working tree.
///
/// The caller must already have moved any `.git` directory out of the way.
pub fn write_gitdir_redirect(worktree: &Path, git_dir: &Path) -> Result<()> {
    let from = worktree.canonicalize()?;
    let to = git_dir.canonicalize()?;
    let relative = relative_path(&from, &to);
    fs::write(
        worktree.join(GIT_MARKER),
        format!("{} {}\n", GITDIR_PREFIX, relative.display()),
    )?;
    Ok(())
}
