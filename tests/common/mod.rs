//! Shared test utilities for integration and E2E tests.
//!
//! Provides a temporary checkout root with an optional `.gitmodules`, a few
//! canned manifests, and helpers for building real local git upstreams.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::OPTIONAL_ONLY);
//!     fixture.command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Only a tested-optional component; installs without touching git.
    pub const OPTIONAL_ONLY: &str = r#"
[submodule "mosart"]
    path = components/mosart
    url = https://github.com/ESCOMP/MOSART
    esmtag = mosart1_0_49
    esmrequired = T:F
"#;

    /// One required and one optional component.
    pub const MIXED: &str = r#"
[submodule "cime"]
    path = cime
    url = https://github.com/ESMCI/cime
    esmtag = cime6.0.175
    esmrequired = T:T

[submodule "mosart"]
    path = components/mosart
    url = https://github.com/ESCOMP/MOSART
    esmtag = mosart1_0_49
    esmrequired = T:F
"#;

    /// A component missing its url.
    pub const MISSING_URL: &str = r#"
[submodule "cime"]
    path = cime
    esmtag = cime6.0.175
"#;

    /// An unknown requirement token.
    pub const BAD_REQUIREMENT: &str = r#"
[submodule "cime"]
    path = cime
    url = https://github.com/ESMCI/cime
    esmrequired = X:Y
"#;
}

/// Whether a usable `git` executable is on the PATH.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A temporary checkout root with an optional manifest.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write a `.gitmodules` file with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.with_file(".gitmodules", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Create an empty directory.
    #[allow(dead_code)]
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Turn the fixture root into a git repository.
    #[allow(dead_code)]
    pub fn with_git_repo(self) -> Self {
        git(self.path(), &["init", "-q"]);
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("git-fleximod");
        cmd.current_dir(self.path())
            .env_remove("GIT_FLEXIMOD_PATH")
            .env_remove("GIT_FLEXIMOD_GITMODULES")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Run git in `dir`, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Create an upstream repository at `dir` with the given files committed and
/// tagged as `tag`.
#[allow(dead_code)]
pub fn upstream_repo(dir: &Path, files: &[(&str, &str)], tag: &str) {
    std::fs::create_dir_all(dir).expect("Failed to create upstream dir");
    git(dir, &["init", "-q"]);
    for (path, content) in files {
        let file = dir.join(path);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(file, content).expect("Failed to write upstream file");
    }
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "initial"]);
    git(dir, &["tag", tag]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::MIXED);
        assert!(fixture.path().join(".gitmodules").exists());
    }
}
