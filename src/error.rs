//! # Error Handling
//!
//! This module defines the centralized error type for `git-fleximod`. It uses
//! the `thiserror` library to build a single `Error` enum covering every
//! failure the checkout engine can surface, each with enough context to name
//! the offending component or operation.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Manifest errors abort before any checkout
//!   begins; `VcsOperationFailed` carries the failing `git` operation, its exit
//!   code and captured stderr; `Component` wraps any other error with the name
//!   of the component being processed.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! No variant is retried anywhere in the crate. Transient network failures are
//! surfaced to the operator, who re-runs the command.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for git-fleximod operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest file does not exist at the requested location.
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The manifest exists but could not be parsed or is missing required
    /// fields.
    #[error("Malformed manifest {}: {message}", path.display())]
    ManifestMalformed { path: PathBuf, message: String },

    /// An invocation of the external `git` tool exited unsuccessfully.
    ///
    /// `exit_code` is `None` when the process could not be spawned or was
    /// terminated by a signal.
    #[error("git {operation} failed{}: {}", exit_code.map(|c| format!(" with exit code {}", c)).unwrap_or_default(), stderr.trim())]
    VcsOperationFailed {
        operation: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// A full checkout completed but left no `.git` marker behind.
    #[error("Failed to checkout {component}: no git metadata found in {}", path.display())]
    CheckoutVerificationFailed { component: String, path: PathBuf },

    /// A component directory is not a git working tree.
    #[error("Submodule {component} is not a git repository: {}", path.display())]
    NotARepository { component: String, path: PathBuf },

    /// An action name outside of install, update and status.
    #[error("Unrecognized action request: {action}")]
    UnrecognizedAction { action: String },

    /// Any error raised while processing a specific component.
    #[error("{name}: {source}")]
    Component {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// One or more components failed during an update or status pass.
    #[error("{operation} failed for {}: {}", if components.len() == 1 { "1 component".to_string() } else { format!("{} components", components.len()) }, components.join(", "))]
    ComponentsFailed {
        operation: String,
        components: Vec<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach a component name to an error.
    pub fn for_component(name: &str, source: Error) -> Self {
        Error::Component {
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
