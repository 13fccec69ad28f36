//! # git-fleximod Library
//!
//! This library checks out trees of git submodules described by a
//! `.gitmodules`-style manifest extended with checkout policy. It is used by
//! the `git-fleximod` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::PathBuf;
//! use git_fleximod::manifest::{AcceptedClasses, ComponentFilter, Manifest};
//!
//! let manifest = Manifest::parse(
//!     PathBuf::from(".gitmodules"),
//!     r#"
//! [submodule "cime"]
//!     path = cime
//!     url = https://github.com/ESMCI/cime
//!     esmtag = cime6.0.175
//!     esmrequired = T:T
//! "#,
//!     &ComponentFilter::default(),
//! )
//! .unwrap();
//!
//! let cime = &manifest.components()[0];
//! assert_eq!(cime.revision.as_deref(), Some("cime6.0.175"));
//! assert!(AcceptedClasses::install(false).contains(cime.requirement_class));
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the ordered component records, requirement
//!   classes and include/exclude filtering.
//! - **Repository handles (`repository`, `git`)**: the `GitOperations` seam
//!   over the system `git` executable, always bound to an explicit working
//!   directory.
//! - **Checkout strategies (`checkout`)**: full submodule checkout with
//!   recursion into nested manifests, and sparse checkout with metadata
//!   relocation into the root's module store.
//! - **Reconciliation (`reconcile`)**: the install, update and status passes.
//! - **Reporting (`report`, `output`)**: progress events and how the console
//!   renders them.

pub mod checkout;
pub mod error;
pub mod git;
pub mod manifest;
pub mod output;
pub mod path;
pub mod reconcile;
pub mod report;
pub mod repository;

#[cfg(test)]
mod testing;
