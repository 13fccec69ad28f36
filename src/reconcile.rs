//! # Reconciliation Engine
//!
//! Walks a manifest in declaration order and brings the working tree in line
//! with it. Three actions are supported:
//!
//! - **install**: check out every component whose requirement class is
//!   accepted, choosing the full or sparse strategy per component. Full
//!   checkouts recurse into nested manifests with the internal-required set
//!   only. The first failure aborts the run, since later components may rely
//!   on earlier ones.
//! - **update**: for components that are already checked out, make sure the
//!   manifest URL is a known remote and move to the declared revision.
//!   Components that are not checked out are left to install.
//! - **status**: report, per component, whether the checked-out description
//!   matches the declared revision.
//!
//! update and status keep going past a failing component, report it, and
//! return [`Error::ComponentsFailed`] at the end.
//!
//! Processing is strictly sequential. Every checkout under one root writes
//! into that root's module store, so components are never handled
//! concurrently.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};

use crate::checkout::{self, Strategy};
use crate::error::{Error, Result};
use crate::git::has_metadata;
use crate::manifest::{AcceptedClasses, Component, Manifest};
use crate::report::{Event, Reporter};
use crate::repository::{GitOperations, Remote, Repository};

/// Base name for remotes added by update when the manifest URL is new.
const UPDATE_REMOTE: &str = "fleximod";

/// The operation requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Update,
    Status,
}

impl Action {
    /// Resolve the action from the `--status`/`--update` flags. Status wins
    /// when both are given; install is the default.
    pub fn from_flags(status: bool, update: bool) -> Self {
        if status {
            Action::Status
        } else if update {
            Action::Update
        } else {
            Action::Install
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(action: &str) -> Result<Self> {
        match action {
            "install" => Ok(Action::Install),
            "update" => Ok(Action::Update),
            "status" => Ok(Action::Status),
            other => Err(Error::UnrecognizedAction {
                action: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Install => f.write_str("install"),
            Action::Update => f.write_str("update"),
            Action::Status => f.write_str("status"),
        }
    }
}

/// How a component's checkout compares with its declared revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    InSync,
    OutOfSync,
    /// The manifest records no revision for the component.
    Undeclared,
}

/// Compare a declared revision with the description `git` reports.
pub fn classify(declared: Option<&str>, actual: &str) -> SyncState {
    match declared {
        None => SyncState::Undeclared,
        Some(declared) if declared == actual => SyncState::InSync,
        Some(_) => SyncState::OutOfSync,
    }
}

/// The status of one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub name: String,
    pub declared: Option<String>,
    pub actual: String,
    pub state: SyncState,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.state, &self.declared) {
            (SyncState::InSync, Some(declared)) => {
                write!(f, "Submodule {} at tag {} (in sync)", self.name, declared)
            }
            (SyncState::OutOfSync, Some(declared)) => write!(
                f,
                "Submodule {} {} is out of sync with .gitmodules {}",
                self.name, self.actual, declared
            ),
            _ => write!(
                f,
                "Submodule {} has no tag defined in .gitmodules (at {})",
                self.name, self.actual
            ),
        }
    }
}

/// Pick a remote name based on `UPDATE_REMOTE` that no existing remote uses.
fn unique_remote_name(remotes: &[Remote]) -> String {
    let taken = |name: &str| remotes.iter().any(|remote| remote.name == name);
    if !taken(UPDATE_REMOTE) {
        return UPDATE_REMOTE.to_string();
    }
    (1..)
        .map(|n| format!("{}-{}", UPDATE_REMOTE, n))
        .find(|name| !taken(name))
        .unwrap_or_else(|| UPDATE_REMOTE.to_string())
}

/// Drives install, update and status over a manifest.
pub struct Reconciler<'a> {
    git: &'a dyn GitOperations,
    reporter: &'a mut dyn Reporter,
}

impl<'a> Reconciler<'a> {
    pub fn new(git: &'a dyn GitOperations, reporter: &'a mut dyn Reporter) -> Self {
        Self { git, reporter }
    }

    /// The git operations every repository handle is built on.
    pub fn git(&self) -> &'a dyn GitOperations {
        self.git
    }

    pub fn report(&mut self, event: Event) {
        self.reporter.report(event);
    }

    /// Run `action` for the repository rooted at `root`.
    ///
    /// `accepted` only matters for install.
    pub fn run(
        &mut self,
        action: Action,
        root: &Path,
        manifest: &Manifest,
        accepted: &AcceptedClasses,
    ) -> Result<()> {
        info!(
            "{} {} component(s) from {}",
            action,
            manifest.len(),
            manifest.path().display()
        );
        match action {
            Action::Install => self.install(root, manifest, accepted),
            Action::Update => self.update(root, manifest),
            Action::Status => self.status(root, manifest).map(|_| ()),
        }
    }

    /// Check out every accepted component of `manifest` under `root`.
    pub fn install(
        &mut self,
        root: &Path,
        manifest: &Manifest,
        accepted: &AcceptedClasses,
    ) -> Result<()> {
        for component in manifest.components() {
            if !accepted.contains(component.requirement_class) {
                if component.is_tested_optional() {
                    self.report(Event::Skipped {
                        name: component.name.clone(),
                    });
                } else {
                    debug!(
                        "{}: requirement class {} not selected, skipping",
                        component.name,
                        component
                            .requirement_class
                            .map(|class| class.token())
                            .unwrap_or("(none)")
                    );
                }
                continue;
            }

            let strategy = Strategy::for_component(component);
            info!("{}: {} checkout", component.name, strategy);
            let result = match strategy {
                Strategy::Full => checkout::full::checkout(self, root, component),
                Strategy::Sparse => {
                    checkout::sparse::checkout(self, root, manifest.path(), component)
                }
            };
            result.map_err(|e| Error::for_component(&component.name, e))?;
        }
        Ok(())
    }

    /// Move checked-out components to their declared revisions.
    pub fn update(&mut self, root: &Path, manifest: &Manifest) -> Result<()> {
        let mut failed = Vec::new();
        for component in manifest.components() {
            let dir = root.join(&component.path);
            if !has_metadata(&dir) {
                debug!("{}: not checked out, skipping update", component.name);
                continue;
            }
            if let Err(e) = self.update_component(&dir, component) {
                self.report(Event::Failed {
                    name: component.name.clone(),
                    message: e.to_string(),
                });
                failed.push(component.name.clone());
            }
        }
        finish("update", failed)
    }

    fn update_component(&mut self, dir: &Path, component: &Component) -> Result<()> {
        let Some(revision) = component.revision.as_deref() else {
            self.report(Event::UpdateSkipped {
                name: component.name.clone(),
            });
            return Ok(());
        };

        let repo = Repository::new(self.git, dir);
        let configured = repo.remote_url()?;
        if configured == component.url {
            repo.run("fetch", &["--tags"])?;
        } else {
            info!(
                "{}: remote {} differs from manifest {}",
                component.name, configured, component.url
            );
            let remote = ensure_remote(&repo, &component.url)?;
            repo.run("fetch", &["--tags", remote.as_str()])?;
        }
        repo.checkout(revision)?;

        self.report(Event::Updated {
            name: component.name.clone(),
            revision: revision.to_string(),
            url: component.url.clone(),
        });
        Ok(())
    }

    /// Report every component's checkout against its declared revision.
    pub fn status(&mut self, root: &Path, manifest: &Manifest) -> Result<Vec<StatusLine>> {
        let mut lines = Vec::new();
        let mut failed = Vec::new();
        for component in manifest.components() {
            match self.component_status(root, component) {
                Ok(line) => {
                    self.report(Event::Status(line.clone()));
                    lines.push(line);
                }
                Err(e) => {
                    self.report(Event::Failed {
                        name: component.name.clone(),
                        message: e.to_string(),
                    });
                    failed.push(component.name.clone());
                }
            }
        }
        finish("status", failed)?;
        Ok(lines)
    }

    fn component_status(&self, root: &Path, component: &Component) -> Result<StatusLine> {
        let dir = root.join(&component.path);
        // Without this check `git describe` would walk up and describe the
        // enclosing repository instead.
        if !has_metadata(&dir) {
            return Err(Error::NotARepository {
                component: component.name.clone(),
                path: dir,
            });
        }

        let actual = Repository::new(self.git, &dir).describe()?;
        let state = classify(component.revision.as_deref(), &actual);
        Ok(StatusLine {
            name: component.name.clone(),
            declared: component.revision.clone(),
            actual,
            state,
        })
    }
}

/// Reuse a remote that already points at `url`, otherwise add one under a
/// name no other remote uses. Returns the remote name.
fn ensure_remote(repo: &Repository<'_>, url: &str) -> Result<String> {
    let remotes = repo.remotes()?;
    if let Some(existing) = remotes.iter().find(|remote| remote.url == url) {
        return Ok(existing.name.clone());
    }
    let name = unique_remote_name(&remotes);
    repo.run("remote", &["add", name.as_str(), url])?;
    Ok(name)
}

fn finish(operation: &str, failed: Vec<String>) -> Result<()> {
    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::ComponentsFailed {
            operation: operation.to_string(),
            components: failed,
        })
    }
}
