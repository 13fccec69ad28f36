//! Sparse checkout of a single component.
//!
//! The component gets its own repository with `core.sparseCheckout` enabled.
//! Its metadata directory is then moved into the root repository's module
//! store (`<root git dir>/modules/<name>`), the same place `git submodule`
//! keeps metadata for full checkouts, and the working tree keeps only a
//! `gitdir:` redirect file.
//!
//! The relocation is several filesystem steps with no atomicity. If the
//! process dies between moving the metadata and writing the redirect, the
//! component directory has to be repaired by hand (move
//! `<store>/<name>` back to `<path>/.git`, or delete both and re-run). Nothing
//! is rolled back on failure; partial state stays on disk for inspection.
//!
//! Whether a component is already set up is judged only by the presence of
//! `<store>/info/sparse-checkout`. That file is written before the fetch, so
//! if the fetch or checkout fails (a dropped connection, a tag that does not
//! exist yet) the next install reports the component as already initialized
//! and succeeds with an empty working tree. Recover by deleting the component
//! directory and its store, or by running `git fetch` and `git checkout
//! <tag>` inside the component by hand.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::git::{self, GIT_MARKER};
use crate::manifest::Component;
use crate::reconcile::Reconciler;
use crate::report::Event;
use crate::repository::Repository;

use super::Strategy;

/// Where sparse-checkout patterns live inside a git directory.
const SPARSE_CHECKOUT_FILE: &str = "info/sparse-checkout";

/// Check out the subset of `component` described by its sparse specification.
///
/// Re-running is safe: when the module store already holds a
/// sparse-checkout file for this component nothing is done.
pub fn checkout(
    engine: &mut Reconciler<'_>,
    root: &Path,
    manifest_path: &Path,
    component: &Component,
) -> Result<()> {
    let (Some(spec), Some(revision)) = (
        component.sparse_spec.as_deref(),
        component.revision.as_deref(),
    ) else {
        return Err(Error::ManifestMalformed {
            path: manifest_path.to_path_buf(),
            message: format!(
                "section '{}' declares 'esmsparse' without 'esmtag'",
                component.name
            ),
        });
    };

    let target = root.join(&component.path);
    fs::create_dir_all(&target)?;

    let store = git::resolve_git_dir(root)?
        .join("modules")
        .join(&component.name);
    let sparse_file = store.join(SPARSE_CHECKOUT_FILE);
    if sparse_file.is_file() {
        warn!("submodule {} is already initialized", component.name);
        engine.report(Event::AlreadyInitialized {
            name: component.name.clone(),
        });
        return Ok(());
    }

    info!(
        "{}: sparse checkout of {} into {}",
        component.name,
        component.url,
        target.display()
    );

    let repo = Repository::new(engine.git(), &target);
    repo.run("init", &[])?;
    repo.config_set("core", "sparseCheckout", "true")?;
    repo.run("remote", &["add", "origin", component.url.as_str()])?;

    if let Some(parent) = store.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(target.join(GIT_MARKER), &store)?;
    git::write_gitdir_redirect(&target, &store)?;

    fs::create_dir_all(store.join("info"))?;
    fs::copy(target.join(spec), &sparse_file)?;

    repo.run("fetch", &["--depth=1", "origin", "--tags"])?;
    repo.checkout(revision)?;

    engine.report(Event::CheckedOut {
        name: component.name.clone(),
        strategy: Strategy::Sparse,
    });
    Ok(())
}
