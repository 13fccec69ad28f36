//! Full checkout of a component through git's own submodule machinery.

use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::git::has_metadata;
use crate::manifest::{AcceptedClasses, Component, ComponentFilter, Manifest, DEFAULT_MANIFEST};
use crate::reconcile::Reconciler;
use crate::report::Event;
use crate::repository::Repository;

use super::Strategy;

/// Initialise and fetch `component` inside the repository at `root`.
///
/// If the populated directory has its own manifest, its internal-required
/// components are installed first, with the component directory as their
/// root. The component must carry a `.git` marker afterwards.
pub fn checkout(engine: &mut Reconciler<'_>, root: &Path, component: &Component) -> Result<()> {
    let repo = Repository::new(engine.git(), root);
    let path = component.path.to_string_lossy();
    repo.run("submodule", &["update", "--init", path.as_ref()])?;

    let dir = root.join(&component.path);
    if dir.join(DEFAULT_MANIFEST).is_file() {
        info!(
            "{}: found nested manifest in {}",
            component.name,
            dir.display()
        );
        engine.report(Event::Descending {
            name: component.name.clone(),
            path: dir.clone(),
        });
        let nested = Manifest::load(&dir, DEFAULT_MANIFEST, &ComponentFilter::default())?;
        engine.install(&dir, &nested, &AcceptedClasses::internal_only())?;
    }

    if !has_metadata(&dir) {
        return Err(Error::CheckoutVerificationFailed {
            component: component.name.clone(),
            path: dir,
        });
    }

    engine.report(Event::CheckedOut {
        name: component.name.clone(),
        strategy: Strategy::Full,
    });
    Ok(())
}
