//! # Checkout Strategies
//!
//! A component is materialised in one of two ways:
//!
//! - **Full** (`full`): `git submodule update --init` on the component path,
//!   followed by recursion into any manifest found inside it.
//! - **Sparse** (`sparse`): a fresh repository restricted by a sparse-checkout
//!   specification, whose metadata is relocated into the root repository's
//!   module store.
//!
//! The choice is made only by whether the component declares `esmsparse`.

pub mod full;
pub mod sparse;

use std::fmt;

use crate::manifest::Component;

/// How a component is checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Full,
    Sparse,
}

impl Strategy {
    /// Sparse exactly when the component declares a sparse specification.
    pub fn for_component(component: &Component) -> Self {
        if component.sparse_spec.is_some() {
            Strategy::Sparse
        } else {
            Strategy::Full
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Full => f.write_str("full"),
            Strategy::Sparse => f.write_str("sparse"),
        }
    }
}
