//! # Manifest Reader
//!
//! Loads a `.gitmodules`-style manifest into an ordered list of [`Component`]
//! records. The file is a sectioned key-value document; each section declares
//! one component with the keys:
//!
//! | key           | meaning                                          |
//! |---------------|--------------------------------------------------|
//! | `path`        | checkout location relative to the root (required)|
//! | `url`         | remote to clone from (required)                  |
//! | `esmtag`      | declared revision                                |
//! | `esmrequired` | requirement class token: `T:T`, `T:F`, `I:T`, `I:F` |
//! | `esmsparse`   | sparse-checkout specification file               |
//!
//! Every declared section is validated before include/exclude filtering is
//! applied, so a broken entry is reported even when the caller asked for a
//! different component.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, ParseOption};

use crate::error::{Error, Result};
use crate::path::section_component_name;

/// Default manifest filename, also used for nested manifests.
pub const DEFAULT_MANIFEST: &str = ".gitmodules";

/// Whether a component is needed for a tested or an internal configuration,
/// and whether it is required there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementClass {
    /// `T:T`
    TestedRequired,
    /// `T:F`
    TestedOptional,
    /// `I:T`
    InternalRequired,
    /// `I:F`
    InternalOptional,
}

impl RequirementClass {
    /// The manifest token for this class.
    pub fn token(self) -> &'static str {
        match self {
            RequirementClass::TestedRequired => "T:T",
            RequirementClass::TestedOptional => "T:F",
            RequirementClass::InternalRequired => "I:T",
            RequirementClass::InternalOptional => "I:F",
        }
    }
}

impl FromStr for RequirementClass {
    type Err = String;

    fn from_str(token: &str) -> std::result::Result<Self, Self::Err> {
        match token.trim() {
            "T:T" => Ok(RequirementClass::TestedRequired),
            "T:F" => Ok(RequirementClass::TestedOptional),
            "I:T" => Ok(RequirementClass::InternalRequired),
            "I:F" => Ok(RequirementClass::InternalOptional),
            other => Err(format!(
                "unknown requirement class '{}' (expected T:T, T:F, I:T or I:F)",
                other
            )),
        }
    }
}

impl fmt::Display for RequirementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The set of requirement classes an install pass checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedClasses(Vec<RequirementClass>);

impl AcceptedClasses {
    /// Classes accepted by a top-level install; `optional` adds `T:F`.
    pub fn install(optional: bool) -> Self {
        let mut classes = vec![
            RequirementClass::TestedRequired,
            RequirementClass::InternalRequired,
        ];
        if optional {
            classes.push(RequirementClass::TestedOptional);
        }
        Self(classes)
    }

    /// Classes accepted inside nested manifests.
    pub fn internal_only() -> Self {
        Self(vec![RequirementClass::InternalRequired])
    }

    /// Unclassified components are never accepted.
    pub fn contains(&self, class: Option<RequirementClass>) -> bool {
        class.is_some_and(|class| self.0.contains(&class))
    }
}

/// Include/exclude lists supplied by the caller.
///
/// Matching is exact and case-sensitive. Exclusion always wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl ComponentFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    /// Whether a component named `name` passes the filter.
    pub fn allows(&self, name: &str) -> bool {
        if self.exclude.iter().any(|excluded| excluded == name) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|included| included == name)
    }
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub path: PathBuf,
    pub url: String,
    pub revision: Option<String>,
    pub requirement_class: Option<RequirementClass>,
    pub sparse_spec: Option<PathBuf>,
}

impl Component {
    /// Whether this component is declared optional for the tested
    /// configuration, the only class whose skipping is reported.
    pub fn is_tested_optional(&self) -> bool {
        self.requirement_class == Some(RequirementClass::TestedOptional)
    }
}

/// A loaded manifest: its location and the filtered component records, in
/// declaration order.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    components: Vec<Component>,
}

impl Manifest {
    /// Load `<root>/<file_name>` and keep the components `filter` allows.
    pub fn load(root: &Path, file_name: &str, filter: &ComponentFilter) -> Result<Self> {
        let path = root.join(file_name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound { path });
            }
            Err(e) => return Err(Error::Io(e)),
        };
        Self::parse(path, &content, filter)
    }

    /// Parse manifest `content`; `path` is only used for error messages.
    pub fn parse(path: PathBuf, content: &str, filter: &ComponentFilter) -> Result<Self> {
        let malformed = |message: String| Error::ManifestMalformed {
            path: path.clone(),
            message,
        };

        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options).map_err(|e| malformed(e.to_string()))?;

        let mut names = HashSet::new();
        let mut paths = HashSet::new();
        let mut components = Vec::new();

        for (section, properties) in ini.iter() {
            let Some(section) = section else {
                continue;
            };
            let name = section_component_name(section).to_string();

            // Empty values are treated the same as absent keys.
            let get = |key: &str| {
                properties
                    .get(key)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
            };

            let component_path = get("path").ok_or_else(|| {
                malformed(format!("section '{}' is missing required key 'path'", name))
            })?;
            let url = get("url").ok_or_else(|| {
                malformed(format!("section '{}' is missing required key 'url'", name))
            })?;
            let requirement_class = get("esmrequired")
                .map(|token| {
                    token
                        .parse::<RequirementClass>()
                        .map_err(|e| malformed(format!("section '{}': {}", name, e)))
                })
                .transpose()?;
            let revision = get("esmtag").map(str::to_string);
            let sparse_spec = get("esmsparse").map(PathBuf::from);

            if !names.insert(name.clone()) {
                return Err(malformed(format!("duplicate component '{}'", name)));
            }
            if !paths.insert(component_path.to_string()) {
                return Err(malformed(format!(
                    "component '{}' reuses path '{}'",
                    name, component_path
                )));
            }

            components.push(Component {
                name,
                path: PathBuf::from(component_path),
                url: url.to_string(),
                revision,
                requirement_class,
                sparse_spec,
            });
        }

        components.retain(|component| filter.allows(&component.name));

        Ok(Self { path, components })
    }

    /// Location of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
