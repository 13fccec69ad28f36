//! # Output Styling
//!
//! Chooses between emoji and plain-text markers for progress lines. The
//! choice comes from `--color` and, in `auto` mode, from the environment:
//!
//! - `NO_COLOR` (any value) or `CLICOLOR=0` turn markers plain
//! - `CLICOLOR_FORCE` (non-empty, not `0`) forces emoji even without a TTY
//! - `TERM=dumb` turns markers plain
//!
//! Otherwise the terminal's own capabilities decide.

use std::env;

use clap::ValueEnum;

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    Always,
    Never,
    #[default]
    Auto,
}

/// Whether progress lines use emoji markers.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    pub fn new(choice: ColorChoice) -> Self {
        let use_color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => env_allows_color(|key| env::var(key).ok())
                .unwrap_or_else(|| console::Term::stdout().features().colors_supported()),
        };
        Self { use_color }
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// The text for `marker` under this configuration.
    pub fn marker(&self, marker: Marker) -> &'static str {
        let (emoji, plain) = marker.symbols();
        if self.use_color {
            emoji
        } else {
            plain
        }
    }
}

/// Decide from environment variables alone. `None` means the environment
/// expresses no preference and the terminal should be asked.
fn env_allows_color(var: impl Fn(&str) -> Option<String>) -> Option<bool> {
    if var("NO_COLOR").is_some() || var("CLICOLOR").as_deref() == Some("0") {
        return Some(false);
    }
    if var("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty() && v != "0") {
        return Some(true);
    }
    if var("TERM").as_deref() == Some("dumb") {
        return Some(false);
    }
    None
}

/// Leading marker of a progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Success,
    Skip,
    Info,
    Descend,
    Update,
    OutOfSync,
    NoTag,
    Failure,
}

impl Marker {
    /// `(emoji, plain)` pair.
    fn symbols(self) -> (&'static str, &'static str) {
        match self {
            Marker::Success => ("✅", "[OK]"),
            Marker::Skip => ("⏭️ ", "[SKIP]"),
            Marker::Info => ("ℹ️ ", "[INFO]"),
            Marker::Descend => ("🔍", "[SCAN]"),
            Marker::Update => ("⬆️ ", "[UPDATE]"),
            Marker::OutOfSync => ("⚠️ ", "[DIFF]"),
            Marker::NoTag => ("❔", "[NOTAG]"),
            Marker::Failure => ("❌", "[FAIL]"),
        }
    }
}
