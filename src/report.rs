//! Progress reporting for operators.
//!
//! The engine never prints directly. It emits [`Event`]s to a [`Reporter`];
//! the CLI installs a [`ConsoleReporter`], tests record events instead.

use std::path::PathBuf;

use crate::checkout::Strategy;
use crate::output::{Marker, OutputConfig};
use crate::reconcile::{StatusLine, SyncState};

/// Something an operator should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A `T:F` component was left alone because optional checkout is off.
    Skipped { name: String },
    /// A component finished checking out.
    CheckedOut { name: String, strategy: Strategy },
    /// A sparse component was already set up; nothing was done.
    AlreadyInitialized { name: String },
    /// A nested manifest was found and is about to be processed.
    Descending { name: String, path: PathBuf },
    /// One status line per component.
    Status(StatusLine),
    /// A component was moved to its declared revision.
    Updated {
        name: String,
        revision: String,
        url: String,
    },
    /// A component has no declared revision so update left it untouched.
    UpdateSkipped { name: String },
    /// A component failed; processing may continue with its siblings.
    Failed { name: String, message: String },
}

/// Sink for engine events.
pub trait Reporter {
    fn report(&mut self, event: Event);
}

/// Prints events to the terminal.
pub struct ConsoleReporter {
    output: OutputConfig,
}

impl ConsoleReporter {
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    /// Render an event as the line the console shows.
    pub fn render(&self, event: &Event) -> String {
        let out = &self.output;
        match event {
            Event::Skipped { name } => format!(
                "{} Skipping optional component {}",
                out.marker(Marker::Skip),
                name
            ),
            Event::CheckedOut { name, strategy } => match strategy {
                Strategy::Full => {
                    format!("{} Successfully checked out {}", out.marker(Marker::Success), name)
                }
                Strategy::Sparse => format!(
                    "{} Successfully checked out {} (sparse)",
                    out.marker(Marker::Success),
                    name
                ),
            },
            Event::AlreadyInitialized { name } => format!(
                "{} Submodule {} is already initialized",
                out.marker(Marker::Info),
                name
            ),
            Event::Descending { name, path } => format!(
                "{} Recursively checking out submodules of {} {}",
                out.marker(Marker::Descend),
                name,
                path.display()
            ),
            Event::Status(line) => {
                let marker = match line.state {
                    SyncState::InSync => out.marker(Marker::Success),
                    SyncState::OutOfSync => out.marker(Marker::OutOfSync),
                    SyncState::Undeclared => out.marker(Marker::NoTag),
                };
                format!("{} {}", marker, line)
            }
            Event::Updated {
                name,
                revision,
                url,
            } => format!(
                "{} Updated {} to {} from {}",
                out.marker(Marker::Update),
                name,
                revision,
                url
            ),
            Event::UpdateSkipped { name } => format!(
                "{} Submodule {} has no tag defined in .gitmodules, left unchanged",
                out.marker(Marker::NoTag),
                name
            ),
            Event::Failed { name, message } => {
                format!("{} {}: {}", out.marker(Marker::Failure), name, message)
            }
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: Event) {
        let line = self.render(&event);
        if matches!(event, Event::Failed { .. }) {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}
