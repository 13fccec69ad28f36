//! Test doubles shared by the unit tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::git::GIT_MARKER;
use crate::report::{Event, Reporter};
use crate::repository::GitOperations;

/// One recorded git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub workdir: PathBuf,
    pub operation: String,
    pub args: Vec<String>,
}

impl Call {
    /// `operation` followed by its arguments, space separated.
    pub fn command_line(&self) -> String {
        std::iter::once(self.operation.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

type Handler = Box<dyn Fn(&Path, &str, &[&str]) -> Option<Result<String>> + Send + Sync>;

/// Mock git operations for testing
///
/// Every call is recorded. Handlers registered with the builder methods are
/// consulted in order; the first one returning `Some` decides the result.
/// Calls no handler answers succeed with empty output.
#[derive(Default)]
pub struct MockGit {
    calls: Mutex<Vec<Call>>,
    handlers: Vec<Handler>,
}

/// `key` is either an operation (`"remote"`) or an operation plus its first
/// argument (`"remote add"`).
fn matches(key: &str, operation: &str, args: &[&str]) -> bool {
    match key.split_once(' ') {
        Some((op, first)) => op == operation && args.first() == Some(&first),
        None => key == operation,
    }
}

impl MockGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw handler.
    pub fn handle<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Path, &str, &[&str]) -> Option<Result<String>> + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Answer calls matching `key` with `stdout`.
    pub fn respond(self, key: &str, stdout: &str) -> Self {
        let key = key.to_string();
        let stdout = stdout.to_string();
        self.handle(move |_, op, args| matches(&key, op, args).then(|| Ok(stdout.clone())))
    }

    /// Answer calls matching `key` run in `workdir` with `stdout`.
    pub fn respond_in(self, workdir: impl Into<PathBuf>, key: &str, stdout: &str) -> Self {
        let workdir = workdir.into();
        let key = key.to_string();
        let stdout = stdout.to_string();
        self.handle(move |dir, op, args| {
            (dir == workdir && matches(&key, op, args)).then(|| Ok(stdout.clone()))
        })
    }

    /// Fail calls matching `key` with the given exit code and stderr.
    pub fn fail(self, key: &str, exit_code: i32, stderr: &str) -> Self {
        let key = key.to_string();
        let stderr = stderr.to_string();
        self.handle(move |_, op, args| {
            matches(&key, op, args).then(|| {
                Err(Error::VcsOperationFailed {
                    operation: op.to_string(),
                    exit_code: Some(exit_code),
                    stderr: stderr.clone(),
                })
            })
        })
    }

    /// Fail calls matching `key` run in `workdir`.
    pub fn fail_in(self, workdir: impl Into<PathBuf>, key: &str, exit_code: i32, stderr: &str) -> Self {
        let workdir = workdir.into();
        let key = key.to_string();
        let stderr = stderr.to_string();
        self.handle(move |dir, op, args| {
            (dir == workdir && matches(&key, op, args)).then(|| {
                Err(Error::VcsOperationFailed {
                    operation: op.to_string(),
                    exit_code: Some(exit_code),
                    stderr: stderr.clone(),
                })
            })
        })
    }

    /// Run `effect` for calls matching `key`, then keep looking for a result.
    pub fn on<F>(self, key: &str, effect: F) -> Self
    where
        F: Fn(&Path, &[&str]) + Send + Sync + 'static,
    {
        let key = key.to_string();
        self.handle(move |dir, op, args| {
            if matches(&key, op, args) {
                effect(dir, args);
            }
            None
        })
    }

    /// Make `git init` create a `.git` directory and `git submodule update
    /// --init <path>` create a `.git` redirect file, like the real commands.
    pub fn simulating_checkouts(self) -> Self {
        self.on("init", |dir, _| {
            fs::create_dir_all(dir.join(GIT_MARKER).join("info")).unwrap();
        })
        .on("submodule update", |dir, args| {
            let path = args.last().unwrap();
            let target = dir.join(path);
            fs::create_dir_all(&target).unwrap();
            fs::write(target.join(GIT_MARKER), "gitdir: ../.git/modules/x\n").unwrap();
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls rendered as command lines, for compact assertions.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Call::command_line).collect()
    }
}

impl GitOperations for MockGit {
    fn execute(&self, workdir: &Path, operation: &str, args: &[&str]) -> Result<String> {
        self.calls.lock().unwrap().push(Call {
            workdir: workdir.to_path_buf(),
            operation: operation.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        for handler in &self.handlers {
            if let Some(result) = handler(workdir, operation, args) {
                return result;
            }
        }
        Ok(String::new())
    }
}

/// Reporter that keeps every event.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: Event) {
        self.events.push(event);
    }
}
