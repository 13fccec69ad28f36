//! CLI argument parsing and action dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::info;

use git_fleximod::manifest::{AcceptedClasses, ComponentFilter, Manifest, DEFAULT_MANIFEST};
use git_fleximod::output::{ColorChoice, OutputConfig};
use git_fleximod::reconcile::{Action, Reconciler};
use git_fleximod::report::ConsoleReporter;
use git_fleximod::repository::DefaultGitOperations;

/// Manage checking out groups of git submodules, with optional and sparse
/// components
#[derive(Parser, Debug)]
#[command(name = "git-fleximod")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Specific component(s) to process. By default all required submodules
    /// are checked out.
    #[arg(value_name = "COMPONENT")]
    components: Vec<String>,

    /// Top-level repository directory (defaults to current directory)
    #[arg(short = 'C', long, value_name = "DIR", env = "GIT_FLEXIMOD_PATH")]
    path: Option<PathBuf>,

    /// The submodule description filename
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_MANIFEST,
        env = "GIT_FLEXIMOD_GITMODULES"
    )]
    gitmodules: String,

    /// Component(s) listed in the manifest which should be ignored
    #[arg(short = 'x', long, value_name = "COMPONENT", num_args = 1..)]
    exclude: Vec<String>,

    /// Also check out optional (T:F) submodules
    #[arg(short, long)]
    optional: bool,

    /// Report the status of each submodule against its declared tag
    #[arg(short = 'S', long)]
    status: bool,

    /// Update checked-out submodules to the tags declared in the manifest
    #[arg(short, long)]
    update: bool,

    /// Increase logging verbosity (can be given twice)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log everything, including each git invocation
    #[arg(short, long)]
    debug: bool,

    /// Show the full error chain on failure
    #[arg(long)]
    pub backtrace: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

impl Cli {
    /// Execute the selected action
    pub fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.debug);

        let action = Action::from_flags(self.status, self.update);
        info!("action is {}", action);

        let root = match self.path {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        let filter = ComponentFilter::new(self.components, self.exclude);
        let manifest = Manifest::load(&root, &self.gitmodules, &filter)?;

        let git = DefaultGitOperations;
        let mut reporter = ConsoleReporter::new(OutputConfig::new(self.color));
        let mut engine = Reconciler::new(&git, &mut reporter);
        engine.run(
            action,
            &root,
            &manifest,
            &AcceptedClasses::install(self.optional),
        )?;
        Ok(())
    }
}

/// Map `--verbose`/`--debug` onto a default log filter; `RUST_LOG` wins.
fn log_level(verbose: u8, debug: bool) -> &'static str {
    if debug {
        return "trace";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_logging(verbose: u8, debug: bool) {
    let env = env_logger::Env::default().default_filter_or(log_level(verbose, debug));
    // A logger may already be installed when running under a test harness.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
