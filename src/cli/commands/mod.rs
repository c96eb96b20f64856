//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Scans the corpus through the engine
//! 2. Runs the core analysis it needs
//! 3. Formats and displays output
//!
//! Handlers return the process exit code. Findings that fail a run
//! (validation errors, broken references) map to exit code 1; operational
//! failures propagate as errors.

mod completion;
mod formulas;
mod graph;
mod orphans;
mod refs;
mod registry;
mod stats;
mod validate;

pub use completion::completion;
pub use formulas::formulas;
pub use graph::graph;
pub use orphans::orphans;
pub use refs::refs;
pub use registry::registry;
pub use stats::stats;
pub use validate::validate;

use std::process::ExitCode;

use anyhow::Result;

use super::args::Command;
use crate::engine::{Context, CorpusSnapshot};
use crate::ui::output::{self, Verbosity};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<ExitCode> {
    match command {
        Command::Validate { layer, json } => validate(ctx, layer, json),
        Command::Graph { json } => graph(ctx, json),
        Command::Stats { top, json } => stats(ctx, top.map(|n| n as usize), json),
        Command::Orphans { json } => orphans(ctx, json),
        Command::Formulas => formulas(ctx),
        Command::Refs => refs(ctx),
        Command::Registry { output } => registry(ctx, output.as_deref()),
        Command::Completion { shell } => {
            completion(shell)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Verbosity for a context.
fn verbosity(ctx: &Context) -> Verbosity {
    Verbosity::from_flags(ctx.quiet, ctx.debug)
}

/// Scan the corpus and surface config warnings.
fn load(ctx: &Context) -> Result<CorpusSnapshot> {
    let snapshot = ctx.scan()?;
    let verbosity = verbosity(ctx);
    for warning in &snapshot.config_warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    Ok(snapshot)
}
