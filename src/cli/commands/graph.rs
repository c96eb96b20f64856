//! graph command - Show the composition graph

use std::process::ExitCode;

use anyhow::Result;

use super::{load, verbosity};
use crate::core::registry::adjacency;
use crate::engine::Context;
use crate::ui::{output, report};

/// Show each skill's compositions and dependents.
pub fn graph(ctx: &Context, json: bool) -> Result<ExitCode> {
    let snapshot = load(ctx)?;
    let entries = adjacency(&snapshot.graph);

    if json {
        output::json(&entries)?;
    } else {
        output::print(report::render_graph(&entries, &snapshot.graph), verbosity(ctx));
    }
    Ok(ExitCode::SUCCESS)
}
