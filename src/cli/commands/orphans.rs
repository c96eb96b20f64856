//! orphans command - List skills nothing composes

use std::process::ExitCode;

use anyhow::Result;

use super::{load, verbosity};
use crate::core::analytics::Analytics;
use crate::engine::Context;
use crate::ui::{output, report};

/// List orphaned skills.
pub fn orphans(ctx: &Context, json: bool) -> Result<ExitCode> {
    let snapshot = load(ctx)?;
    let orphans = Analytics::new(&snapshot.graph, &snapshot.rules).orphan_entries();

    if json {
        output::json(&orphans)?;
    } else {
        output::print(report::render_orphans(&orphans), verbosity(ctx));
    }
    Ok(ExitCode::SUCCESS)
}
