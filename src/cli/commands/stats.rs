//! stats command - Totals, per-layer statistics and rankings

use std::process::ExitCode;

use anyhow::Result;

use super::{load, verbosity};
use crate::core::analytics::Analytics;
use crate::engine::Context;
use crate::ui::{output, report};

/// Show corpus statistics. `top` overrides the configured ranking size.
pub fn stats(ctx: &Context, top: Option<usize>, json: bool) -> Result<ExitCode> {
    let snapshot = load(ctx)?;
    let top = top.unwrap_or_else(|| snapshot.config.top());
    let stats = Analytics::new(&snapshot.graph, &snapshot.rules).stats(top);

    if json {
        output::json(&stats)?;
    } else {
        output::print(report::render_stats(&stats), verbosity(ctx));
    }
    Ok(ExitCode::SUCCESS)
}
