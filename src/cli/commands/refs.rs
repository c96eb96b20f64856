//! refs command - List broken composition references

use std::process::ExitCode;

use anyhow::{Context as _, Result};

use super::{load, verbosity};
use crate::core::verify::find_broken_references;
use crate::engine::Context;
use crate::ui::{output, report};

/// List broken references; exits 1 when there are any.
pub fn refs(ctx: &Context) -> Result<ExitCode> {
    let snapshot = load(ctx)?;
    let broken = find_broken_references(&snapshot.corpus.documents, &snapshot.rules)
        .context("reference check could not run")?;

    let base = snapshot.paths.references_dir();
    let max_listed = snapshot.config.max_listed();
    output::print(
        report::render_broken_refs(&broken, &base, max_listed),
        verbosity(ctx),
    );

    Ok(if broken.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
