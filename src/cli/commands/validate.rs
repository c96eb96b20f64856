//! validate command - Validate documents and the composition graph
//!
//! The default command. Exits 1 when any document error or cycle is found;
//! warnings are reported but never fail the run.

use std::process::ExitCode;

use anyhow::{bail, Context as _, Result};

use super::{load, verbosity};
use crate::core::types::Layer;
use crate::core::verify::verify_corpus;
use crate::engine::Context;
use crate::ui::{output, report};

/// Validate the corpus, optionally restricted to one layer's directory.
pub fn validate(ctx: &Context, layer: Option<Layer>, json: bool) -> Result<ExitCode> {
    let snapshot = load(ctx)?;
    let verbosity = verbosity(ctx);

    if let Some(layer) = layer {
        if snapshot.rules.get(layer).is_none() {
            bail!(
                "layer {} is not defined (known: {})",
                layer,
                snapshot.rules.range_label()
            );
        }
    }

    let result = verify_corpus(
        &snapshot.corpus.documents,
        &snapshot.graph,
        &snapshot.rules,
        layer,
    )
    .context("validation could not run")?;

    if json {
        output::json(&result)?;
    } else {
        let base = snapshot.paths.references_dir();
        output::print(report::render_validation(&result, &base), verbosity);
    }

    Ok(if result.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
