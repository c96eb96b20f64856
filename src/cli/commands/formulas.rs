//! formulas command - Check formulas on layers that require them

use std::process::ExitCode;

use anyhow::Result;

use super::{load, verbosity};
use crate::core::verify::formula_report;
use crate::engine::Context;
use crate::ui::{output, report};

/// Report missing and malformed formulas.
///
/// Formula problems are warnings, so this never fails the run.
pub fn formulas(ctx: &Context) -> Result<ExitCode> {
    let snapshot = load(ctx)?;
    let result = formula_report(&snapshot.corpus.documents, &snapshot.rules);

    let base = snapshot.paths.references_dir();
    output::print(report::render_formulas(&result, &base), verbosity(ctx));
    Ok(ExitCode::SUCCESS)
}
