//! registry command - Write the registry snapshot

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context as _, Result};

use super::{load, verbosity};
use crate::core::registry::RegistrySnapshot;
use crate::engine::Context;
use crate::ui::{output, report};

/// Build the snapshot and write it atomically.
pub fn registry(ctx: &Context, output_path: Option<&Path>) -> Result<ExitCode> {
    let snapshot = load(ctx)?;

    let path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| snapshot.paths.registry_path());

    let registry = RegistrySnapshot::build(
        &snapshot.graph,
        &snapshot.corpus.documents,
        &snapshot.rules,
        snapshot.config.top(),
    );
    registry
        .write_atomic(&path)
        .with_context(|| format!("failed to write registry snapshot to '{}'", path.display()))?;

    output::success(report::render_registry_written(&registry, &path), verbosity(ctx));
    Ok(ExitCode::SUCCESS)
}
