//! The `resolve` subcommand: flatten one architecture.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::exit;

use arch_gov_core::{resolve, ArchId, Severity};

use crate::commands::output;
use crate::registry_source;
use crate::OutputFormat;

/// Resolves a single architecture and prints its flattened rule set.
///
/// # Errors
///
/// Fails when the registry cannot be loaded, the id is malformed, or
/// resolution fails (unknown id, unknown parent or mixin, cycle).
pub fn run(arch_id: &str, format: OutputFormat, strict: bool, registry: Option<&Path>) -> Result<()> {
    let registry = registry_source::locate_and_load(registry)?;

    let id = ArchId::new(arch_id).with_context(|| format!("invalid architecture id: {arch_id}"))?;
    let result = resolve(&registry, &id).with_context(|| format!("failed to resolve {id}"))?;

    output::print(&result, format)?;

    if strict && result.has_conflicts_at(Severity::Warning) {
        let (errors, warnings, _) = result.count_by_severity();
        tracing::warn!("{} conflict(s) at warning or above", errors + warnings);
        exit(1);
    }

    Ok(())
}
