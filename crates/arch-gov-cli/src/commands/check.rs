//! The `check` subcommand: resolve every architecture in the registry.

use anyhow::Result;
use std::path::Path;
use std::process::exit;

use arch_gov_core::{resolve, ResolutionResult, Severity};

use crate::commands::output;
use crate::registry_source;
use crate::OutputFormat;

/// Resolves all architectures, reporting failures and conflicts.
///
/// Exit codes: 0 when every architecture resolves (conflicts below the
/// strictness threshold allowed), 1 otherwise.
///
/// # Errors
///
/// Fails when the registry cannot be loaded.
pub fn run(format: OutputFormat, strict: bool, registry: Option<&Path>) -> Result<()> {
    let registry = registry_source::locate_and_load(registry)?;

    let mut results: Vec<ResolutionResult> = Vec::new();
    let mut failures = 0usize;

    for node in registry.architectures() {
        match resolve(&registry, &node.id) {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::error!("{}: {e}", node.id);
                failures += 1;
            }
        }
    }

    match format {
        OutputFormat::Text => print_text(&results, failures),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&results)?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&results)?;
            println!("{yaml}");
        }
    }

    let threshold = if strict {
        Severity::Warning
    } else {
        Severity::Error
    };
    let flagged = results.iter().any(|r| r.has_conflicts_at(threshold));
    if failures > 0 || flagged {
        exit(1);
    }

    Ok(())
}

fn print_text(results: &[ResolutionResult], failures: usize) {
    let mut errors = 0usize;
    let mut warnings = 0usize;
    let mut infos = 0usize;

    for result in results {
        let (e, w, i) = result.count_by_severity();
        errors += e;
        warnings += w;
        infos += i;
        if !result.conflicts.is_empty() {
            println!("{}:", result.architecture.arch_id);
            output::print_conflicts(result);
            println!();
        }
    }

    println!(
        "checked {} architecture(s): {failures} failed, {errors} error(s), \
         {warnings} warning(s), {infos} info",
        results.len() + failures
    );
}
