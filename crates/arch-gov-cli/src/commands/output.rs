//! Shared output formatting for resolution results.

use anyhow::Result;
use arch_gov_core::{ResolutionResult, Severity};

use crate::OutputFormat;

/// Prints a resolution result in the specified format.
pub fn print(result: &ResolutionResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result)?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(result)?;
            println!("{yaml}");
        }
    }
    Ok(())
}

fn print_text(result: &ResolutionResult) {
    let arch = &result.architecture;

    println!("architecture: {}", arch.arch_id);
    println!(
        "chain: {}",
        arch.inheritance_chain
            .iter()
            .map(std::string::ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    if !arch.applied_mixins.is_empty() {
        println!(
            "mixins: {}",
            arch.applied_mixins
                .iter()
                .map(std::string::ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if let Some(description) = &arch.metadata.description {
        println!("description: {description}");
    }

    println!("\nconstraints ({}):", arch.constraints.len());
    for entry in &arch.constraints {
        let c = &entry.constraint;
        println!(
            "  {} = {} [{}] (from {})",
            c.rule, c.value, c.severity, entry.source
        );
        if let Some(why) = &c.why {
            println!("    why: {why}");
        }
    }

    if !arch.hints.is_empty() {
        println!("\nhints:");
        for hint in &arch.hints {
            println!("  - {}", hint.as_str());
        }
    }
    if !arch.pointers.is_empty() {
        println!("\npointers:");
        for pointer in &arch.pointers {
            println!("  - {}", pointer.as_str());
        }
    }

    print_conflicts(result);
}

/// Prints the conflict audit trail with colored severities.
pub fn print_conflicts(result: &ResolutionResult) {
    if result.conflicts.is_empty() {
        return;
    }

    println!("\nconflicts ({}):", result.conflicts.len());
    for conflict in &result.conflicts {
        let severity_indicator = match conflict.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };
        match &conflict.loser {
            Some(loser) => println!(
                "  {severity_indicator} {}: {} beats {} ({})",
                conflict.rule, conflict.winner, loser, conflict.resolution
            ),
            None => println!(
                "  {severity_indicator} {}: {} ({})",
                conflict.rule, conflict.winner, conflict.resolution
            ),
        }
    }
}
