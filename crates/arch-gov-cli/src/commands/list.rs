//! The `list` subcommand: enumerate registry contents.

use anyhow::Result;
use std::path::Path;

use arch_gov_core::ArchitectureNode;

use crate::registry_source;

/// Lists architectures and mixins with their kind and description.
///
/// # Errors
///
/// Fails when the registry cannot be loaded.
pub fn run(registry: Option<&Path>) -> Result<()> {
    let registry = registry_source::locate_and_load(registry)?;

    println!("architectures ({}):", registry.len());
    for node in registry.architectures() {
        print_entry(node);
    }

    let mixin_count = registry.mixins().count();
    if mixin_count > 0 {
        println!("\nmixins ({mixin_count}):");
        for node in registry.mixins() {
            print_entry(node);
        }
    }

    Ok(())
}

fn print_entry(node: &ArchitectureNode) {
    let mut line = format!("  {}", node.id);
    if let Some(kind) = &node.metadata.kind {
        line.push_str(&format!(" [{kind}]"));
    }
    if let Some(parent) = &node.inherits {
        line.push_str(&format!(" <- {parent}"));
    }
    println!("{line}");
    if let Some(description) = &node.metadata.description {
        println!("    {description}");
    }
}
