//! The `init` subcommand: write a starter registry file.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Starter registry written by `arch-gov init`.
const DEFAULT_REGISTRY: &str = r#"# arch-gov registry
#
# Architectures inherit single parents via `inherits` and compose
# reusable rule bundles via `mixins`. Resolve one with:
#
#   arch-gov resolve domain.service

architectures:
  domain.base:
    rationale: "Domain code stays free of infrastructure concerns"
    kind: layer
    constraints:
      - rule: forbid_import
        value: [infrastructure]
        severity: error
        why: "Domain must not depend on adapters"

  domain.service:
    inherits: domain.base
    rationale: "Stateless application services over the domain"
    kind: service
    mixins: [logging]
    hints:
      - "Keep services stateless; inject repositories"

mixins:
  logging:
    constraints:
      - rule: require_import
        value: [log]
        severity: warning
        why: "Services log their entry points"
"#;

/// Creates `arch-gov.yaml` in the current directory.
///
/// # Errors
///
/// Fails when the file already exists (unless `force`) or cannot be
/// written.
pub fn run(force: bool) -> Result<()> {
    let path = Path::new("arch-gov.yaml");

    if path.exists() && !force {
        bail!("arch-gov.yaml already exists (use --force to overwrite)");
    }

    std::fs::write(path, DEFAULT_REGISTRY).context("failed to write arch-gov.yaml")?;
    println!("created arch-gov.yaml");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::DEFAULT_REGISTRY;
    use arch_gov_core::load_registry_from_yaml;

    #[test]
    fn starter_registry_is_valid() {
        let registry = load_registry_from_yaml(DEFAULT_REGISTRY).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.mixins().count(), 1);
    }

    #[test]
    fn starter_registry_resolves() {
        use arch_gov_core::{resolve, ArchId};

        let registry = load_registry_from_yaml(DEFAULT_REGISTRY).unwrap();
        let id = ArchId::new("domain.service").unwrap();
        let result = resolve(&registry, &id).unwrap();

        assert!(result.architecture.has_rule("forbid_import"));
        assert!(result.architecture.has_rule("require_import"));
        assert!(result.conflicts.is_empty());
    }
}
