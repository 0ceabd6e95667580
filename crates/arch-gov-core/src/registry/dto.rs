//! YAML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization. They are converted
//! to domain model types via the loader.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::model::ConstraintValue;

/// Raw YAML representation of a registry file: top-level `architectures:`
/// and `mixins:` maps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryDto {
    /// Architecture nodes keyed by id.
    #[serde(default)]
    pub architectures: BTreeMap<String, NodeDto>,

    /// Mixins keyed by id.
    #[serde(default)]
    pub mixins: BTreeMap<String, NodeDto>,
}

/// A duplicate id across merged registry files.
#[derive(Debug, thiserror::Error)]
#[error("duplicate {table} id `{id}` across registry files")]
pub struct DuplicateIdError {
    /// `architectures` or `mixins`.
    pub table: &'static str,
    /// The duplicated id.
    pub id: String,
}

impl RegistryDto {
    /// Merges another registry file into this one.
    ///
    /// # Errors
    ///
    /// Returns an error when an architecture or mixin id is defined in both.
    pub fn merge(&mut self, other: RegistryDto) -> Result<(), DuplicateIdError> {
        for (id, node) in other.architectures {
            if self.architectures.contains_key(&id) {
                return Err(DuplicateIdError {
                    table: "architectures",
                    id,
                });
            }
            self.architectures.insert(id, node);
        }
        for (id, node) in other.mixins {
            if self.mixins.contains_key(&id) {
                return Err(DuplicateIdError { table: "mixins", id });
            }
            self.mixins.insert(id, node);
        }
        Ok(())
    }
}

/// YAML representation of an architecture node or mixin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeDto {
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Why the node exists. Required for architecture nodes.
    #[serde(default)]
    pub rationale: Option<String>,
    /// Node kind (e.g. "service").
    #[serde(default)]
    pub kind: Option<String>,
    /// Parent architecture id.
    #[serde(default)]
    pub inherits: Option<String>,
    /// Mixin ids, in application order.
    #[serde(default)]
    pub mixins: Vec<String>,
    /// Constraints contributed by this node.
    #[serde(default)]
    pub constraints: Vec<ConstraintDto>,
    /// `"rule"` or `"rule:value"` exclusion tokens.
    #[serde(default)]
    pub exclude_constraints: Vec<String>,
    /// Free-text hints.
    #[serde(default)]
    pub hints: Vec<String>,
    /// `scheme://` pointers.
    #[serde(default)]
    pub pointers: Vec<String>,
    /// Contract description.
    #[serde(default)]
    pub contract: Option<String>,
    /// Version tag.
    #[serde(default)]
    pub version: Option<String>,
    /// Version from which the node is deprecated.
    #[serde(default)]
    pub deprecated_from: Option<String>,
    /// Migration guidance for deprecated nodes.
    #[serde(default)]
    pub migration_guide: Option<String>,
    /// File naming pattern.
    #[serde(default)]
    pub file_pattern: Option<String>,
    /// Default scaffold path.
    #[serde(default)]
    pub default_path: Option<String>,
    /// Code template pattern.
    #[serde(default)]
    pub code_pattern: Option<String>,
    /// Single-implementation flag.
    #[serde(default)]
    pub singleton: Option<bool>,
    /// Expected intent names.
    #[serde(default)]
    pub expected_intents: Vec<String>,
    /// Suggested intent names.
    #[serde(default)]
    pub suggested_intents: Vec<String>,
    /// Exemplary implementation references.
    #[serde(default)]
    pub reference_implementations: Vec<String>,
    /// Inline mode (mixins only): "allowed", "only" or "forbidden".
    #[serde(default)]
    pub inline: Option<String>,
}

/// YAML representation of one constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstraintDto {
    /// Rule name.
    pub rule: String,
    /// Rule value: string, number, list or structured object.
    pub value: ConstraintValue,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Grouping category.
    #[serde(default)]
    pub category: Option<String>,
    /// Why the constraint exists.
    #[serde(default)]
    pub why: Option<String>,
    /// Replace every inherited entry for the rule.
    #[serde(default, rename = "override")]
    pub override_prior: bool,
    /// Exclude comment text when matching.
    #[serde(default)]
    pub exclude_comments: Option<bool>,
    /// Escape conditions.
    #[serde(default)]
    pub unless: Vec<String>,
    /// Applicability condition.
    #[serde(default)]
    pub when: Option<String>,
    /// Applicability condition (alias of `when`).
    #[serde(default)]
    pub applies_when: Option<String>,
    /// A single suggested alternative.
    #[serde(default)]
    pub alternative: Option<String>,
    /// Suggested alternatives.
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Usage guidance.
    #[serde(default)]
    pub usage: Option<String>,
    /// Match mode: "all" or "any".
    #[serde(default, rename = "match")]
    pub match_mode: Option<String>,
}

fn default_severity_str() -> String {
    "error".to_string()
}
