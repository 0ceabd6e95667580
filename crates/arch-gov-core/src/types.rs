//! Resolution output types: resolved constraints, conflict reports, results.

use serde::{Deserialize, Serialize};

use crate::registry::model::{ArchId, Constraint, ConstraintValue, Hint, NodeMetadata, Pointer};

/// Severity level for constraints and conflict reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, does not fail checks.
    Info,
    /// Should be addressed; fails only in strict mode.
    Warning,
    /// Must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A constraint together with the id of the node or mixin that contributed
/// its winning value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConstraint {
    /// The merged constraint.
    #[serde(flatten)]
    pub constraint: Constraint,
    /// The most specific contributor of the current value.
    pub source: ArchId,
    /// Every contributor, in precedence order (root-first).
    pub contributors: Vec<ArchId>,
}

impl ResolvedConstraint {
    /// Creates a resolved constraint with a single contributor.
    #[must_use]
    pub fn new(constraint: Constraint, source: ArchId) -> Self {
        Self {
            constraint,
            contributors: vec![source.clone()],
            source,
        }
    }
}

/// The flattened, conflict-free rule set for one architecture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenedArchitecture {
    /// The resolved architecture id.
    pub arch_id: ArchId,
    /// Inheritance chain, leaf to root.
    pub inheritance_chain: Vec<ArchId>,
    /// Mixin ids applied during resolution, deduped, first-seen order.
    pub applied_mixins: Vec<ArchId>,
    /// The merged constraint set, one entry per rule.
    pub constraints: Vec<ResolvedConstraint>,
    /// Accumulated hints, deduped by normalized text.
    pub hints: Vec<Hint>,
    /// Accumulated pointers, deduped by exact URI.
    pub pointers: Vec<Pointer>,
    /// Accumulated expected intents, deduped by name.
    pub expected_intents: Vec<String>,
    /// Accumulated suggested intents, deduped by name.
    pub suggested_intents: Vec<String>,
    /// Accumulated reference implementations, deduped.
    pub reference_implementations: Vec<String>,
    /// Scalar metadata, nearest-defined-wins along the chain.
    #[serde(flatten)]
    pub metadata: NodeMetadata,
}

impl FlattenedArchitecture {
    /// Returns the resolved constraint for a rule, if present.
    ///
    /// The merged set holds at most one entry per rule.
    #[must_use]
    pub fn constraint(&self, rule: &str) -> Option<&ResolvedConstraint> {
        self.constraints.iter().find(|c| c.constraint.rule == rule)
    }

    /// Returns true if any constraint for the rule is present.
    #[must_use]
    pub fn has_rule(&self, rule: &str) -> bool {
        self.constraint(rule).is_some()
    }
}

/// One arbitration decision recorded during resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictReport {
    /// The rule that was arbitrated.
    pub rule: String,
    /// The winning value, if the decision produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ConstraintValue>,
    /// The id whose contribution won.
    pub winner: ArchId,
    /// The displaced contributor(s), comma-joined when several.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loser: Option<String>,
    /// Human-readable explanation of the decision.
    pub resolution: String,
    /// Advisory severity of the decision.
    pub severity: Severity,
}

/// Output of a single `resolve` call: the flattened architecture plus the
/// audit trail of every conflict arbitrated along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    /// The flattened rule set.
    pub architecture: FlattenedArchitecture,
    /// Arbitration audit trail.
    pub conflicts: Vec<ConflictReport>,
}

impl ResolutionResult {
    /// Returns true if any conflict meets or exceeds the severity threshold.
    #[must_use]
    pub fn has_conflicts_at(&self, severity: Severity) -> bool {
        self.conflicts.iter().any(|c| c.severity >= severity)
    }

    /// Counts conflicts by severity: (errors, warnings, infos).
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let errors = self
            .conflicts
            .iter()
            .filter(|c| c.severity == Severity::Error)
            .count();
        let warnings = self
            .conflicts
            .iter()
            .filter(|c| c.severity == Severity::Warning)
            .count();
        let infos = self
            .conflicts
            .iter()
            .filter(|c| c.severity == Severity::Info)
            .count();
        (errors, warnings, infos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(severities: &[Severity]) -> ResolutionResult {
        let arch_id = ArchId::new("domain.service").unwrap();
        ResolutionResult {
            architecture: FlattenedArchitecture {
                arch_id: arch_id.clone(),
                inheritance_chain: vec![arch_id.clone()],
                applied_mixins: vec![],
                constraints: vec![],
                hints: vec![],
                pointers: vec![],
                expected_intents: vec![],
                suggested_intents: vec![],
                reference_implementations: vec![],
                metadata: NodeMetadata::default(),
            },
            conflicts: severities
                .iter()
                .map(|&severity| ConflictReport {
                    rule: "max_file_lines".to_string(),
                    value: None,
                    winner: arch_id.clone(),
                    loser: None,
                    resolution: "test".to_string(),
                    severity,
                })
                .collect(),
        }
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn has_conflicts_at_threshold() {
        let result = make_result(&[Severity::Info, Severity::Warning]);
        assert!(result.has_conflicts_at(Severity::Info));
        assert!(result.has_conflicts_at(Severity::Warning));
        assert!(!result.has_conflicts_at(Severity::Error));
    }

    #[test]
    fn count_by_severity_buckets() {
        let result = make_result(&[Severity::Info, Severity::Warning, Severity::Warning]);
        assert_eq!(result.count_by_severity(), (0, 2, 1));
    }

    #[test]
    fn constraint_lookup_by_rule() {
        let arch_id = ArchId::new("svc").unwrap();
        let mut result = make_result(&[]);
        result.architecture.constraints.push(ResolvedConstraint::new(
            Constraint::new(
                "max_file_lines",
                ConstraintValue::Int(150),
                Severity::Error,
            ),
            arch_id,
        ));
        assert!(result.architecture.has_rule("max_file_lines"));
        assert!(result.architecture.constraint("forbid_import").is_none());
    }
}
