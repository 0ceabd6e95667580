//! Constraint arbitration.
//!
//! Folds constraint contributions through the fixed precedence order —
//! root mixins, root's own constraints, then each more specific node's
//! mixins and own constraints down to the leaf. Later contributions win
//! precisely because they are more specific.
//!
//! The accumulator holds at most one entry per rule. Cumulative rules
//! union their list values; singular rules replace on conflict; a
//! constraint marked `override` evicts everything its rule accumulated so
//! far. Every arbitration decision is recorded as a [`ConflictReport`].

use crate::registry::model::{ArchId, ArchitectureNode, Constraint, ConstraintValue};
use crate::rules::RuleKind;
use crate::types::{ConflictReport, ResolvedConstraint, Severity};

use super::mixins::ExpandedNode;

/// Merged constraints plus the arbitration audit trail.
#[derive(Debug)]
pub struct ArbiterOutcome {
    /// One resolved constraint per surviving rule, first-installed order.
    pub constraints: Vec<ResolvedConstraint>,
    /// Every arbitration decision, in the order it was made.
    pub conflicts: Vec<ConflictReport>,
}

/// Merges all constraint contributions of the expanded chain.
///
/// `expanded` must be in precedence order (root-first), as produced by the
/// mixin expander. Input nodes are never mutated.
#[must_use]
pub fn merge(expanded: &[ExpandedNode<'_>]) -> ArbiterOutcome {
    let mut acc: Vec<ResolvedConstraint> = Vec::new();
    let mut conflicts: Vec<ConflictReport> = Vec::new();

    for entry in expanded {
        apply_exclusions(&mut acc, &mut conflicts, entry.node);

        for mixin in &entry.mixins {
            for constraint in &mixin.constraints {
                apply(&mut acc, &mut conflicts, constraint, &mixin.id);
            }
        }
        for constraint in &entry.node.constraints {
            apply(&mut acc, &mut conflicts, constraint, &entry.node.id);
        }
    }

    ArbiterOutcome {
        constraints: acc,
        conflicts,
    }
}

/// Removes inherited entries matched by the node's exclusion tokens.
///
/// Runs when the fold enters a node, before any of that node's own
/// contributions: a node prunes what it inherited, it cannot cancel its
/// own constraints. A token matching nothing is recorded as an info-level
/// no-op, never an error.
fn apply_exclusions(
    acc: &mut Vec<ResolvedConstraint>,
    conflicts: &mut Vec<ConflictReport>,
    node: &ArchitectureNode,
) {
    for token in &node.exclude_constraints {
        let matched = match &token.value {
            None => {
                let before = acc.len();
                acc.retain(|entry| entry.constraint.rule != token.rule);
                acc.len() < before
            }
            Some(element) => exclude_element(acc, &token.rule, element),
        };

        if matched {
            tracing::debug!(node = %node.id, token = %token, "exclusion applied");
        } else {
            conflicts.push(ConflictReport {
                rule: token.rule.clone(),
                value: token.value.clone().map(ConstraintValue::Text),
                winner: node.id.clone(),
                loser: None,
                resolution: format!("exclusion `{token}` matched no inherited constraint"),
                severity: Severity::Info,
            });
        }
    }
}

/// Removes one element from a cumulative rule's unioned list.
///
/// Returns true if the element was present. Value tokens only apply to
/// cumulative (list-valued) entries.
fn exclude_element(acc: &mut Vec<ResolvedConstraint>, rule: &str, element: &str) -> bool {
    let Some(index) = acc.iter().position(|entry| entry.constraint.rule == rule) else {
        return false;
    };
    let ConstraintValue::List(items) = &mut acc[index].constraint.value else {
        return false;
    };
    let before = items.len();
    items.retain(|item| item != element);
    if items.len() == before {
        return false;
    }
    // An entry emptied by exclusion is dropped entirely; constraints never
    // carry empty values.
    if items.is_empty() {
        acc.remove(index);
    }
    true
}

/// Merges one incoming constraint into the accumulator.
fn apply(
    acc: &mut Vec<ResolvedConstraint>,
    conflicts: &mut Vec<ConflictReport>,
    incoming: &Constraint,
    source: &ArchId,
) {
    if incoming.is_override {
        apply_override(acc, conflicts, incoming, source);
        return;
    }

    let Some(index) = acc
        .iter()
        .position(|entry| entry.constraint.rule == incoming.rule)
    else {
        acc.push(ResolvedConstraint::new(incoming.clone(), source.clone()));
        return;
    };

    match RuleKind::classify(&incoming.rule) {
        Some(RuleKind::Cumulative) => merge_cumulative(&mut acc[index], incoming, source),
        _ => replace_singular(acc, conflicts, index, incoming, source),
    }
}

/// `override: true` evicts every prior entry for the rule and installs the
/// incoming constraint alone.
fn apply_override(
    acc: &mut Vec<ResolvedConstraint>,
    conflicts: &mut Vec<ConflictReport>,
    incoming: &Constraint,
    source: &ArchId,
) {
    let losers: Vec<String> = acc
        .iter()
        .filter(|entry| entry.constraint.rule == incoming.rule)
        .map(|entry| entry.source.to_string())
        .collect();
    acc.retain(|entry| entry.constraint.rule != incoming.rule);
    acc.push(ResolvedConstraint::new(incoming.clone(), source.clone()));

    if !losers.is_empty() {
        conflicts.push(ConflictReport {
            rule: incoming.rule.clone(),
            value: Some(incoming.value.clone()),
            winner: source.clone(),
            loser: Some(losers.join(", ")),
            resolution: "override".to_string(),
            severity: Severity::Info,
        });
    }
}

/// Unions the incoming list into the existing entry; keeps the most
/// restrictive severity and records the new contributor. Additive merges
/// are expected, not conflicts.
fn merge_cumulative(entry: &mut ResolvedConstraint, incoming: &Constraint, source: &ArchId) {
    if let (ConstraintValue::List(existing), Some(new_items)) =
        (&mut entry.constraint.value, incoming.value.as_list())
    {
        for item in new_items {
            if !existing.contains(item) {
                existing.push(item.clone());
            }
        }
    }
    entry.constraint.severity = entry.constraint.severity.max(incoming.severity);
    entry.source = source.clone();
    if !entry.contributors.contains(source) {
        entry.contributors.push(source.clone());
    }
}

/// Replaces a singular entry with the more specific incoming value.
/// An identical value is dropped silently; a differing one wins and is
/// recorded as a warning-level conflict.
fn replace_singular(
    acc: &mut [ResolvedConstraint],
    conflicts: &mut Vec<ConflictReport>,
    index: usize,
    incoming: &Constraint,
    source: &ArchId,
) {
    let existing = &acc[index];
    if existing.constraint.value == incoming.value {
        return;
    }

    let report = ConflictReport {
        rule: incoming.rule.clone(),
        value: Some(incoming.value.clone()),
        winner: source.clone(),
        loser: Some(existing.source.to_string()),
        resolution: format!(
            "`{}` overrides `{}` {} {}→{}",
            source, existing.source, incoming.rule, existing.constraint.value, incoming.value,
        ),
        severity: Severity::Warning,
    };
    tracing::debug!(rule = %incoming.rule, winner = %source, "singular replacement");

    acc[index] = ResolvedConstraint::new(incoming.clone(), source.clone());
    conflicts.push(report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::{ArchId, ExcludeToken};

    fn id(s: &str) -> ArchId {
        ArchId::new(s).unwrap()
    }

    fn list(items: &[&str]) -> ConstraintValue {
        ConstraintValue::List(items.iter().map(|s| (*s).to_string()).collect())
    }

    fn constraint(rule: &str, value: ConstraintValue) -> Constraint {
        Constraint::new(rule, value, Severity::Error)
    }

    fn expanded<'a>(nodes: &'a [ArchitectureNode]) -> Vec<ExpandedNode<'a>> {
        nodes
            .iter()
            .map(|node| ExpandedNode {
                node,
                mixins: vec![],
            })
            .collect()
    }

    fn node_with(name: &str, constraints: Vec<Constraint>) -> ArchitectureNode {
        let mut node = ArchitectureNode::new(id(name));
        node.constraints = constraints;
        node
    }

    // -- Cumulative --

    #[test]
    fn cumulative_union_no_conflict() {
        let nodes = vec![
            node_with("base", vec![constraint("forbid_import", list(&["fs"]))]),
            node_with("svc", vec![constraint("forbid_import", list(&["http", "fs"]))]),
        ];
        let outcome = merge(&expanded(&nodes));

        assert_eq!(outcome.constraints.len(), 1);
        let entry = &outcome.constraints[0];
        assert_eq!(entry.constraint.value, list(&["fs", "http"]));
        assert_eq!(entry.source, id("svc"));
        assert_eq!(entry.contributors, vec![id("base"), id("svc")]);
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn cumulative_keeps_most_restrictive_severity() {
        let mut weak = constraint("forbid_import", list(&["http"]));
        weak.severity = Severity::Warning;
        let nodes = vec![
            node_with("base", vec![constraint("forbid_import", list(&["fs"]))]),
            node_with("svc", vec![weak]),
        ];
        let outcome = merge(&expanded(&nodes));
        assert_eq!(outcome.constraints[0].constraint.severity, Severity::Error);
    }

    // -- Singular --

    #[test]
    fn singular_replacement_reports_warning() {
        let nodes = vec![
            node_with("base", vec![constraint("max_file_lines", ConstraintValue::Int(300))]),
            node_with("svc", vec![constraint("max_file_lines", ConstraintValue::Int(150))]),
        ];
        let outcome = merge(&expanded(&nodes));

        assert_eq!(outcome.constraints.len(), 1);
        assert_eq!(
            outcome.constraints[0].constraint.value,
            ConstraintValue::Int(150)
        );
        assert_eq!(outcome.constraints[0].source, id("svc"));

        assert_eq!(outcome.conflicts.len(), 1);
        let conflict = &outcome.conflicts[0];
        assert_eq!(conflict.rule, "max_file_lines");
        assert_eq!(conflict.winner, id("svc"));
        assert_eq!(conflict.loser.as_deref(), Some("base"));
        assert_eq!(conflict.severity, Severity::Warning);
        assert!(conflict.resolution.contains("300→150"));
    }

    #[test]
    fn singular_duplicate_dropped_silently() {
        let nodes = vec![
            node_with("base", vec![constraint("max_file_lines", ConstraintValue::Int(300))]),
            node_with("svc", vec![constraint("max_file_lines", ConstraintValue::Int(300))]),
        ];
        let outcome = merge(&expanded(&nodes));
        assert_eq!(outcome.constraints.len(), 1);
        // The first writer stays recorded as the source.
        assert_eq!(outcome.constraints[0].source, id("base"));
        assert!(outcome.conflicts.is_empty());
    }

    // -- Override --

    #[test]
    fn override_evicts_all_and_reports_info() {
        let nodes = vec![
            node_with("base", vec![constraint("forbid_import", list(&["fs", "net"]))]),
            node_with(
                "svc",
                vec![constraint("forbid_import", list(&["axios"])).with_override()],
            ),
        ];
        let outcome = merge(&expanded(&nodes));

        assert_eq!(outcome.constraints.len(), 1);
        assert_eq!(outcome.constraints[0].constraint.value, list(&["axios"]));
        assert_eq!(outcome.constraints[0].source, id("svc"));

        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].resolution, "override");
        assert_eq!(outcome.conflicts[0].severity, Severity::Info);
        assert_eq!(outcome.conflicts[0].loser.as_deref(), Some("base"));
    }

    #[test]
    fn override_with_no_prior_installs_without_report() {
        let nodes = vec![node_with(
            "svc",
            vec![constraint("forbid_import", list(&["fs"])).with_override()],
        )];
        let outcome = merge(&expanded(&nodes));
        assert_eq!(outcome.constraints.len(), 1);
        assert!(outcome.conflicts.is_empty());
    }

    // -- Exclusions --

    #[test]
    fn exclusion_removes_single_element() {
        let mut svc = node_with("svc", vec![constraint("forbid_import", list(&["axios"]))]);
        svc.exclude_constraints = vec![ExcludeToken::parse("forbid_import:console").unwrap()];
        let nodes = vec![
            node_with(
                "base",
                vec![constraint("forbid_import", list(&["console", "fs"]))],
            ),
            svc,
        ];
        let outcome = merge(&expanded(&nodes));

        assert_eq!(outcome.constraints.len(), 1);
        assert_eq!(outcome.constraints[0].constraint.value, list(&["fs", "axios"]));
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn exclusion_removes_whole_rule() {
        let mut svc = node_with("svc", vec![]);
        svc.exclude_constraints = vec![ExcludeToken::parse("forbid_import").unwrap()];
        let nodes = vec![
            node_with("base", vec![constraint("forbid_import", list(&["fs"]))]),
            svc,
        ];
        let outcome = merge(&expanded(&nodes));
        assert!(outcome.constraints.is_empty());
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn exclusion_emptying_list_drops_entry() {
        let mut svc = node_with("svc", vec![]);
        svc.exclude_constraints = vec![ExcludeToken::parse("forbid_import:fs").unwrap()];
        let nodes = vec![
            node_with("base", vec![constraint("forbid_import", list(&["fs"]))]),
            svc,
        ];
        let outcome = merge(&expanded(&nodes));
        assert!(outcome.constraints.is_empty());
    }

    #[test]
    fn noop_exclusion_reported_as_info() {
        let mut svc = node_with("svc", vec![]);
        svc.exclude_constraints = vec![ExcludeToken::parse("forbid_import:nothing").unwrap()];
        let nodes = vec![
            node_with("base", vec![constraint("forbid_import", list(&["fs"]))]),
            svc,
        ];
        let outcome = merge(&expanded(&nodes));

        assert_eq!(outcome.constraints[0].constraint.value, list(&["fs"]));
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].severity, Severity::Info);
        assert_eq!(outcome.conflicts[0].winner, id("svc"));
        assert!(outcome.conflicts[0].resolution.contains("matched no"));
    }

    #[test]
    fn exclusion_cannot_cancel_own_constraints() {
        // The token runs before the node's own contributions.
        let mut svc = node_with("svc", vec![constraint("forbid_import", list(&["fs"]))]);
        svc.exclude_constraints = vec![ExcludeToken::parse("forbid_import").unwrap()];
        let nodes = vec![svc];
        let outcome = merge(&expanded(&nodes));
        assert_eq!(outcome.constraints.len(), 1);
    }

    // -- Mixins --

    #[test]
    fn node_constraints_beat_its_own_mixins() {
        let mixin = node_with(
            "strictness",
            vec![constraint("max_file_lines", ConstraintValue::Int(200))],
        );
        let node = node_with(
            "svc",
            vec![constraint("max_file_lines", ConstraintValue::Int(120))],
        );
        let expanded = vec![ExpandedNode {
            node: &node,
            mixins: vec![&mixin],
        }];
        let outcome = merge(&expanded);

        assert_eq!(
            outcome.constraints[0].constraint.value,
            ConstraintValue::Int(120)
        );
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].loser.as_deref(), Some("strictness"));
    }
}
