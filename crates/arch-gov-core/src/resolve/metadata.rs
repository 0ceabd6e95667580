//! Metadata flattening: scalar fields and accumulated lists.

use std::collections::HashSet;

use crate::registry::model::{ArchitectureNode, Hint, NodeMetadata, Pointer};

use super::mixins::ExpandedNode;

/// List-shaped metadata accumulated across the chain and its mixins.
#[derive(Debug, Default)]
pub struct ListMetadata {
    /// Hints, deduped by normalized text, first-seen order.
    pub hints: Vec<Hint>,
    /// Pointers, deduped by exact URI.
    pub pointers: Vec<Pointer>,
    /// Expected intents, deduped by name.
    pub expected_intents: Vec<String>,
    /// Suggested intents, deduped by name.
    pub suggested_intents: Vec<String>,
    /// Reference implementations, deduped.
    pub reference_implementations: Vec<String>,
}

/// Resolves scalar metadata nearest-defined-wins: walk the chain leaf to
/// root and take the first defined value per field. Mixins contribute no
/// scalars.
#[must_use]
pub fn flatten_scalars(expanded: &[ExpandedNode<'_>]) -> NodeMetadata {
    // `expanded` is root-first; reverse to walk leaf-first.
    let leaf_first: Vec<&NodeMetadata> = expanded
        .iter()
        .rev()
        .map(|entry| &entry.node.metadata)
        .collect();

    let first = |pick: fn(&NodeMetadata) -> Option<&String>| {
        leaf_first.iter().find_map(|m| pick(m)).cloned()
    };

    NodeMetadata {
        description: first(|m| m.description.as_ref()),
        rationale: first(|m| m.rationale.as_ref()),
        kind: first(|m| m.kind.as_ref()),
        contract: first(|m| m.contract.as_ref()),
        version: first(|m| m.version.as_ref()),
        deprecated_from: first(|m| m.deprecated_from.as_ref()),
        migration_guide: first(|m| m.migration_guide.as_ref()),
        file_pattern: first(|m| m.file_pattern.as_ref()),
        default_path: first(|m| m.default_path.as_ref()),
        code_pattern: first(|m| m.code_pattern.as_ref()),
        singleton: leaf_first.iter().find_map(|m| m.singleton),
    }
}

/// Accumulates list metadata over the whole chain plus mixins, in
/// precedence walk order (each node's mixins before the node itself).
#[must_use]
pub fn collect_lists(expanded: &[ExpandedNode<'_>]) -> ListMetadata {
    let mut lists = ListMetadata::default();
    let mut seen = Seen::default();

    for entry in expanded {
        for mixin in &entry.mixins {
            absorb(&mut lists, &mut seen, mixin);
        }
        absorb(&mut lists, &mut seen, entry.node);
    }

    lists
}

/// Dedup keys already accumulated.
#[derive(Default)]
struct Seen {
    hints: HashSet<String>,
    pointers: HashSet<String>,
    expected: HashSet<String>,
    suggested: HashSet<String>,
    references: HashSet<String>,
}

fn absorb(lists: &mut ListMetadata, seen: &mut Seen, node: &ArchitectureNode) {
    for hint in &node.hints {
        if seen.hints.insert(hint.normalized()) {
            lists.hints.push(hint.clone());
        }
    }
    for pointer in &node.pointers {
        if seen.pointers.insert(pointer.as_str().to_string()) {
            lists.pointers.push(pointer.clone());
        }
    }
    for intent in &node.expected_intents {
        if seen.expected.insert(intent.clone()) {
            lists.expected_intents.push(intent.clone());
        }
    }
    for intent in &node.suggested_intents {
        if seen.suggested.insert(intent.clone()) {
            lists.suggested_intents.push(intent.clone());
        }
    }
    for reference in &node.reference_implementations {
        if seen.references.insert(reference.clone()) {
            lists.reference_implementations.push(reference.clone());
        }
    }
}
