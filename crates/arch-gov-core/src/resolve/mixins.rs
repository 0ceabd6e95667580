//! Mixin reference expansion.

use crate::error::ResolveError;
use crate::registry::model::{ArchId, ArchitectureNode, Registry};

/// One chain node with its declared mixins resolved to nodes.
#[derive(Debug)]
pub struct ExpandedNode<'a> {
    /// The chain node.
    pub node: &'a ArchitectureNode,
    /// Resolved mixins, in declared order.
    pub mixins: Vec<&'a ArchitectureNode>,
}

/// The whole expanded chain, in merge precedence order (root-first).
#[derive(Debug)]
pub struct Expansion<'a> {
    /// Chain nodes with resolved mixins, root first.
    pub nodes: Vec<ExpandedNode<'a>>,
    /// Every mixin id applied, deduped, first-seen order.
    pub applied_mixins: Vec<ArchId>,
}

/// Resolves the mixin references of every chain node.
///
/// `chain` is leaf-to-root as produced by the chain builder; the returned
/// expansion is root-first, the order the arbiter folds contributions in.
///
/// # Errors
///
/// Returns [`ResolveError::UnknownMixin`] naming the architecture and the
/// missing mixin.
pub fn expand<'a>(
    registry: &'a Registry,
    chain: &[ArchId],
) -> Result<Expansion<'a>, ResolveError> {
    let mut nodes = Vec::with_capacity(chain.len());
    let mut applied_mixins: Vec<ArchId> = Vec::new();

    for arch_id in chain.iter().rev() {
        let node = registry
            .node(arch_id)
            .ok_or_else(|| ResolveError::UnknownArchitecture { id: arch_id.clone() })?;

        let mut mixins = Vec::with_capacity(node.mixins.len());
        for mixin_id in &node.mixins {
            let mixin = registry
                .mixin(mixin_id)
                .ok_or_else(|| ResolveError::UnknownMixin {
                    arch: arch_id.clone(),
                    mixin: mixin_id.clone(),
                })?;
            if !applied_mixins.contains(mixin_id) {
                applied_mixins.push(mixin_id.clone());
            }
            mixins.push(mixin);
        }

        nodes.push(ExpandedNode { node, mixins });
    }

    Ok(Expansion {
        nodes,
        applied_mixins,
    })
}
