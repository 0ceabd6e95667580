//! Inheritance chain construction.

use crate::error::ResolveError;
use crate::registry::model::{ArchId, Registry};

/// Walks `inherits` from the requested leaf to the root.
///
/// Returns the ordered chain `[leaf, ..., root]`. No id appears twice in a
/// successful walk.
///
/// # Errors
///
/// - [`ResolveError::UnknownArchitecture`] when `arch_id` is absent.
/// - [`ResolveError::UnknownParent`] when a node's parent is absent.
/// - [`ResolveError::CyclicInheritance`] when the walk revisits an id; the
///   error carries the full cycle path.
pub fn build_chain(registry: &Registry, arch_id: &ArchId) -> Result<Vec<ArchId>, ResolveError> {
    let mut chain: Vec<ArchId> = Vec::new();
    let mut current = arch_id.clone();

    loop {
        if chain.contains(&current) {
            let mut path = chain;
            path.push(current);
            return Err(ResolveError::CyclicInheritance { path });
        }

        let node = registry.node(&current).ok_or_else(|| {
            if chain.is_empty() {
                ResolveError::UnknownArchitecture { id: current.clone() }
            } else {
                // chain is non-empty here, so last() always yields the child
                let child = chain.last().cloned().unwrap_or_else(|| current.clone());
                ResolveError::UnknownParent {
                    child,
                    parent: current.clone(),
                }
            }
        })?;

        chain.push(current);
        match &node.inherits {
            Some(parent) => current = parent.clone(),
            None => return Ok(chain),
        }
    }
}
