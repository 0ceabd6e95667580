//! The Architecture Resolution Engine.
//!
//! Turns the declaratively-inherited, mixin-composed rule tree of one
//! architecture into a single flattened, internally-consistent rule set,
//! plus an audit trail of every conflict arbitrated along the way.
//!
//! Resolution is a pure, synchronous computation over the immutable
//! registry: no I/O, no shared mutable state. Resolving the same id
//! against an unchanged registry always yields identical output.

pub mod arbiter;
pub mod chain;
pub mod metadata;
pub mod mixins;

use crate::error::ResolveError;
use crate::registry::model::{ArchId, Registry};
use crate::types::{FlattenedArchitecture, ResolutionResult};

/// Resolves one architecture against the registry.
///
/// # Errors
///
/// Fails fast with a [`ResolveError`] on an unknown architecture, parent
/// or mixin reference, or an inheritance cycle. Arbitration outcomes are
/// never errors; they are returned in `conflicts`.
pub fn resolve(registry: &Registry, arch_id: &ArchId) -> Result<ResolutionResult, ResolveError> {
    let chain = chain::build_chain(registry, arch_id)?;
    tracing::debug!(arch = %arch_id, depth = chain.len(), "inheritance chain built");

    let expansion = mixins::expand(registry, &chain)?;
    let outcome = arbiter::merge(&expansion.nodes);
    let scalars = metadata::flatten_scalars(&expansion.nodes);
    let lists = metadata::collect_lists(&expansion.nodes);

    tracing::debug!(
        arch = %arch_id,
        constraints = outcome.constraints.len(),
        conflicts = outcome.conflicts.len(),
        "architecture resolved"
    );

    Ok(ResolutionResult {
        architecture: FlattenedArchitecture {
            arch_id: arch_id.clone(),
            inheritance_chain: chain,
            applied_mixins: expansion.applied_mixins,
            constraints: outcome.constraints,
            hints: lists.hints,
            pointers: lists.pointers,
            expected_intents: lists.expected_intents,
            suggested_intents: lists.suggested_intents,
            reference_implementations: lists.reference_implementations,
            metadata: scalars,
        },
        conflicts: outcome.conflicts,
    })
}
