//! Resolution-time errors.
//!
//! All variants are fatal: they abort the `resolve` call without a partial
//! result. Arbitration outcomes (overrides, replacements, no-op exclusions)
//! are data, not errors; see [`crate::types::ConflictReport`].

use crate::registry::model::ArchId;

/// A fatal resolution error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The requested architecture id is not in the registry.
    #[error("unknown architecture `{id}`")]
    UnknownArchitecture {
        /// The missing id.
        id: ArchId,
    },

    /// A node's `inherits` id is not in the registry.
    #[error("architecture `{child}` inherits unknown parent `{parent}`")]
    UnknownParent {
        /// The node that declares the reference.
        child: ArchId,
        /// The missing parent id.
        parent: ArchId,
    },

    /// A node's mixin reference is not in the mixin table.
    #[error("architecture `{arch}` references unknown mixin `{mixin}`")]
    UnknownMixin {
        /// The node that declares the reference.
        arch: ArchId,
        /// The missing mixin id.
        mixin: ArchId,
    },

    /// An `inherits` cycle was detected.
    #[error("cyclic inheritance: {}", format_cycle(.path))]
    CyclicInheritance {
        /// The full cycle, ending at the repeated id.
        path: Vec<ArchId>,
    },
}

fn format_cycle(path: &[ArchId]) -> String {
    path.iter()
        .map(ArchId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
