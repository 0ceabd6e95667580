//! # arch-gov-core
//!
//! Core library for architecture governance: a declarative registry of
//! named architectures (inheritable rule bundles plus reusable mixins)
//! and the resolution engine that flattens them into one concrete,
//! conflict-free rule set per architecture.
//!
//! The crate provides:
//!
//! - [`Registry`] and the YAML loader for registry files
//! - [`resolve`] — the resolution engine
//! - [`ResolutionResult`] — the flattened rule set plus conflict audit trail
//! - [`ResolutionCache`] — optional concurrent memoization
//!
//! ## Example
//!
//! ```ignore
//! use arch_gov_core::{load_registry_from_yaml, resolve, ArchId};
//!
//! let registry = load_registry_from_yaml(&yaml)?;
//! let result = resolve(&registry, &ArchId::new("domain.service")?)?;
//! for constraint in &result.architecture.constraints {
//!     println!("{} from {}", constraint.constraint.rule, constraint.source);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod error;
mod types;

/// Registry ingestion and domain model.
pub mod registry;
/// The resolution engine.
pub mod resolve;
/// The fixed rule-kind table.
pub mod rules;

pub use cache::ResolutionCache;
pub use error::ResolveError;
pub use registry::model::{
    ArchId, ArchitectureNode, Constraint, ConstraintValue, ExcludeToken, Hint, InlineMode,
    MatchMode, ModelError, NodeMetadata, Pointer, Registry,
};
pub use registry::{load_registry_from_dtos, load_registry_from_yaml, RegistryError};
pub use resolve::resolve;
pub use rules::RuleKind;
pub use types::{
    ConflictReport, FlattenedArchitecture, ResolutionResult, ResolvedConstraint, Severity,
};
