//! Pure domain model for the architecture registry.
//!
//! This module contains no serde_yaml, no I/O dependencies beyond serde
//! derives for report rendering. All invariants are enforced at
//! construction time via validated newtypes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::Severity;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated architecture or mixin id: dot-segmented, non-empty segments
/// (e.g. `domain.service.payment`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ArchId(String);

impl ArchId {
    /// Creates a new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or contains an empty segment.
    pub fn new(id: &str) -> Result<Self, ModelError> {
        if id.is_empty() {
            return Err(ModelError::EmptyArchId);
        }
        if id.split('.').any(str::is_empty) {
            return Err(ModelError::InvalidArchId { id: id.to_string() });
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for ArchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-text guidance attached to a node or mixin.
///
/// Identity for dedup purposes is the normalized (trimmed, case-folded) text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Hint(String);

impl Hint {
    /// Creates a new hint.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty or whitespace-only.
    pub fn new(text: &str) -> Result<Self, ModelError> {
        if text.trim().is_empty() {
            return Err(ModelError::EmptyHint);
        }
        Ok(Self(text.to_string()))
    }

    /// Returns the hint text as authored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the normalized dedup key: trimmed, case-folded.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.trim().to_lowercase()
    }
}

/// A `scheme://` reference to related material.
///
/// Supported schemes: `arch://`, `code://`, `template://`.
/// Identity for dedup purposes is the exact URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Pointer(String);

/// Schemes a pointer may use.
const POINTER_SCHEMES: &[&str] = &["arch", "code", "template"];

impl Pointer {
    /// Creates a new pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI has no `scheme://` prefix or an
    /// unsupported scheme.
    pub fn new(uri: &str) -> Result<Self, ModelError> {
        let Some((scheme, rest)) = uri.split_once("://") else {
            return Err(ModelError::InvalidPointer {
                uri: uri.to_string(),
            });
        };
        if rest.is_empty() || !POINTER_SCHEMES.contains(&scheme) {
            return Err(ModelError::InvalidPointer {
                uri: uri.to_string(),
            });
        }
        Ok(Self(uri.to_string()))
    }

    /// Returns the full URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the scheme part (e.g. `arch`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.split("://").next().unwrap_or("")
    }
}

/// A parsed `exclude_constraints` token: `"rule"` removes every inherited
/// entry for the rule, `"rule:value"` removes one element from a cumulative
/// rule's unioned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeToken {
    /// The targeted rule name.
    pub rule: String,
    /// The targeted value element, for `"rule:value"` tokens.
    pub value: Option<String>,
}

impl ExcludeToken {
    /// Parses a `"rule"` or `"rule:value"` token.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule or value part is empty.
    pub fn parse(token: &str) -> Result<Self, ModelError> {
        let token = token.trim();
        let (rule, value) = match token.split_once(':') {
            Some((rule, value)) => (rule.trim(), Some(value.trim())),
            None => (token, None),
        };
        if rule.is_empty() || value.is_some_and(str::is_empty) {
            return Err(ModelError::InvalidExcludeToken {
                token: token.to_string(),
            });
        }
        Ok(Self {
            rule: rule.to_string(),
            value: value.map(str::to_string),
        })
    }
}

impl fmt::Display for ExcludeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}:{}", self.rule, v),
            None => write!(f, "{}", self.rule),
        }
    }
}

// ────────────────────────────────────────────
// Constraints
// ────────────────────────────────────────────

/// A constraint value. The shape depends on the rule: free text, a number,
/// a list of strings, or a small structured object (coverage, companion
/// rules).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue {
    /// A single string value.
    Text(String),
    /// An integer value (e.g. `max_file_lines`).
    Int(i64),
    /// A fractional value (e.g. `max_similarity`).
    Float(f64),
    /// A list of string values (cumulative rules).
    List(Vec<String>),
    /// A structured object value.
    Map(BTreeMap<String, ConstraintValue>),
}

impl ConstraintValue {
    /// Returns true if the value carries no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Int(_) | Self::Float(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }

    /// Returns the list items, if this is a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// How multi-part constraint values are matched by downstream validators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every part must match.
    #[default]
    All,
    /// Any part may match.
    Any,
}

/// One rule instance contributed by a node or mixin.
///
/// Invariant (enforced by the loader): `value` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraint {
    /// The rule name (e.g. `forbid_import`).
    pub rule: String,
    /// The rule value; shape depends on the rule.
    pub value: ConstraintValue,
    /// Severity reported for violations of this constraint.
    pub severity: Severity,
    /// Optional grouping category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Why the constraint exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    /// When true, this constraint replaces every inherited entry for its
    /// rule instead of merging with them.
    #[serde(rename = "override", skip_serializing_if = "is_false")]
    pub is_override: bool,
    /// Whether comment text is excluded when matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_comments: Option<bool>,
    /// Escape conditions under which the constraint does not apply.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
    /// Condition under which the constraint applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies_when: Option<String>,
    /// Suggested alternatives surfaced with violations.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    /// Usage guidance surfaced with violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    /// How multi-part values are matched.
    #[serde(rename = "match")]
    pub match_mode: MatchMode,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Constraint {
    /// Creates a constraint with the given rule, value and severity, and
    /// defaults everywhere else.
    #[must_use]
    pub fn new(rule: impl Into<String>, value: ConstraintValue, severity: Severity) -> Self {
        Self {
            rule: rule.into(),
            value,
            severity,
            category: None,
            why: None,
            is_override: false,
            exclude_comments: None,
            unless: Vec::new(),
            applies_when: None,
            alternatives: Vec::new(),
            usage: None,
            match_mode: MatchMode::All,
        }
    }

    /// Marks this constraint as an override.
    #[must_use]
    pub fn with_override(mut self) -> Self {
        self.is_override = true;
        self
    }
}

// ────────────────────────────────────────────
// Nodes and registry
// ────────────────────────────────────────────

/// Whether a mixin may be applied ad hoc at a file's annotation site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineMode {
    /// May be applied via the registry or inline.
    #[default]
    Allowed,
    /// May only be applied inline, never via the registry.
    Only,
    /// May only be applied via the registry.
    Forbidden,
}

/// Scalar metadata carried by a node, resolved nearest-defined-wins along
/// the inheritance chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeMetadata {
    /// Short description of the architecture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Why the architecture exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// Node kind (e.g. `service`, `entity`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Contract the architecture promises to its consumers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    /// Version tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Version from which the architecture is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated_from: Option<String>,
    /// Where to look when migrating off a deprecated architecture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration_guide: Option<String>,
    /// File naming pattern for scaffolding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_pattern: Option<String>,
    /// Default path for scaffolding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
    /// Code template pattern for scaffolding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_pattern: Option<String>,
    /// Whether at most one file may implement the architecture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singleton: Option<bool>,
}

/// A named, inheritable bundle of rules and metadata. Used for both
/// architecture nodes and mixins.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchitectureNode {
    /// The node id.
    pub id: ArchId,
    /// Single-inheritance parent.
    pub inherits: Option<ArchId>,
    /// Mixins applied at this node, in declared order.
    pub mixins: Vec<ArchId>,
    /// Constraints contributed by this node.
    pub constraints: Vec<Constraint>,
    /// Inherited entries this node removes before adding its own.
    pub exclude_constraints: Vec<ExcludeToken>,
    /// Free-text guidance.
    pub hints: Vec<Hint>,
    /// `scheme://` references.
    pub pointers: Vec<Pointer>,
    /// Intents files of this architecture are expected to declare.
    pub expected_intents: Vec<String>,
    /// Intents files of this architecture may declare.
    pub suggested_intents: Vec<String>,
    /// Exemplary implementations of this architecture.
    pub reference_implementations: Vec<String>,
    /// Inline applicability; meaningful for mixins only.
    pub inline: InlineMode,
    /// Scalar metadata.
    pub metadata: NodeMetadata,
}

impl ArchitectureNode {
    /// Creates an empty node with the given id.
    #[must_use]
    pub fn new(id: ArchId) -> Self {
        Self {
            id,
            inherits: None,
            mixins: Vec::new(),
            constraints: Vec::new(),
            exclude_constraints: Vec::new(),
            hints: Vec::new(),
            pointers: Vec::new(),
            expected_intents: Vec::new(),
            suggested_intents: Vec::new(),
            reference_implementations: Vec::new(),
            inline: InlineMode::default(),
            metadata: NodeMetadata::default(),
        }
    }
}

/// The immutable, already-merged registry: architecture nodes and mixins.
///
/// Construction does not cross-validate `inherits` or `mixins` references;
/// those are existence-checked at resolution time so a broken reference
/// only fails the architectures that actually depend on it.
#[derive(Debug, Clone)]
pub struct Registry {
    nodes: BTreeMap<ArchId, ArchitectureNode>,
    mixins: BTreeMap<ArchId, ArchitectureNode>,
    fingerprint: u64,
}

impl Registry {
    /// Creates a registry from architecture nodes and mixins.
    #[must_use]
    pub fn new(nodes: Vec<ArchitectureNode>, mixins: Vec<ArchitectureNode>) -> Self {
        let nodes: BTreeMap<ArchId, ArchitectureNode> =
            nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        let mixins: BTreeMap<ArchId, ArchitectureNode> =
            mixins.into_iter().map(|n| (n.id.clone(), n)).collect();
        let fingerprint = content_fingerprint(&nodes, &mixins);
        Self {
            nodes,
            mixins,
            fingerprint,
        }
    }

    /// Looks up an architecture node by id.
    #[must_use]
    pub fn node(&self, id: &ArchId) -> Option<&ArchitectureNode> {
        self.nodes.get(id)
    }

    /// Looks up a mixin by id.
    #[must_use]
    pub fn mixin(&self, id: &ArchId) -> Option<&ArchitectureNode> {
        self.mixins.get(id)
    }

    /// Iterates architecture nodes in id order.
    pub fn architectures(&self) -> impl Iterator<Item = &ArchitectureNode> {
        self.nodes.values()
    }

    /// Iterates mixins in id order.
    pub fn mixins(&self) -> impl Iterator<Item = &ArchitectureNode> {
        self.mixins.values()
    }

    /// Number of architecture nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the registry holds no architecture nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A content fingerprint, stable for an unchanged registry within a
    /// process. Used as part of resolution cache keys.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

fn content_fingerprint(
    nodes: &BTreeMap<ArchId, ArchitectureNode>,
    mixins: &BTreeMap<ArchId, ArchitectureNode>,
) -> u64 {
    // BTreeMap iteration order makes the Debug rendering deterministic.
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    format!("{nodes:?}|{mixins:?}").hash(&mut hasher);
    hasher.finish()
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Id is empty.
    #[error("architecture id must not be empty")]
    EmptyArchId,

    /// Id contains an empty dot segment.
    #[error("invalid architecture id `{id}`: segments must be non-empty")]
    InvalidArchId {
        /// The invalid id.
        id: String,
    },

    /// Hint text is empty.
    #[error("hint text must not be empty")]
    EmptyHint,

    /// Pointer URI is malformed or has an unsupported scheme.
    #[error("invalid pointer `{uri}`: expected arch://, code:// or template://")]
    InvalidPointer {
        /// The invalid URI.
        uri: String,
    },

    /// Exclusion token is malformed.
    #[error("invalid exclude_constraints token `{token}`")]
    InvalidExcludeToken {
        /// The invalid token.
        token: String,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────
