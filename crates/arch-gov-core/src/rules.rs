//! The fixed rule-kind table.
//!
//! Every constraint rule is either *cumulative* (array-valued, unioned
//! across sources) or *singular* (one truth, last writer wins). A third
//! group of names is reserved for diagnostic codes emitted by downstream
//! validators; those are never authored in a registry.

/// Rules whose values from multiple sources are unioned.
pub const CUMULATIVE_RULES: &[&str] = &[
    "forbid_import",
    "require_import",
    "allow_import",
    "require_test_file",
    "importable_by",
    "forbid_call",
    "require_call",
    "require_export",
    "require_one_of",
    "forbid_mutation",
    "require_try_catch",
    "require_call_before",
    "require_companion_file",
];

/// Rules whose value is a single truth; a later source replaces an earlier one.
pub const SINGULAR_RULES: &[&str] = &[
    "must_extend",
    "implements",
    "naming_pattern",
    "location_pattern",
    "max_public_methods",
    "max_file_lines",
    "max_similarity",
    "forbid_circular_deps",
    "require_pattern",
    "forbid_pattern",
    "allow_pattern",
    "require_decorator",
    "forbid_decorator",
    "require_coverage",
    "require_companion_call",
    "verify_intent",
];

/// Diagnostic codes emitted by downstream validators, never authored.
pub const RESERVED_RULES: &[&str] = &[
    "internal_error",
    "override_limit",
    "mixin_inline_forbidden",
    "mixin_inline_only",
    "missing_expected_intent",
    "missing_why",
    "singleton_violation",
];

/// Merge behavior of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Array-valued; values from multiple sources are unioned.
    Cumulative,
    /// Scalar or structured; replace-on-conflict.
    Singular,
    /// Reserved diagnostic code; invalid as registry input.
    Reserved,
}

impl RuleKind {
    /// Classifies a rule name, or `None` for an unknown rule.
    #[must_use]
    pub fn classify(rule: &str) -> Option<Self> {
        if CUMULATIVE_RULES.contains(&rule) {
            Some(Self::Cumulative)
        } else if SINGULAR_RULES.contains(&rule) {
            Some(Self::Singular)
        } else if RESERVED_RULES.contains(&rule) {
            Some(Self::Reserved)
        } else {
            None
        }
    }
}
