//! DTO → Domain model conversion with validation.
//!
//! The engine trusts the registry shape completely at resolution time, so
//! everything schema-like is checked here: id syntax, severity and mode
//! strings, rule names, value shapes, pointer schemes, and exclusion
//! tokens (parsed once into [`ExcludeToken`], not re-split during merges).

use crate::rules::RuleKind;
use crate::types::Severity;

use super::dto::{ConstraintDto, NodeDto, RegistryDto};
use super::model::{
    ArchId, ArchitectureNode, Constraint, ConstraintValue, ExcludeToken, Hint, InlineMode,
    MatchMode, ModelError, NodeMetadata, Pointer, Registry,
};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g. "architectures.domain.service.hints[0]").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown inline mode string.
    #[error("{context}: unknown inline mode `{value}`, expected: allowed, only, forbidden")]
    UnknownInlineMode {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown match mode string.
    #[error("{context}: unknown match mode `{value}`, expected: all, any")]
    UnknownMatchMode {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown rule name.
    #[error("{context}: unknown rule `{rule}`")]
    UnknownRule {
        /// Where the error occurred.
        context: String,
        /// The unknown name.
        rule: String,
    },

    /// A reserved diagnostic code was authored as a rule.
    #[error("{context}: `{rule}` is a reserved diagnostic code, not an authorable rule")]
    ReservedRule {
        /// Where the error occurred.
        context: String,
        /// The reserved name.
        rule: String,
    },

    /// A constraint carries an empty value.
    #[error("{context}: constraint value must not be empty")]
    EmptyConstraintValue {
        /// Where the error occurred.
        context: String,
    },

    /// A cumulative rule carries a non-list, non-string value.
    #[error("{context}: cumulative rule `{rule}` requires a string or list value")]
    InvalidCumulativeValue {
        /// Where the error occurred.
        context: String,
        /// The cumulative rule.
        rule: String,
    },

    /// Both `when` and `applies_when` are set.
    #[error("{context}: set either `when` or `applies_when`, not both")]
    ConflictingCondition {
        /// Where the error occurred.
        context: String,
    },

    /// An architecture node is missing its rationale.
    #[error("architecture `{id}` is missing a rationale")]
    MissingRationale {
        /// The offending node id.
        id: String,
    },
}

/// Converts a raw [`RegistryDto`] into a validated [`Registry`].
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: RegistryDto) -> Result<Registry, LoadError> {
    let nodes = dto
        .architectures
        .into_iter()
        .map(|(id, node)| convert_node(&id, node, Table::Architectures))
        .collect::<Result<Vec<_>, _>>()?;

    let mixins = dto
        .mixins
        .into_iter()
        .map(|(id, node)| convert_node(&id, node, Table::Mixins))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Registry::new(nodes, mixins))
}

#[derive(Clone, Copy)]
enum Table {
    Architectures,
    Mixins,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Self::Architectures => "architectures",
            Self::Mixins => "mixins",
        }
    }
}

fn convert_node(id: &str, dto: NodeDto, table: Table) -> Result<ArchitectureNode, LoadError> {
    let ctx = format!("{}.{id}", table.name());

    let arch_id = ArchId::new(id).map_err(|e| LoadError::Validation {
        context: ctx.clone(),
        source: e,
    })?;

    // Mixins carry no rationale requirement; any architecture node can be
    // resolved as a leaf, so all of them must explain themselves.
    if matches!(table, Table::Architectures) && dto.rationale.as_deref().unwrap_or("").is_empty() {
        return Err(LoadError::MissingRationale { id: id.to_string() });
    }

    let inherits = dto
        .inherits
        .as_deref()
        .map(|parent| {
            ArchId::new(parent).map_err(|e| LoadError::Validation {
                context: format!("{ctx}.inherits"),
                source: e,
            })
        })
        .transpose()?;

    let mixins = dto
        .mixins
        .iter()
        .enumerate()
        .map(|(i, m)| {
            ArchId::new(m).map_err(|e| LoadError::Validation {
                context: format!("{ctx}.mixins[{i}]"),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let constraints = dto
        .constraints
        .into_iter()
        .enumerate()
        .map(|(i, c)| convert_constraint(c, &format!("{ctx}.constraints[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let exclude_constraints = dto
        .exclude_constraints
        .iter()
        .enumerate()
        .map(|(i, token)| {
            ExcludeToken::parse(token).map_err(|e| LoadError::Validation {
                context: format!("{ctx}.exclude_constraints[{i}]"),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let hints = dto
        .hints
        .iter()
        .enumerate()
        .map(|(i, h)| {
            Hint::new(h).map_err(|e| LoadError::Validation {
                context: format!("{ctx}.hints[{i}]"),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let pointers = dto
        .pointers
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Pointer::new(p).map_err(|e| LoadError::Validation {
                context: format!("{ctx}.pointers[{i}]"),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let inline = match dto.inline.as_deref() {
        None => InlineMode::default(),
        Some("allowed") => InlineMode::Allowed,
        Some("only") => InlineMode::Only,
        Some("forbidden") => InlineMode::Forbidden,
        Some(other) => {
            return Err(LoadError::UnknownInlineMode {
                context: format!("{ctx}.inline"),
                value: other.to_string(),
            })
        }
    };

    Ok(ArchitectureNode {
        id: arch_id,
        inherits,
        mixins,
        constraints,
        exclude_constraints,
        hints,
        pointers,
        expected_intents: dto.expected_intents,
        suggested_intents: dto.suggested_intents,
        reference_implementations: dto.reference_implementations,
        inline,
        metadata: NodeMetadata {
            description: dto.description,
            rationale: dto.rationale,
            kind: dto.kind,
            contract: dto.contract,
            version: dto.version,
            deprecated_from: dto.deprecated_from,
            migration_guide: dto.migration_guide,
            file_pattern: dto.file_pattern,
            default_path: dto.default_path,
            code_pattern: dto.code_pattern,
            singleton: dto.singleton,
        },
    })
}

fn convert_constraint(dto: ConstraintDto, ctx: &str) -> Result<Constraint, LoadError> {
    let kind = match RuleKind::classify(&dto.rule) {
        Some(RuleKind::Reserved) => {
            return Err(LoadError::ReservedRule {
                context: ctx.to_string(),
                rule: dto.rule,
            })
        }
        Some(kind) => kind,
        None => {
            return Err(LoadError::UnknownRule {
                context: ctx.to_string(),
                rule: dto.rule,
            })
        }
    };

    if dto.value.is_empty() {
        return Err(LoadError::EmptyConstraintValue {
            context: ctx.to_string(),
        });
    }

    // Cumulative values are normalized to lists here so the arbiter only
    // ever unions lists.
    let value = if kind == RuleKind::Cumulative {
        match dto.value {
            ConstraintValue::List(items) => ConstraintValue::List(items),
            ConstraintValue::Text(s) => ConstraintValue::List(vec![s]),
            _ => {
                return Err(LoadError::InvalidCumulativeValue {
                    context: ctx.to_string(),
                    rule: dto.rule,
                })
            }
        }
    } else {
        dto.value
    };

    let severity = parse_severity(&dto.severity, ctx)?;

    let applies_when = match (dto.when, dto.applies_when) {
        (Some(_), Some(_)) => {
            return Err(LoadError::ConflictingCondition {
                context: ctx.to_string(),
            })
        }
        (when, applies_when) => when.or(applies_when),
    };

    let mut alternatives = dto.alternatives;
    if let Some(single) = dto.alternative {
        alternatives.insert(0, single);
    }

    let match_mode = match dto.match_mode.as_deref() {
        None => MatchMode::default(),
        Some("all") => MatchMode::All,
        Some("any") => MatchMode::Any,
        Some(other) => {
            return Err(LoadError::UnknownMatchMode {
                context: ctx.to_string(),
                value: other.to_string(),
            })
        }
    };

    Ok(Constraint {
        rule: dto.rule,
        value,
        severity,
        category: dto.category,
        why: dto.why,
        is_override: dto.override_prior,
        exclude_comments: dto.exclude_comments,
        unless: dto.unless,
        applies_when,
        alternatives,
        usage: dto.usage,
        match_mode,
    })
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    match value {
        "error" => Ok(Severity::Error),
        "warning" => Ok(Severity::Warning),
        "info" => Ok(Severity::Info),
        _ => Err(LoadError::UnknownSeverity {
            context: context.to_string(),
            value: value.to_string(),
        }),
    }
}
