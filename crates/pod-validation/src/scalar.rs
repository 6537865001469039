//! Shape and scalar checks.
//!
//! Each check reports at the context's current path and returns the typed
//! value when the node passed, `None` when it did not. Callers skip further
//! checks of a node that failed.

use crate::config::IntegerPolicy;
use crate::error::{ExpectedType, ValidationErrorKind, ValidationResult};
use crate::validator::ValidationContext;
use pod_yaml::{MappingEntry, Node, NodeKind, ScalarTag};
use regex::Regex;

fn mismatch(node: &Node, expected: ExpectedType) -> ValidationErrorKind {
    ValidationErrorKind::TypeMismatch {
        expected,
        got: node.kind_name().to_string(),
    }
}

/// `<field> must be object`
pub fn require_mapping<'n>(
    node: &'n Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<Option<&'n [MappingEntry]>> {
    match node.as_mapping() {
        Some(entries) => Ok(Some(entries)),
        None => ctx
            .report(mismatch(node, ExpectedType::Object), Some(node))
            .map(|()| None),
    }
}

/// `<field> must be array`
pub fn require_sequence<'n>(
    node: &'n Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<Option<&'n [Node]>> {
    match node.as_sequence() {
        Some(items) => Ok(Some(items)),
        None => ctx
            .report(mismatch(node, ExpectedType::Array), Some(node))
            .map(|()| None),
    }
}

/// `<field> must be string`
///
/// Only string-tagged scalars qualify. A plain `8080` is an integer and is
/// rejected here; a quoted `"8080"` is accepted.
pub fn require_string<'n>(
    node: &'n Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<Option<&'n str>> {
    match node.as_str() {
        Some(value) => Ok(Some(value)),
        None => ctx
            .report(mismatch(node, ExpectedType::String), Some(node))
            .map(|()| None),
    }
}

/// `<field> must be string`, for free-form text fields.
///
/// Like [`require_string`], but a bare token that reads as a number
/// (`name: 2048`) is taken as its text. Booleans and nulls are still
/// rejected.
pub fn require_text<'n>(
    node: &'n Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<Option<&'n str>> {
    match &node.kind {
        NodeKind::Scalar(scalar)
            if matches!(scalar.tag, ScalarTag::Str | ScalarTag::Int | ScalarTag::Float) =>
        {
            Ok(Some(scalar.value.as_str()))
        }
        _ => ctx
            .report(mismatch(node, ExpectedType::String), Some(node))
            .map(|()| None),
    }
}

/// `<field> must be int`
///
/// Under [`IntegerPolicy::Strict`] only integer-tagged scalars qualify.
/// [`IntegerPolicy::Coerce`] also takes string scalars holding a decimal
/// integer.
pub fn require_int(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<Option<i64>> {
    let value = match &node.kind {
        NodeKind::Scalar(scalar) => match (scalar.tag, ctx.integer_policy()) {
            (ScalarTag::Int, _) => scalar.as_i64(),
            (ScalarTag::Str, IntegerPolicy::Coerce) => scalar.value.trim().parse::<i64>().ok(),
            _ => None,
        },
        _ => None,
    };

    match value {
        Some(value) => Ok(Some(value)),
        None => ctx
            .report(mismatch(node, ExpectedType::Int), Some(node))
            .map(|()| None),
    }
}

/// `<field> value out of range`; bounds are inclusive.
pub fn require_range(
    value: i64,
    minimum: i64,
    maximum: i64,
    node: &Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<bool> {
    if (minimum..=maximum).contains(&value) {
        return Ok(true);
    }
    ctx.report(
        ValidationErrorKind::OutOfRange {
            value,
            minimum,
            maximum,
        },
        Some(node),
    )
    .map(|()| false)
}

/// `<field> has invalid format '<value>'`
pub fn require_pattern(
    value: &str,
    pattern: &Regex,
    node: &Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<bool> {
    if pattern.is_match(value) {
        return Ok(true);
    }
    invalid_format(value, node, ctx).map(|()| false)
}

/// Report `value` as malformed.
pub fn invalid_format(value: &str, node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    ctx.report(
        ValidationErrorKind::InvalidFormat {
            value: value.to_string(),
        },
        Some(node),
    )
}

/// `<field> has unsupported value '<value>'`
pub fn require_one_of(
    value: &str,
    allowed: &[String],
    node: &Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<bool> {
    if allowed.iter().any(|candidate| candidate == value) {
        return Ok(true);
    }
    ctx.report(
        ValidationErrorKind::UnsupportedValue {
            value: value.to_string(),
            allowed: allowed.to_vec(),
        },
        Some(node),
    )
    .map(|()| false)
}

/// `<field> must be non-empty`; whitespace-only strings count as empty.
pub fn require_non_empty(
    value: &str,
    node: &Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<bool> {
    if !value.trim().is_empty() {
        return Ok(true);
    }
    ctx.report(ValidationErrorKind::EmptyValue, Some(node))
        .map(|()| false)
}
