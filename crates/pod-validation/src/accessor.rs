//! Field lookup within mapping nodes.
//!
//! Absence is never an error here. [`required`] reports it, [`optional`]
//! skips it; in both cases the check runs with the field's key pushed onto
//! the instance path.

use crate::error::{ValidationErrorKind, ValidationResult};
use crate::validator::ValidationContext;
use pod_yaml::Node;

/// Find the value for `key` in a mapping node, first match in document
/// order. Non-mapping nodes have no children.
pub fn child_by_key<'n>(mapping: &'n Node, key: &str) -> Option<&'n Node> {
    mapping.get(key)
}

/// Run `check` on a required field, or report it missing.
pub fn required<'a, 'n, F>(
    mapping: &'n Node,
    key: &str,
    ctx: &mut ValidationContext<'a>,
    check: F,
) -> ValidationResult<()>
where
    F: FnOnce(&'n Node, &mut ValidationContext<'a>) -> ValidationResult<()>,
{
    ctx.with_key(key, |ctx| match child_by_key(mapping, key) {
        Some(child) => check(child, ctx),
        None => ctx.report(ValidationErrorKind::MissingRequiredProperty, None),
    })
}

/// Run `check` on a field if it is present.
pub fn optional<'a, 'n, F>(
    mapping: &'n Node,
    key: &str,
    ctx: &mut ValidationContext<'a>,
    check: F,
) -> ValidationResult<()>
where
    F: FnOnce(&'n Node, &mut ValidationContext<'a>) -> ValidationResult<()>,
{
    match child_by_key(mapping, key) {
        Some(child) => ctx.with_key(key, |ctx| check(child, ctx)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;
    use crate::validator::ValidationOptions;

    #[test]
    fn test_required_reports_missing_with_path() {
        let doc = pod_yaml::parse("metadata:\n  namespace: prod").unwrap();
        let config = SchemaConfig::default();
        let mut ctx = ValidationContext::new(&config, ValidationOptions::default());

        let metadata = child_by_key(&doc, "metadata").unwrap();
        ctx.with_key("metadata", |ctx| {
            required(metadata, "name", ctx, |_, _| Ok(()))
        })
        .unwrap();

        let diagnostics = ctx.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message(), "metadata.name is required");
        assert_eq!(diagnostics[0].line, 0);
    }

    #[test]
    fn test_optional_skips_absent_field() {
        let doc = pod_yaml::parse("name: web").unwrap();
        let config = SchemaConfig::default();
        let mut ctx = ValidationContext::new(&config, ValidationOptions::default());

        let mut visited = false;
        optional(&doc, "ports", &mut ctx, |_, _| {
            visited = true;
            Ok(())
        })
        .unwrap();
        assert!(!visited);
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_check_sees_field_path() {
        let doc = pod_yaml::parse("image: x").unwrap();
        let config = SchemaConfig::default();
        let mut ctx = ValidationContext::new(&config, ValidationOptions::default());

        required(&doc, "image", &mut ctx, |node, ctx| {
            assert_eq!(ctx.path().to_string(), "image");
            assert_eq!(node.as_str(), Some("x"));
            Ok(())
        })
        .unwrap();
    }
}
