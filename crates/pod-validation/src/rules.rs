//! Schema rules for the Pod manifest.
//!
//! One function per entity. Each consumes one node, reports into the
//! context, and recurses into children through [`required`] and
//! [`optional`]. Within a mapping, required fields are checked first and
//! optional ones after, in schema order. A node of the wrong shape is
//! reported once and its subtree is skipped.

use crate::accessor::{optional, required};
use crate::error::{ValidationErrorKind, ValidationResult};
use crate::scalar::{
    invalid_format, require_int, require_mapping, require_non_empty, require_one_of,
    require_pattern, require_range, require_sequence, require_string, require_text,
};
use crate::validator::ValidationContext;
use pod_yaml::Node;
use std::collections::HashMap;

/// Top-level document: `apiVersion`, `kind`, `metadata`, `spec`.
pub fn validate_document(root: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    if require_mapping(root, ctx)?.is_none() {
        return Ok(());
    }
    let config = ctx.config();

    required(root, "apiVersion", ctx, |node, ctx| {
        if let Some(value) = require_string(node, ctx)? {
            require_one_of(value, std::slice::from_ref(&config.api_version), node, ctx)?;
        }
        Ok(())
    })?;

    required(root, "kind", ctx, |node, ctx| {
        if let Some(value) = require_string(node, ctx)? {
            require_one_of(value, std::slice::from_ref(&config.kind), node, ctx)?;
        }
        Ok(())
    })?;

    required(root, "metadata", ctx, validate_metadata)?;
    required(root, "spec", ctx, validate_pod_spec)
}

/// `metadata`: name, optional namespace and labels.
pub fn validate_metadata(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }

    required(node, "name", ctx, |name, ctx| {
        if let Some(value) = require_text(name, ctx)? {
            require_non_empty(value, name, ctx)?;
        }
        Ok(())
    })?;

    optional(node, "namespace", ctx, |namespace, ctx| {
        require_text(namespace, ctx).map(drop)
    })?;

    optional(node, "labels", ctx, |labels, ctx| {
        let Some(entries) = require_mapping(labels, ctx)? else {
            return Ok(());
        };
        for (index, entry) in entries.iter().enumerate() {
            let value = &entry.value;
            match entry.key.as_scalar() {
                Some(scalar) => ctx.with_key(&scalar.value, |ctx| require_string(value, ctx))?,
                // complex keys have no name to show
                None => ctx.with_index(index, |ctx| require_string(value, ctx))?,
            };
        }
        Ok(())
    })
}

/// `spec`: containers, optional os.
pub fn validate_pod_spec(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }

    required(node, "containers", ctx, validate_containers)?;
    optional(node, "os", ctx, validate_pod_os)
}

/// `spec.os`: name must be one of the supported operating systems.
pub fn validate_pod_os(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }
    let config = ctx.config();

    required(node, "name", ctx, |name, ctx| {
        if let Some(value) = require_string(name, ctx)? {
            require_one_of(value, &config.os_names, name, ctx)?;
        }
        Ok(())
    })
}

/// `spec.containers`: non-empty sequence of containers with unique names.
pub fn validate_containers(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    let Some(items) = require_sequence(node, ctx)? else {
        return Ok(());
    };
    if items.is_empty() {
        return ctx.report(ValidationErrorKind::EmptyValue, Some(node));
    }

    // name -> line of its first occurrence
    let mut seen_names: HashMap<&str, usize> = HashMap::new();
    for (index, container) in items.iter().enumerate() {
        ctx.with_index(index, |ctx| validate_container(container, &mut seen_names, ctx))?;
    }
    Ok(())
}

/// One container. `seen_names` carries the names already defined in the
/// same `containers` sequence.
pub fn validate_container<'n>(
    node: &'n Node,
    seen_names: &mut HashMap<&'n str, usize>,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }
    let config = ctx.config();
    tracing::trace!(path = %ctx.path(), "validating container");

    required(node, "name", ctx, |name, ctx| {
        let Some(value) = require_text(name, ctx)? else {
            return Ok(());
        };
        if !require_pattern(value, &config.container_name_pattern, name, ctx)? {
            return Ok(());
        }
        match seen_names.get(value) {
            Some(&first_line) => ctx.report(
                ValidationErrorKind::DuplicateValue {
                    value: value.to_string(),
                    first_line,
                },
                Some(name),
            ),
            None => {
                seen_names.insert(value, name.line());
                Ok(())
            }
        }
    })?;

    required(node, "image", ctx, |image, ctx| {
        if let Some(value) = require_string(image, ctx)? {
            require_pattern(value, &config.image_pattern, image, ctx)?;
        }
        Ok(())
    })?;

    required(node, "resources", ctx, validate_resource_requirements)?;

    optional(node, "ports", ctx, |ports, ctx| {
        let Some(items) = require_sequence(ports, ctx)? else {
            return Ok(());
        };
        for (index, port) in items.iter().enumerate() {
            ctx.with_index(index, |ctx| validate_container_port(port, ctx))?;
        }
        Ok(())
    })?;

    optional(node, "readinessProbe", ctx, validate_probe)?;
    optional(node, "livenessProbe", ctx, validate_probe)
}

/// One entry of `ports`: containerPort, optional protocol.
pub fn validate_container_port(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }
    let config = ctx.config();

    required(node, "containerPort", ctx, validate_port_number)?;

    optional(node, "protocol", ctx, |protocol, ctx| {
        if let Some(value) = require_string(protocol, ctx)? {
            require_one_of(value, &config.protocols, protocol, ctx)?;
        }
        Ok(())
    })
}

/// An integer within the configured port range.
fn validate_port_number(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    let config = ctx.config();
    if let Some(port) = require_int(node, ctx)? {
        require_range(port, config.port_min, config.port_max, node, ctx)?;
    }
    Ok(())
}

/// `readinessProbe` / `livenessProbe`: delegates to `httpGet`.
pub fn validate_probe(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }
    required(node, "httpGet", ctx, validate_http_get_action)
}

/// `httpGet`: absolute path and a valid port.
pub fn validate_http_get_action(
    node: &Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }

    required(node, "path", ctx, |path, ctx| {
        match require_string(path, ctx)? {
            Some(value) if !value.starts_with('/') => invalid_format(value, path, ctx),
            _ => Ok(()),
        }
    })?;

    required(node, "port", ctx, validate_port_number)
}

/// `resources`: optional limits and requests.
pub fn validate_resource_requirements(
    node: &Node,
    ctx: &mut ValidationContext<'_>,
) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }

    optional(node, "limits", ctx, validate_resource_spec)?;
    optional(node, "requests", ctx, validate_resource_spec)
}

/// `limits` / `requests`: integer cpu, memory with a binary unit.
/// Other resource names are ignored.
pub fn validate_resource_spec(node: &Node, ctx: &mut ValidationContext<'_>) -> ValidationResult<()> {
    if require_mapping(node, ctx)?.is_none() {
        return Ok(());
    }
    let config = ctx.config();

    optional(node, "cpu", ctx, |cpu, ctx| require_int(cpu, ctx).map(drop))?;

    optional(node, "memory", ctx, |memory, ctx| {
        if let Some(value) = require_string(memory, ctx)? {
            require_pattern(value, &config.memory_pattern, memory, ctx)?;
        }
        Ok(())
    })
}
