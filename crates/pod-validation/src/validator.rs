// Pod validation engine

use crate::config::{IntegerPolicy, SchemaConfig};
use crate::diagnostic::Diagnostic;
use crate::error::{Halted, InstancePath, ValidationErrorKind, ValidationResult};
use crate::rules;
use pod_yaml::Node;
use serde::{Deserialize, Serialize};

/// What to do after the first diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportPolicy {
    /// Report every detectable violation in one pass
    #[default]
    CollectAll,
    /// Stop at the first violation
    FailFast,
}

/// Per-call validation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub policy: ReportPolicy,
    pub integer_policy: IntegerPolicy,
}

impl ValidationOptions {
    pub fn fail_fast() -> Self {
        Self {
            policy: ReportPolicy::FailFast,
            ..Self::default()
        }
    }
}

/// Validates one Pod document.
///
/// Returns the diagnostics in traversal order; an empty list means the
/// document is valid. The tree is only read.
pub fn validate(root: &Node, config: &SchemaConfig, options: ValidationOptions) -> Vec<Diagnostic> {
    let mut context = ValidationContext::new(config, options);
    // Halted only means fail-fast stopped early; the diagnostic is recorded.
    let _ = rules::validate_document(root, &mut context);
    let diagnostics = context.into_diagnostics();
    tracing::debug!(
        line = root.line(),
        diagnostics = diagnostics.len(),
        "validated document"
    );
    diagnostics
}

/// Validates the documents of one stream in order.
///
/// An empty stream is itself a violation. Under fail-fast, validation stops
/// at the first document that produces a diagnostic.
pub fn validate_documents(
    documents: &[Node],
    config: &SchemaConfig,
    options: ValidationOptions,
) -> Vec<Diagnostic> {
    if documents.is_empty() {
        return vec![Diagnostic::unlocated(
            ValidationErrorKind::EmptyDocument,
            InstancePath::new(),
        )];
    }

    let mut diagnostics = Vec::new();
    for document in documents {
        diagnostics.extend(validate(document, config, options));
        if options.policy == ReportPolicy::FailFast && !diagnostics.is_empty() {
            break;
        }
    }
    diagnostics
}

/// Parses and validates a YAML stream.
///
/// A stream the parser rejects yields the single "cannot parse document"
/// diagnostic.
pub fn validate_source(
    content: &str,
    config: &SchemaConfig,
    options: ValidationOptions,
) -> Vec<Diagnostic> {
    match pod_yaml::parse_documents(content) {
        Ok(documents) => validate_documents(&documents, config, options),
        Err(error) => {
            tracing::debug!(%error, "document rejected by parser");
            vec![Diagnostic::parse_failure(&error)]
        }
    }
}

/// Validation context tracks state during one validation call
pub struct ValidationContext<'a> {
    /// Schema constants
    config: &'a SchemaConfig,
    options: ValidationOptions,
    /// Current instance path (e.g., ["spec", "containers", 0])
    instance_path: InstancePath,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ValidationContext<'a> {
    /// Create a new validation context
    pub fn new(config: &'a SchemaConfig, options: ValidationOptions) -> Self {
        Self {
            config,
            options,
            instance_path: InstancePath::new(),
            diagnostics: Vec::new(),
        }
    }

    /// The schema constants. The reference outlives the borrow of `self`.
    pub fn config(&self) -> &'a SchemaConfig {
        self.config
    }

    pub fn integer_policy(&self) -> IntegerPolicy {
        self.options.integer_policy
    }

    pub fn path(&self) -> &InstancePath {
        &self.instance_path
    }

    /// Record a diagnostic at the current path.
    ///
    /// `node` is the offending node; pass None when the error has no
    /// location (a missing field). Returns `Err(Halted)` under fail-fast.
    pub fn report(&mut self, kind: ValidationErrorKind, node: Option<&Node>) -> ValidationResult<()> {
        let diagnostic = Diagnostic {
            kind,
            path: self.instance_path.clone(),
            line: node.map_or(0, Node::line),
            span: node.map(|n| n.source_info.clone()),
        };
        tracing::trace!(line = diagnostic.line, message = %diagnostic.message(), "diagnostic");
        self.diagnostics.push(diagnostic);

        match self.options.policy {
            ReportPolicy::CollectAll => Ok(()),
            ReportPolicy::FailFast => Err(Halted),
        }
    }

    /// Execute a function with a key segment pushed onto the path
    pub fn with_key<F, R>(&mut self, key: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push_key(key);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    /// Execute a function with an index segment pushed onto the path
    pub fn with_index<F, R>(&mut self, index: usize, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push_index(index);
        let result = f(self);
        self.instance_path.pop();
        result
    }

    /// Get the collected diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Check if validation failed
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
