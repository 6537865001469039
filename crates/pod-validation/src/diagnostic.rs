//! Validation diagnostics.
//!
//! A [`Diagnostic`] is one reported violation. The list of diagnostics
//! returned by the validator is the whole result: empty means valid.

use crate::error::{DiagnosticCategory, InstancePath, ValidationErrorKind};
use pod_yaml::SourceInfo;
use serde_json::json;

/// One validation violation, addressed by source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Structured error kind - machine readable
    pub kind: ValidationErrorKind,

    /// Path through the document where the error occurred
    pub path: InstancePath,

    /// 1-based source line, or 0 when the error has no location
    /// (missing fields, empty or unparseable documents)
    pub line: usize,

    /// Source span of the offending node, when there is one
    pub span: Option<SourceInfo>,
}

impl Diagnostic {
    /// A diagnostic that is not attributable to a node.
    pub fn unlocated(kind: ValidationErrorKind, path: InstancePath) -> Self {
        Self {
            kind,
            path,
            line: 0,
            span: None,
        }
    }

    /// The single diagnostic standing in for a document the parser rejected.
    pub fn parse_failure(error: &pod_yaml::Error) -> Self {
        Self::unlocated(
            ValidationErrorKind::ParseFailure {
                detail: error.to_string(),
            },
            InstancePath::new(),
        )
    }

    /// Get human-readable message
    pub fn message(&self) -> String {
        self.kind.message(&self.path)
    }

    pub fn code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn category(&self) -> DiagnosticCategory {
        self.kind.category()
    }

    /// Render as JSON for machine consumption
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = json!({
            "line": self.line,
            "path": self.path.to_string(),
            "code": self.code(),
            "category": self.category(),
            "message": self.message(),
            "error_kind": self.kind,
        });

        if let Some(span) = &self.span {
            obj["span"] = json!(span);
        }

        obj
    }
}
