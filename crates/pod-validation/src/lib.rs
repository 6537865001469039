// Pod manifest validation
//
// This crate checks a parsed YAML tree against the fixed Pod schema
// (apiVersion, kind, metadata, spec.containers[]) and reports every
// violation as a line-addressable diagnostic.

pub mod accessor;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod rules;
pub mod scalar;
pub mod validator;

pub use config::{ConfigError, IntegerPolicy, SchemaConfig, SchemaSettings};
pub use diagnostic::Diagnostic;
pub use error::{
    DiagnosticCategory, ExpectedType, InstancePath, PathSegment, ValidationErrorKind,
    ValidationResult,
};
pub use validator::{
    ReportPolicy, ValidationContext, ValidationOptions, validate, validate_documents,
    validate_source,
};
