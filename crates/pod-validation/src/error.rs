// Error taxonomy for Pod validation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type used while walking the tree.
///
/// `Err(Halted)` means the reporting policy asked to stop; it carries no
/// information of its own, the diagnostics are in the context.
pub type ValidationResult<T> = Result<T, Halted>;

/// Marker returned when fail-fast reporting stops the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halted;

/// The shape a field was required to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedType {
    Object,
    Array,
    String,
    Int,
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExpectedType::Object => "object",
            ExpectedType::Array => "array",
            ExpectedType::String => "string",
            ExpectedType::Int => "int",
        };
        f.write_str(name)
    }
}

/// Broad class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCategory {
    /// Node kind does not match the shape the schema requires
    Structural,
    /// Required key absent
    MissingField,
    /// Present value fails a pattern, range, enum or type constraint
    Format,
    /// Duplicate identifier within a scope
    Uniqueness,
    /// The document could not be parsed at all
    Parse,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticCategory::Structural => "structural",
            DiagnosticCategory::MissingField => "missing-field",
            DiagnosticCategory::Format => "format",
            DiagnosticCategory::Uniqueness => "uniqueness",
            DiagnosticCategory::Parse => "parse",
        };
        f.write_str(name)
    }
}

/// Structured validation error kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// Wrong node kind, or a scalar with the wrong type tag
    TypeMismatch { expected: ExpectedType, got: String },

    /// Required key absent
    MissingRequiredProperty,

    /// Value not among the allowed ones
    UnsupportedValue { value: String, allowed: Vec<String> },

    /// Value does not match the field's pattern
    InvalidFormat { value: String },

    /// Integer outside an inclusive range
    OutOfRange { value: i64, minimum: i64, maximum: i64 },

    /// Empty string or sequence where content is required
    EmptyValue,

    /// Identifier already used earlier in the same scope
    DuplicateValue { value: String, first_line: usize },

    /// The stream held no document
    EmptyDocument,

    /// The parser rejected the input
    ParseFailure { detail: String },
}

impl ValidationErrorKind {
    /// Get the error code for this error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingRequiredProperty => "P-1-10",
            ValidationErrorKind::TypeMismatch { .. } => "P-1-11",
            ValidationErrorKind::UnsupportedValue { .. } => "P-1-12",
            ValidationErrorKind::InvalidFormat { .. } => "P-1-14",
            ValidationErrorKind::OutOfRange { .. } => "P-1-15",
            ValidationErrorKind::EmptyValue => "P-1-16",
            ValidationErrorKind::DuplicateValue { .. } => "P-1-19",
            ValidationErrorKind::EmptyDocument => "P-1-20",
            ValidationErrorKind::ParseFailure { .. } => "P-1-90",
        }
    }

    pub fn category(&self) -> DiagnosticCategory {
        match self {
            ValidationErrorKind::TypeMismatch { .. } | ValidationErrorKind::EmptyDocument => {
                DiagnosticCategory::Structural
            }
            ValidationErrorKind::MissingRequiredProperty => DiagnosticCategory::MissingField,
            ValidationErrorKind::UnsupportedValue { .. }
            | ValidationErrorKind::InvalidFormat { .. }
            | ValidationErrorKind::OutOfRange { .. }
            | ValidationErrorKind::EmptyValue => DiagnosticCategory::Format,
            ValidationErrorKind::DuplicateValue { .. } => DiagnosticCategory::Uniqueness,
            ValidationErrorKind::ParseFailure { .. } => DiagnosticCategory::Parse,
        }
    }

    /// Format the message for an error at `path`
    pub fn message(&self, path: &InstancePath) -> String {
        match self {
            ValidationErrorKind::TypeMismatch { expected, .. } => {
                format!("{} must be {}", path, expected)
            }
            ValidationErrorKind::MissingRequiredProperty => format!("{} is required", path),
            ValidationErrorKind::UnsupportedValue { value, .. } => {
                format!("{} has unsupported value '{}'", path, value)
            }
            ValidationErrorKind::InvalidFormat { value } => {
                format!("{} has invalid format '{}'", path, value)
            }
            ValidationErrorKind::OutOfRange { .. } => format!("{} value out of range", path),
            ValidationErrorKind::EmptyValue => format!("{} must be non-empty", path),
            ValidationErrorKind::DuplicateValue { value, first_line } => format!(
                "{} has duplicate value '{}' (first defined at line {})",
                path, value, first_line
            ),
            ValidationErrorKind::EmptyDocument => "empty document".to_string(),
            ValidationErrorKind::ParseFailure { .. } => "cannot parse document".to_string(),
        }
    }
}

/// Instance path (e.g., `spec.containers[0].image`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// Create a new empty instance path
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a key segment onto the path
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Push an index segment onto the path
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "root");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i > 0 => write!(f, ".{}", key)?,
                PathSegment::Key(key) => write!(f, "{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// A segment in an instance path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}
