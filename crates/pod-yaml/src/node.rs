//! Typed YAML nodes with source location tracking.

use crate::SourceInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the parsed document tree.
///
/// Nodes are immutable snapshots of the input. Validation code borrows them
/// and pattern-matches on [`NodeKind`].
///
/// ## Example
///
/// ```rust
/// use pod_yaml::{parse, NodeKind};
///
/// let root = parse("ports:\n  - containerPort: 80").unwrap();
/// match &root.get("ports").unwrap().kind {
///     NodeKind::Sequence(items) => assert_eq!(items.len(), 1),
///     other => panic!("unexpected node {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// What the node is: scalar, mapping or sequence
    pub kind: NodeKind,

    /// Source location for this node.
    pub source_info: SourceInfo,
}

/// The shape of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeKind {
    /// A leaf value
    Scalar(Scalar),

    /// Key/value pairs in document order
    Mapping(Vec<MappingEntry>),

    /// Items in document order
    Sequence(Vec<Node>),
}

/// A scalar value together with its resolved type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scalar {
    /// The scalar text as written, after unquoting and escape processing
    pub value: String,

    /// Resolved type of the scalar
    pub tag: ScalarTag,
}

/// Primitive type of a scalar.
///
/// Quoted and block scalars are always [`ScalarTag::Str`]. Plain scalars are
/// resolved with the YAML 1.2 core schema. An explicit `!!` tag overrides
/// both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarTag {
    Str,
    Int,
    Float,
    Bool,
    Null,
}

/// A key-value pair in a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub key: Node,
    pub value: Node,
}

impl Node {
    /// Create a scalar node.
    pub fn new_scalar(value: impl Into<String>, tag: ScalarTag, source_info: SourceInfo) -> Self {
        Self {
            kind: NodeKind::Scalar(Scalar {
                value: value.into(),
                tag,
            }),
            source_info,
        }
    }

    /// Create a mapping node.
    pub fn new_mapping(entries: Vec<MappingEntry>, source_info: SourceInfo) -> Self {
        Self {
            kind: NodeKind::Mapping(entries),
            source_info,
        }
    }

    /// Create a sequence node.
    pub fn new_sequence(items: Vec<Node>, source_info: SourceInfo) -> Self {
        Self {
            kind: NodeKind::Sequence(items),
            source_info,
        }
    }

    /// 1-based source line of the node.
    pub fn line(&self) -> usize {
        self.source_info.line
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// The scalar text, only if the scalar is tagged as a string.
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(Scalar {
                value,
                tag: ScalarTag::Str,
            }) => Some(value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[MappingEntry]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a mapping value by key.
    ///
    /// Scans entries in document order and returns the first entry whose key
    /// is a scalar with the given text. Returns None for non-mappings.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?.iter().find_map(|entry| {
            match entry.key.as_scalar() {
                Some(scalar) if scalar.value == key => Some(&entry.value),
                _ => None,
            }
        })
    }

    /// Get a sequence item by index.
    pub fn get_item(&self, index: usize) -> Option<&Node> {
        self.as_sequence()?.get(index)
    }

    /// Number of children (sequence length or mapping entry count).
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Scalar(_) => 0,
            NodeKind::Mapping(entries) => entries.len(),
            NodeKind::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable name of the node's type, as used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Scalar(scalar) => scalar.tag.name(),
            NodeKind::Mapping(_) => "object",
            NodeKind::Sequence(_) => "array",
        }
    }
}

impl Scalar {
    /// Integer value of an `Int`-tagged scalar.
    pub fn as_i64(&self) -> Option<i64> {
        match self.tag {
            ScalarTag::Int => parse_int(&self.value),
            _ => None,
        }
    }
}

impl ScalarTag {
    /// Resolve the tag of a scalar.
    ///
    /// `plain` is false for quoted and block scalars. `explicit` is the
    /// suffix of a `!!` tag, if one was written.
    pub fn resolve(value: &str, plain: bool, explicit: Option<&str>) -> Self {
        if let Some(suffix) = explicit {
            match suffix {
                "str" => return ScalarTag::Str,
                "int" => return ScalarTag::Int,
                "float" => return ScalarTag::Float,
                "bool" => return ScalarTag::Bool,
                "null" => return ScalarTag::Null,
                _ => {}
            }
        }
        if !plain {
            return ScalarTag::Str;
        }

        match value {
            "" | "~" | "null" | "Null" | "NULL" => return ScalarTag::Null,
            "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => return ScalarTag::Bool,
            _ => {}
        }

        if parse_int(value).is_some() {
            ScalarTag::Int
        } else if is_float(value) {
            ScalarTag::Float
        } else {
            ScalarTag::Str
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarTag::Str => "string",
            ScalarTag::Int => "int",
            ScalarTag::Float => "float",
            ScalarTag::Bool => "bool",
            ScalarTag::Null => "null",
        }
    }
}

impl fmt::Display for ScalarTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a core-schema integer: decimal with optional sign, `0o` octal or
/// `0x` hexadecimal.
fn parse_int(value: &str) -> Option<i64> {
    if let Some(octal) = value.strip_prefix("0o") {
        if octal.is_empty() || !octal.bytes().all(|b| matches!(b, b'0'..=b'7')) {
            return None;
        }
        return i64::from_str_radix(octal, 8).ok();
    }
    if let Some(hex) = value.strip_prefix("0x") {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return i64::from_str_radix(hex, 16).ok();
    }
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<i64>().ok()
}

fn is_float(value: &str) -> bool {
    match value {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" | "-.inf" | "-.Inf" | "-.INF"
        | ".nan" | ".NaN" | ".NAN" => return true,
        _ => {}
    }
    let body = value.strip_prefix(['-', '+']).unwrap_or(value);
    let has_digit = body.bytes().any(|b| b.is_ascii_digit());
    let well_formed = body
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'-' | b'+'));
    has_digit && well_formed && body.parse::<f64>().is_ok()
}
