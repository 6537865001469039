//! # pod-yaml
//!
//! YAML parsing into a typed node tree with source positions.
//!
//! This crate provides [`Node`], a closed sum type over scalars, mappings and
//! sequences. Every node records where it came from in the original text, and
//! every scalar carries a [`ScalarTag`] that reflects how the author wrote it:
//! `port: 8080` is an integer, `port: "8080"` is a string.
//!
//! The tree is immutable once built. Consumers borrow it read-only.
//!
//! ## Example
//!
//! ```rust
//! use pod_yaml::{parse, ScalarTag};
//!
//! let root = parse("containerPort: 8080\nname: \"8080\"").unwrap();
//! let port = root.get("containerPort").unwrap();
//! assert_eq!(port.as_scalar().unwrap().tag, ScalarTag::Int);
//! assert_eq!(root.get("name").unwrap().as_str(), Some("8080"));
//! assert_eq!(port.line(), 1);
//! ```

mod error;
mod node;
mod parser;
mod source_info;

pub use error::{Error, Result};
pub use node::{MappingEntry, Node, NodeKind, Scalar, ScalarTag};
pub use parser::{parse, parse_documents, parse_file};
pub use source_info::{LineIndex, SourceInfo};
