//! YAML parser that builds Node trees.

use crate::{Error, LineIndex, MappingEntry, Node, Result, ScalarTag, SourceInfo};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse the first YAML document of a string into a Node tree.
///
/// # Example
///
/// ```rust
/// use pod_yaml::parse;
///
/// let root = parse("kind: Pod").unwrap();
/// assert!(root.is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or the input holds no document.
pub fn parse(content: &str) -> Result<Node> {
    parse_documents(content)?
        .into_iter()
        .next()
        .ok_or(Error::NoDocument)
}

/// Parse the first YAML document of a file's contents.
///
/// The filename only feeds logging; positions in the tree are always
/// relative to `content`.
pub fn parse_file(content: &str, filename: &str) -> Result<Node> {
    tracing::debug!(file = filename, "parsing YAML document");
    parse(content)
}

/// Parse every document of a YAML stream, in order.
///
/// An empty stream yields an empty vector.
pub fn parse_documents(content: &str) -> Result<Vec<Node>> {
    let lines = LineIndex::new(content);
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(content, &lines);

    parser.load(&mut builder, true).map_err(|err| Error::ParseError {
        message: err.to_string(),
        line: Some(lines.locate(err.marker().index()).0),
    })?;

    builder.finish()
}

/// Builder that implements MarkedEventReceiver to construct Node trees.
struct TreeBuilder<'a> {
    lines: &'a LineIndex,

    /// Source text by character, for locating empty values
    chars: Vec<char>,

    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Completed document roots
    documents: Vec<Node>,

    /// First structural problem seen in the event stream
    error: Option<Error>,
}

/// A collection being constructed during parsing.
enum BuildNode {
    Sequence {
        start: usize,
        items: Vec<Node>,
    },
    Mapping {
        start: usize,
        /// Keys wait here until their value arrives
        pending_key: Option<Node>,
        entries: Vec<MappingEntry>,
    },
}

impl<'a> TreeBuilder<'a> {
    fn new(content: &str, lines: &'a LineIndex) -> Self {
        Self {
            lines,
            chars: content.chars().collect(),
            stack: Vec::new(),
            documents: Vec::new(),
            error: None,
        }
    }

    fn finish(self) -> Result<Vec<Node>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.documents),
        }
    }

    fn fail(&mut self, message: &str) {
        if self.error.is_none() {
            self.error = Some(Error::InvalidStructure {
                message: message.to_string(),
            });
        }
    }

    fn push_complete(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.documents.push(node),
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping {
                pending_key,
                entries,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push(MappingEntry { key, value: node }),
                None => *pending_key = Some(node),
            },
        }
    }

    /// Where an empty plain scalar belongs.
    ///
    /// The scanner reports an empty value at the token that follows it,
    /// which may sit several lines further down. A mapping value is placed
    /// right after its key; anything else right after the last content
    /// character (typically the `-` of its sequence entry).
    fn empty_value_offset(&self, marker: usize) -> usize {
        if let Some(BuildNode::Mapping {
            pending_key: Some(key),
            ..
        }) = self.stack.last()
        {
            return key.source_info.end_offset();
        }
        self.content_end_before(marker)
    }

    /// Offset just past the last character before `offset` that is neither
    /// whitespace nor part of a comment.
    fn content_end_before(&self, offset: usize) -> usize {
        let mut end = offset.min(self.chars.len());
        loop {
            while end > 0 && self.chars[end - 1].is_whitespace() {
                end -= 1;
            }
            let line_start = self.chars[..end]
                .iter()
                .rposition(|&c| c == '\n')
                .map_or(0, |i| i + 1);
            let line = &self.chars[line_start..end];
            let comment = line
                .iter()
                .enumerate()
                .position(|(i, &c)| c == '#' && (i == 0 || line[i - 1].is_whitespace()));
            match comment {
                Some(start) => end = line_start + start,
                None => return end,
            }
        }
    }

    fn span(&self, start: usize, end: usize) -> SourceInfo {
        self.lines.source_info(start, end.saturating_sub(start))
    }
}

impl MarkedEventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(value, style, _anchor_id, tag) => {
                let plain = matches!(style, TScalarStyle::Plain);
                let explicit = tag
                    .as_ref()
                    .filter(|t| t.handle == "!!" || t.handle == "tag:yaml.org,2002:")
                    .map(|t| t.suffix.as_str());
                let tag = ScalarTag::resolve(&value, plain, explicit);
                let source_info = if plain && value.is_empty() {
                    self.lines.source_info(self.empty_value_offset(marker.index()), 0)
                } else {
                    let quotes = match style {
                        TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => 2,
                        _ => 0,
                    };
                    self.lines
                        .source_info(marker.index(), value.chars().count() + quotes)
                };
                self.push_complete(Node::new_scalar(value, tag, source_info));
            }

            Event::SequenceStart(_anchor_id, _tag) => {
                self.stack.push(BuildNode::Sequence {
                    start: marker.index(),
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(BuildNode::Sequence { start, items }) => {
                    let source_info = self.span(start, marker.index());
                    self.push_complete(Node::new_sequence(items, source_info));
                }
                _ => self.fail("sequence end without matching start"),
            },

            Event::MappingStart(_anchor_id, _tag) => {
                self.stack.push(BuildNode::Mapping {
                    start: marker.index(),
                    pending_key: None,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(BuildNode::Mapping {
                    start,
                    pending_key: None,
                    entries,
                }) => {
                    let source_info = self.span(start, marker.index());
                    self.push_complete(Node::new_mapping(entries, source_info));
                }
                Some(BuildNode::Mapping { .. }) => self.fail("mapping key without value"),
                _ => self.fail("mapping end without matching start"),
            },

            Event::Alias(_anchor_id) => {
                // Anchors are not expanded; an alias reads as null.
                let source_info = self.lines.source_info(marker.index(), 0);
                self.push_complete(Node::new_scalar("", ScalarTag::Null, source_info));
            }

            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}
        }
    }
}
