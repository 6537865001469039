//! Source location information for YAML nodes.

use serde::{Deserialize, Serialize};

/// Source location information for a node.
///
/// Offsets and lengths are counted in characters, not bytes, which is what
/// the YAML scanner reports and what terminal renderers expect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Character offset from start of source (0-based)
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based)
    pub col: usize,

    /// Length in characters
    pub len: usize,
}

impl SourceInfo {
    /// Create a new SourceInfo with all fields specified.
    pub fn new(offset: usize, line: usize, col: usize, len: usize) -> Self {
        Self {
            offset,
            line,
            col,
            len,
        }
    }

    /// Location at the start of the given line, with no extent.
    pub fn at_line(line: usize) -> Self {
        Self {
            offset: 0,
            line,
            col: 1,
            len: 0,
        }
    }

    /// Get the end offset (exclusive) of this location.
    pub fn end_offset(&self) -> usize {
        self.offset + self.len
    }
}

impl Default for SourceInfo {
    fn default() -> Self {
        Self::at_line(1)
    }
}

/// Maps character offsets to line/column positions.
///
/// Built once per parsed text. Lines are split on `\n`; a trailing `\r`
/// belongs to the line it ends.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Character offset at which each line starts
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (index, ch) in text.chars().enumerate() {
            if ch == '\n' {
                line_starts.push(index + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based (line, column) for a character offset.
    ///
    /// Offsets past the end of the text land on the last line.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line.saturating_sub(1)];
        (line.max(1), offset - start + 1)
    }

    /// Build a SourceInfo for a span starting at `offset`.
    pub fn source_info(&self, offset: usize, len: usize) -> SourceInfo {
        let (line, col) = self.locate(offset);
        SourceInfo::new(offset, line, col, len)
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
