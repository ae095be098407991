//! Source buffer: owns the input bytes and a line-offset index.

use std::borrow::Cow;
use std::fmt;

use crate::token::Span;

/// 1-based line and column of a byte offset.
///
/// The column counts characters from the start of the line, so a
/// multi-byte UTF-8 sequence advances it by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Input text of one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    name: Option<String>,
    bytes: Vec<u8>,
    line_starts: Vec<usize>,
}

impl SourceBuffer {
    /// Wrap raw bytes; the line table is built in one pass.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            bytes
                .iter()
                .enumerate()
                .filter(|(_, b)| **b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            name: None,
            bytes,
            line_starts,
        }
    }

    /// Attach a display name, usually the file path.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// Text covered by `span`, clamped to the buffer.
    #[must_use]
    pub fn slice(&self, span: Span) -> Cow<'_, str> {
        let end = span.end.min(self.bytes.len());
        let start = span.start.min(end);
        String::from_utf8_lossy(&self.bytes[start..end])
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolve a byte offset to its line and column.
    #[must_use]
    pub fn locate(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.bytes.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_index];
        let prefix = &self.bytes[line_start..offset];
        let column = std::str::from_utf8(prefix).map_or(prefix.len(), |s| s.chars().count());
        LineCol {
            line: line_index + 1,
            column: column + 1,
        }
    }

    /// Text of a 1-based line without its terminator.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .map_or(self.bytes.len(), |next| next - 1);
        let mut text = &self.bytes[start..end.max(start)];
        if let Some(stripped) = text.strip_suffix(b"\r") {
            text = stripped;
        }
        Some(String::from_utf8_lossy(text))
    }
}

impl From<&str> for SourceBuffer {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl From<String> for SourceBuffer {
    fn from(text: String) -> Self {
        Self::new(text.into_bytes())
    }
}
