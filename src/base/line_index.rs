//! Line/column conversion for byte offsets.

use text_size::{TextRange, TextSize};

/// A zero-based line/column position. Columns count UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// A line/column range, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: LineCol,
    pub end: LineCol,
}

impl Span {
    /// Check if a position falls within this span
    pub fn contains(&self, position: LineCol) -> bool {
        self.start <= position && position < self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.start.line, self.start.col, self.end.line, self.end.col
        )
    }
}

/// Maps byte offsets of one document to line/column positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::from(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Offsets past the end clamp to the end of the document
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        LineCol {
            line: line as u32,
            col: u32::from(offset - self.line_starts[line]),
        }
    }

    /// Returns `None` for lines past the end of the document
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        Some((start + TextSize::from(line_col.col)).min(self.len))
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span {
            start: self.line_col(range.start()),
            end: self.line_col(range.end()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_round_trip() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);
        let pos = index.line_col(TextSize::from(4));
        assert_eq!(pos, LineCol { line: 1, col: 1 });
        assert_eq!(index.offset(pos), Some(TextSize::from(4)));
        assert_eq!(index.line_col(TextSize::from(7)), LineCol { line: 3, col: 0 });
    }

    #[test]
    fn test_offsets_clamp_to_end() {
        let index = LineIndex::new("abc");
        assert_eq!(index.line_col(TextSize::from(100)), LineCol { line: 0, col: 3 });
        assert_eq!(index.offset(LineCol { line: 5, col: 0 }), None);
    }

    #[test]
    fn test_span_display() {
        let index = LineIndex::new("class C\n{\n}\n");
        let span = index.span(TextRange::new(TextSize::from(8), TextSize::from(11)));
        assert_eq!(span.to_string(), "(1,0)-(2,1)");
        assert!(span.contains(LineCol { line: 1, col: 5 }));
    }
}
