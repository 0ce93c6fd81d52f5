//! Source location metadata shared by the parser and error reporting.

/// Span representing a location in source code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn from_pest_span(span: pest::Span) -> Self {
        let (line, col) = span.start_pos().line_col();
        Self {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }

    /// A zero-width span at the given line and column
    pub fn point(line: usize, col: usize) -> Self {
        Self {
            start: 0,
            end: 0,
            line,
            col,
        }
    }
}
