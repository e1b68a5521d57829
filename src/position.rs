//! Byte-offset to line/column rendering.
//!
//! This is deliberately a thin layer over the offsets [`crate::error::SyntaxError`] and
//! [`crate::error::EvaluationError`] already carry; it never changes which errors are raised.

use once_cell::unsync::OnceCell;
use std::fmt::{Display, Formatter};

/// A 1-based line and column within a source program.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Translate a byte offset from a [`SyntaxError`](crate::SyntaxError)/
    /// [`EvaluationError`](crate::EvaluationError) into a line/column pair.
    pub fn from_offset(code: &Code, offset: usize) -> Self {
        code.position_at(offset)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source program with lazily computed line-break offsets, for translating
/// byte offsets reported by errors into [`Position`]s.
pub struct Code<'c> {
    pub value: &'c str,
    line_breaks: OnceCell<Vec<usize>>,
}

impl<'c> From<&'c str> for Code<'c> {
    fn from(value: &'c str) -> Self {
        Code::new(value)
    }
}

impl<'c> Code<'c> {
    pub fn new(value: &'c str) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
        }
    }

    fn obtain_line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.value
                .bytes()
                .enumerate()
                .filter_map(|(index, b)| if b == b'\n' { Some(index) } else { None })
                .collect()
        })
    }

    /// Translate a byte offset into this source into a 1-based line/column pair.
    pub fn position_at(&self, offset: usize) -> Position {
        let line_breaks = self.obtain_line_breaks();
        let index = match line_breaks.binary_search(&offset) {
            Ok(index) | Err(index) => index,
        };

        if index == 0 {
            Position::new(1, offset + 1)
        } else {
            let break_point = line_breaks[index - 1] + 1;
            Position::new(index + 1, offset.saturating_sub(break_point) + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_position() {
        let code = Code::new("foo = &bar;");
        assert_eq!(code.position_at(0), Position::new(1, 1));
        assert_eq!(code.position_at(6), Position::new(1, 7));
    }

    #[test]
    fn position_after_newline() {
        let code = Code::new("foo = &bar;\nbaz = &qux;");
        let nl = code.value.find('\n').unwrap();
        assert_eq!(code.position_at(nl + 1), Position::new(2, 1));
    }
}
