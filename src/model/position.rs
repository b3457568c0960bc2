use serde::{Deserialize, Serialize};
use std::fmt;

/// A zero-based line/column coordinate into a document.
///
/// `column` is a byte offset into the line's UTF-8 text. Positions are
/// ordered by line first, then column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Start of the given line
    pub const fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }

    /// Position just past `text` when it is inserted at `self`
    pub fn after_text(self, text: &str) -> Self {
        match text.rfind('\n') {
            Some(last_newline) => Self {
                line: self.line + text.matches('\n').count(),
                column: text.len() - last_newline - 1,
            },
            None => Self {
                line: self.line,
                column: self.column + text.len(),
            },
        }
    }

    /// Map `self` through a replacement of `[start, end]` with `text`.
    ///
    /// Positions before `start` are unchanged, positions inside the replaced
    /// range (inclusive at both ends) collapse to the end of the inserted
    /// text, and positions after `end` are shifted by the net change.
    pub fn adjust_for_change(self, text: &str, start: Position, end: Position) -> Self {
        if self < start {
            return self;
        }
        let change_end = start.after_text(text);
        if self <= end {
            return change_end;
        }

        let inserted_lines = text.matches('\n').count();
        let removed_lines = end.line - start.line;
        let line = self.line - removed_lines + inserted_lines;
        let column = if self.line == end.line {
            self.column - end.column + change_end.column
        } else {
            self.column
        };
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn test_ordering() {
        assert!(pos(0, 5) < pos(1, 0));
        assert!(pos(1, 0) < pos(1, 1));
        assert_eq!(pos(2, 3).cmp(&pos(2, 3)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_after_text() {
        assert_eq!(pos(1, 2).after_text("abc"), pos(1, 5));
        assert_eq!(pos(1, 2).after_text("ab\ncd"), pos(2, 2));
        assert_eq!(pos(1, 2).after_text("ab\n"), pos(2, 0));
        assert_eq!(pos(1, 2).after_text(""), pos(1, 2));
    }

    #[test]
    fn test_adjust_before_change_is_untouched() {
        let p = pos(0, 3);
        assert_eq!(p.adjust_for_change("xx", pos(0, 4), pos(0, 4)), p);
    }

    #[test]
    fn test_adjust_at_insertion_point_moves_past_text() {
        assert_eq!(
            pos(0, 4).adjust_for_change("//", pos(0, 4), pos(0, 4)),
            pos(0, 6)
        );
    }

    #[test]
    fn test_adjust_same_line_after_insertion() {
        assert_eq!(
            pos(3, 10).adjust_for_change("//", pos(3, 0), pos(3, 0)),
            pos(3, 12)
        );
        // Other lines keep their column
        assert_eq!(
            pos(4, 10).adjust_for_change("//", pos(3, 0), pos(3, 0)),
            pos(4, 10)
        );
    }

    #[test]
    fn test_adjust_for_line_insertion() {
        assert_eq!(
            pos(2, 3).adjust_for_change("/*\n", pos(1, 0), pos(1, 0)),
            pos(3, 3)
        );
        assert_eq!(
            pos(1, 3).adjust_for_change("/*\n", pos(1, 0), pos(1, 0)),
            pos(2, 3)
        );
    }

    #[test]
    fn test_adjust_for_deletion() {
        // Deleting "/*" at the start of line 2
        assert_eq!(
            pos(2, 5).adjust_for_change("", pos(2, 0), pos(2, 2)),
            pos(2, 3)
        );
        // Deleting a whole line
        assert_eq!(
            pos(5, 1).adjust_for_change("", pos(2, 0), pos(3, 0)),
            pos(4, 1)
        );
        assert_eq!(
            pos(3, 4).adjust_for_change("", pos(2, 0), pos(3, 0)),
            pos(2, 4)
        );
        // Inside the deleted range collapses to its start
        assert_eq!(
            pos(2, 1).adjust_for_change("", pos(2, 0), pos(3, 0)),
            pos(2, 0)
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Inserting then deleting the same text maps positions after the
            /// edit back to where they started
            #[test]
            fn insert_then_delete_restores_position(
                line in 0usize..20,
                column in 0usize..40,
                at_line in 0usize..20,
                at_column in 0usize..40,
                text in "[a-z/*\n]{0,12}",
            ) {
                let p = pos(line, column);
                let at = pos(at_line, at_column);
                prop_assume!(p > at);

                let inserted = p.adjust_for_change(&text, at, at);
                let end = at.after_text(&text);
                let restored = inserted.adjust_for_change("", at, end);
                prop_assert_eq!(restored, p);
            }
        }
    }
}
