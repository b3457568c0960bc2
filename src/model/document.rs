use crate::error::EditError;
use crate::model::edit::{EditBatch, EditDescriptor};
use crate::model::position::Position;
use crate::model::selection::Selection;

/// Line-oriented text buffer.
///
/// The document always holds at least one (possibly empty) line. Lines are
/// stored without their trailing `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    lines: Vec<String>,
}

impl TextDocument {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Full text, lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn last_line(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn get_line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Length in bytes of a line, or 0 past the end of the document
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, String::len)
    }

    /// End of the document
    pub fn end_pos(&self) -> Position {
        let last = self.last_line();
        Position::new(last, self.lines[last].len())
    }

    /// Clamp a position to the document and to a character boundary
    pub fn clip_pos(&self, pos: Position) -> Position {
        if pos.line > self.last_line() {
            return self.end_pos();
        }
        let line = &self.lines[pos.line];
        let mut column = pos.column.min(line.len());
        while !line.is_char_boundary(column) {
            column -= 1;
        }
        Position::new(pos.line, column)
    }

    fn is_valid_pos(&self, pos: Position) -> bool {
        self.lines
            .get(pos.line)
            .is_some_and(|line| pos.column <= line.len() && line.is_char_boundary(pos.column))
    }

    /// Text between two positions. Both are clipped to the document.
    pub fn get_range(&self, start: Position, end: Position) -> String {
        let start = self.clip_pos(start);
        let end = self.clip_pos(end);
        if end <= start {
            return String::new();
        }
        if start.line == end.line {
            return self.lines[start.line][start.column..end.column].to_string();
        }

        let mut text = String::new();
        text.push_str(&self.lines[start.line][start.column..]);
        for line in &self.lines[start.line + 1..end.line] {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(&self.lines[end.line][..end.column]);
        text
    }

    /// Byte offset of a position from the start of the document
    pub fn index_from_pos(&self, pos: Position) -> usize {
        let pos = self.clip_pos(pos);
        let preceding: usize = self.lines[..pos.line].iter().map(|l| l.len() + 1).sum();
        preceding + pos.column
    }

    /// Position of a byte offset, clipped to the document
    pub fn pos_from_index(&self, index: usize) -> Position {
        let mut remaining = index;
        for (line, text) in self.lines.iter().enumerate() {
            if remaining <= text.len() {
                return self.clip_pos(Position::new(line, remaining));
            }
            remaining -= text.len() + 1;
        }
        self.end_pos()
    }

    /// Replace `[start, end)` with `text`
    pub fn replace_range(
        &mut self,
        text: &str,
        start: Position,
        end: Position,
    ) -> Result<(), EditError> {
        self.validate_range(start, end)?;
        self.splice(text, start, end);
        Ok(())
    }

    fn validate_range(&self, start: Position, end: Position) -> Result<(), EditError> {
        if !self.is_valid_pos(start) {
            return Err(EditError::InvalidPosition(start));
        }
        if !self.is_valid_pos(end) {
            return Err(EditError::InvalidPosition(end));
        }
        if end < start {
            return Err(EditError::InvalidRange { start, end });
        }
        Ok(())
    }

    fn splice(&mut self, text: &str, start: Position, end: Position) {
        let head = &self.lines[start.line][..start.column];
        let tail = &self.lines[end.line][end.column..];
        let joined = format!("{head}{text}{tail}");
        let replacement: Vec<String> = joined.split('\n').map(str::to_string).collect();
        self.lines.splice(start.line..=end.line, replacement);
    }

    /// Apply a batch of edit groups as one atomic operation.
    ///
    /// All edit positions are in pre-batch coordinates and must not overlap.
    /// The whole batch is validated first; on error the document is left
    /// untouched. Edits are applied back to front. Selections marked
    /// `is_before_edit` are remapped through every edit. Explicit selections
    /// are remapped only through edits of other groups that start before
    /// their own group's first edit; explicit selections of a group without
    /// edits go through every edit.
    ///
    /// Returns all tracked selections, sorted by start position.
    pub fn do_multiple_edits(&mut self, batch: EditBatch) -> Result<Vec<Selection>, EditError> {
        let mut ordered: Vec<(usize, EditDescriptor)> = batch
            .iter()
            .enumerate()
            .flat_map(|(group, entry)| entry.edits.iter().cloned().map(move |e| (group, e)))
            .collect();

        for (_, edit) in &ordered {
            self.validate_range(edit.start, edit.end())?;
        }

        // Stable sort keeps the listed order of edits sharing a start position,
        // so a suffix listed before its prefix lands after it.
        ordered.sort_by(|(_, a), (_, b)| b.start.cmp(&a.start));

        for pair in ordered.windows(2) {
            let later = &pair[0].1;
            let earlier = &pair[1].1;
            if earlier.end() > later.start {
                tracing::warn!(
                    "Rejecting edit batch: {}..{} overlaps edit at {}",
                    earlier.start,
                    earlier.end(),
                    later.start
                );
                return Err(EditError::OverlappingEdits {
                    first: earlier.end(),
                    second: later.start,
                });
            }
        }

        // Explicit selections already sit past their own group's edits, so
        // only edits of other groups that start before those are applied.
        let first_starts: Vec<Option<Position>> = batch
            .iter()
            .map(|entry| entry.edits.iter().map(|e| e.start).min())
            .collect();
        let mut tracked: Vec<Vec<_>> = batch.into_iter().map(|entry| entry.selections).collect();

        for (group, edit) in &ordered {
            let end = edit.end();
            self.splice(&edit.text, edit.start, end);

            for (index, selections) in tracked.iter_mut().enumerate() {
                for tracked_sel in selections.iter_mut() {
                    let precedes_group =
                        first_starts[index].is_none_or(|first| edit.start < first);
                    if tracked_sel.is_before_edit || (index != *group && precedes_group) {
                        tracked_sel
                            .selection
                            .adjust_for_change(&edit.text, edit.start, end);
                    }
                }
            }
        }

        tracing::trace!("Applied {} edit(s) in one batch", ordered.len());

        let mut result: Vec<Selection> = tracked
            .into_iter()
            .flatten()
            .map(|tracked_sel| {
                let mut sel = tracked_sel.selection;
                sel.start = self.clip_pos(sel.start);
                sel.end = self.clip_pos(sel.end).max(sel.start);
                sel
            })
            .collect();
        result.sort_by(|a, b| a.start.cmp(&b.start));
        Ok(result)
    }
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}
