//! Line-oriented editing commands
//!
//! All of these work on every selection at once and commit a single batch.

use super::EditorState;
use crate::comment::first_non_whitespace;
use crate::error::EditError;
use crate::model::document::TextDocument;
use crate::model::edit::{EditBatch, EditDescriptor, EditGroup};
use crate::model::position::Position;
use crate::model::selection::{
    convert_to_line_selections, LineSelectionOptions, Selection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Whether the line selection `sel` contains the last line of the document
/// (its end was clipped instead of sitting at the start of a following line)
fn includes_last_line(doc: &TextDocument, sel: &Selection) -> bool {
    sel.end.line == doc.last_line() && !(sel.end.column == 0 && sel.end.line > sel.start.line)
}

/// Last line covered by a line selection
fn last_covered_line(sel: &Selection) -> usize {
    if sel.end.column == 0 && sel.end.line > sel.start.line {
        sel.end.line - 1
    } else {
        sel.end.line
    }
}

impl EditorState {
    /// Duplicate the lines of every cursor, and the text of every range.
    ///
    /// Cursors and ranges end up on the second copy.
    pub fn duplicate_text(&mut self) -> Result<(), EditError> {
        let (cursors, ranges): (Vec<Selection>, Vec<Selection>) = self
            .selections
            .iter()
            .copied()
            .partition(|sel| sel.is_empty());

        let doc = &self.document;
        let mut batch: EditBatch = convert_to_line_selections(doc, &cursors, Default::default())
            .into_iter()
            .map(|line_sel| {
                let sel = line_sel.selection_for_edit;
                let mut text = doc.get_range(sel.start, sel.end);
                if !text.ends_with('\n') {
                    text.push('\n');
                }
                EditGroup::edits_only(vec![EditDescriptor::insert(sel.start, text)])
            })
            .collect();

        batch.extend(ranges.iter().map(|sel| {
            EditGroup::edits_only(vec![EditDescriptor::insert(
                sel.start,
                doc.get_range(sel.start, sel.end),
            )])
        }));

        self.commit_tracking_current(batch)
    }

    /// Delete the lines covered by every selection, including their line ends
    pub fn delete_current_lines(&mut self) -> Result<(), EditError> {
        let doc = &self.document;
        let line_sels =
            convert_to_line_selections(doc, self.selections.as_slice(), Default::default());
        let batch: EditBatch = line_sels
            .into_iter()
            .map(|line_sel| {
                let sel = line_sel.selection_for_edit;
                let mut from = sel.start;
                // Without a following line to take the newline from, take the
                // one before the range, unless the range starts the document.
                if includes_last_line(doc, &sel) && from.line > 0 {
                    from = Position::new(from.line - 1, doc.line_len(from.line - 1));
                }
                EditGroup::edits_only(vec![EditDescriptor::delete(from, sel.end)])
            })
            .collect();

        self.commit_tracking_current(batch)
    }

    pub fn move_line_up(&mut self) -> Result<(), EditError> {
        self.move_lines(Direction::Up)
    }

    pub fn move_line_down(&mut self) -> Result<(), EditError> {
        self.move_lines(Direction::Down)
    }

    /// Swap the line block of every selection with the line above or below
    /// it. Blocks at the document edge stay where they are.
    ///
    /// Moving never changes the line count, so every selection simply follows
    /// its block by one line.
    fn move_lines(&mut self, direction: Direction) -> Result<(), EditError> {
        let doc = &self.document;
        let mut edits = Vec::new();
        let mut selections = Vec::with_capacity(self.selections.len());

        let line_sels =
            convert_to_line_selections(doc, self.selections.as_slice(), Default::default());
        for line_sel in line_sels {
            let sel = line_sel.selection_for_edit;
            let first = sel.start.line;
            let last = last_covered_line(&sel);
            let block = doc.get_range(Position::line_start(first), sel.end);

            let edit = match direction {
                Direction::Up if first > 0 => {
                    let above = doc.get_line(first - 1).unwrap_or("");
                    let text = if includes_last_line(doc, &sel) {
                        format!("{block}\n{above}")
                    } else {
                        format!("{block}{above}\n")
                    };
                    EditDescriptor::replace(Position::line_start(first - 1), sel.end, text)
                }
                Direction::Down if last < doc.last_line() => {
                    let below_line = last + 1;
                    let below = doc.get_line(below_line).unwrap_or("");
                    if below_line == doc.last_line() {
                        let block = block.strip_suffix('\n').unwrap_or(&block);
                        let end = Position::new(below_line, below.len());
                        EditDescriptor::replace(sel.start, end, format!("{below}\n{block}"))
                    } else {
                        let end = Position::line_start(below_line + 1);
                        EditDescriptor::replace(sel.start, end, format!("{below}\n{block}"))
                    }
                }
                _ => {
                    selections.extend(line_sel.selections_to_track);
                    continue;
                }
            };
            edits.push(edit);

            selections.extend(line_sel.selections_to_track.into_iter().map(|mut moved| {
                for pos in [&mut moved.start, &mut moved.end] {
                    match direction {
                        Direction::Up => pos.line -= 1,
                        Direction::Down => pos.line += 1,
                    }
                }
                moved
            }));
        }

        self.document
            .do_multiple_edits(vec![EditGroup::edits_only(edits)])?;
        // A full-line selection moved down onto the last line ends past it.
        let doc = &self.document;
        let selections = selections
            .into_iter()
            .map(|mut sel: Selection| {
                sel.start = doc.clip_pos(sel.start);
                sel.end = doc.clip_pos(sel.end);
                sel
            })
            .collect();
        self.set_selections(selections);
        Ok(())
    }

    pub fn open_line_above(&mut self) -> Result<(), EditError> {
        self.open_line(Direction::Up)
    }

    pub fn open_line_below(&mut self) -> Result<(), EditError> {
        self.open_line(Direction::Down)
    }

    /// Insert an empty line above or below every selection, indented like the
    /// line it was opened from, and leave one cursor at the end of each new
    /// line. Selections opening the same line share one new line.
    fn open_line(&mut self, direction: Direction) -> Result<(), EditError> {
        let doc = &self.document;
        let mut edits = Vec::new();
        let mut cursors: Vec<Selection> = Vec::new();
        let mut previous: Option<usize> = None;

        for sel in self.selections.iter() {
            let (line, source_line) = match direction {
                Direction::Up => (sel.start.line, sel.start.line),
                Direction::Down if sel.has_selection() && sel.end.column == 0 => {
                    (sel.end.line, sel.end.line - 1)
                }
                Direction::Down => (sel.end.line + 1, sel.end.line),
            };
            if previous == Some(line) {
                if let Some(last) = cursors.last_mut() {
                    last.primary |= sel.primary;
                }
                continue;
            }
            previous = Some(line);

            let indent = doc
                .get_line(source_line)
                .map_or("", |text| &text[..first_non_whitespace(text)]);
            edits.push(if line > doc.last_line() {
                EditDescriptor::insert(doc.end_pos(), format!("\n{indent}"))
            } else {
                EditDescriptor::insert(Position::line_start(line), format!("{indent}\n"))
            });

            // Every earlier new line pushes this one down by one.
            let cursor = Position::new(line + cursors.len(), indent.len());
            cursors.push(Selection::cursor(cursor).with_primary(sel.primary));
        }

        // An insertion at the end of an empty last line shares its position
        // with the one opening that line; listed first, it lands after it.
        edits.reverse();
        self.document
            .do_multiple_edits(vec![EditGroup::edits_only(edits)])?;
        self.set_selections(cursors);
        Ok(())
    }

    /// Expand every selection to whole lines, ending at the start of the next
    /// line
    pub fn select_line(&mut self) {
        let line_sels = convert_to_line_selections(
            &self.document,
            self.selections.as_slice(),
            LineSelectionOptions {
                expand_end_at_start_of_line: true,
                ..Default::default()
            },
        );
        self.set_selections(
            line_sels
                .into_iter()
                .map(|line_sel| line_sel.selection_for_edit)
                .collect(),
        );
    }

    /// Split every multi-line range into one range per line
    pub fn split_selection_into_lines(&mut self) {
        let doc = &self.document;
        let mut split = Vec::new();

        for sel in self.selections.iter() {
            if sel.start.line == sel.end.line {
                split.push(*sel);
                continue;
            }
            for line in sel.start.line..=sel.end.line {
                let start = if line == sel.start.line {
                    sel.start
                } else {
                    Position::line_start(line)
                };
                let end = if line == sel.end.line {
                    sel.end
                } else {
                    Position::new(line, doc.line_len(line))
                };
                let mut piece = Selection::new(start, end);
                piece.reversed = sel.reversed;
                piece.primary = sel.primary && line == sel.start.line;
                split.push(piece);
            }
        }

        self.set_selections(split);
    }

    pub fn add_cursor_to_prev_line(&mut self) {
        self.add_cursor_to_line(Direction::Up);
    }

    pub fn add_cursor_to_next_line(&mut self) {
        self.add_cursor_to_line(Direction::Down);
    }

    /// Add a cursor on the line above or below every selection, at the same
    /// column clipped to the line length. A cursor added from the primary
    /// selection becomes primary.
    fn add_cursor_to_line(&mut self, direction: Direction) {
        let doc = &self.document;
        let mut selections = self.selections.to_vec();
        let mut added = Vec::new();

        for sel in &mut selections {
            let target = match direction {
                Direction::Up if sel.start.line > 0 => {
                    Position::new(sel.start.line - 1, sel.start.column)
                }
                Direction::Down if sel.end.line < doc.last_line() => {
                    Position::new(sel.end.line + 1, sel.end.column)
                }
                _ => continue,
            };
            added.push(Selection::cursor(doc.clip_pos(target)).with_primary(sel.primary));
            sel.primary = false;
        }

        selections.extend(added);
        self.set_selections(selections);
    }

    /// Commit `batch` while carrying every current selection through it
    fn commit_tracking_current(&mut self, mut batch: EditBatch) -> Result<(), EditError> {
        batch.push(EditGroup::track_only(self.selections.iter().copied()));
        self.commit(batch)
    }
}
