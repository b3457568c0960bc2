use crate::model::document::TextDocument;
use crate::model::position::Position;
use serde::{Deserialize, Serialize};

/// A selected range in the document.
///
/// `start <= end` always holds; `reversed` only records whether the head
/// (the end the user is moving) sits at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    #[serde(default)]
    pub reversed: bool,
    #[serde(default)]
    pub primary: bool,
}

impl Selection {
    /// Create a selection between two positions in any order
    pub fn new(anchor: Position, head: Position) -> Self {
        if head < anchor {
            Self {
                start: head,
                end: anchor,
                reversed: true,
                primary: false,
            }
        } else {
            Self {
                start: anchor,
                end: head,
                reversed: false,
                primary: false,
            }
        }
    }

    /// An empty selection (a plain cursor)
    pub fn cursor(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    /// Whether the selection covers any text
    pub fn has_selection(&self) -> bool {
        self.start != self.end
    }

    pub fn is_empty(&self) -> bool {
        !self.has_selection()
    }

    pub fn anchor(&self) -> Position {
        if self.reversed {
            self.end
        } else {
            self.start
        }
    }

    pub fn head(&self) -> Position {
        if self.reversed {
            self.start
        } else {
            self.end
        }
    }

    /// Map both ends through a replacement of `[start, end]` with `text`
    pub fn adjust_for_change(&mut self, text: &str, start: Position, end: Position) {
        self.start = self.start.adjust_for_change(text, start, end);
        self.end = self.end.adjust_for_change(text, start, end);
    }
}

/// A selection that has to stay meaningful across an edit it may not have
/// requested itself.
///
/// When `is_before_edit` is set, the coordinates are pre-edit coordinates and
/// the document remaps them through every edit of the batch, including the
/// edits of the group the selection belongs to. Otherwise the coordinates
/// already account for the group's own edits and only the edits of other
/// groups are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedSelection {
    pub selection: Selection,
    pub is_before_edit: bool,
}

impl TrackedSelection {
    /// Coordinates already adjusted by the builder for its own edits
    pub fn explicit(selection: Selection) -> Self {
        Self {
            selection,
            is_before_edit: false,
        }
    }

    /// Pre-edit coordinates, to be remapped by the document
    pub fn before_edit(selection: Selection) -> Self {
        Self {
            selection,
            is_before_edit: true,
        }
    }
}

impl From<Selection> for TrackedSelection {
    fn from(selection: Selection) -> Self {
        Self::explicit(selection)
    }
}

/// A selection expanded to whole lines, together with the original
/// selections it subsumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSelection {
    pub selection_for_edit: Selection,
    pub selections_to_track: Vec<Selection>,
}

/// Options for [`convert_to_line_selections`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSelectionOptions {
    /// Merge a selection into the previous one when it starts exactly where
    /// the previous one ends
    pub merge_adjacent: bool,
    /// Always extend the end to the start of the next line, even when it is
    /// already at column 0
    pub expand_end_at_start_of_line: bool,
}

impl Default for LineSelectionOptions {
    fn default() -> Self {
        Self {
            merge_adjacent: true,
            expand_end_at_start_of_line: false,
        }
    }
}

fn pos_within_range(pos: Position, start: Position, end: Position, end_inclusive: bool) -> bool {
    start <= pos && if end_inclusive { pos <= end } else { pos < end }
}

/// Expand each selection to cover whole lines, coalescing selections whose
/// expanded ranges touch so they can be edited as one unit.
///
/// `selections` must be sorted by start position. Expanded ends are clipped
/// to the end of the document.
pub fn convert_to_line_selections(
    doc: &TextDocument,
    selections: &[Selection],
    options: LineSelectionOptions,
) -> Vec<LineSelection> {
    let mut combined: Vec<LineSelection> = Vec::new();

    for sel in selections {
        let mut expanded = *sel;
        expanded.start.column = 0;

        if options.expand_end_at_start_of_line || !sel.has_selection() || sel.end.column != 0 {
            expanded.end = doc.clip_pos(Position::line_start(sel.end.line + 1));
        }

        match combined.last_mut() {
            Some(prev)
                if pos_within_range(
                    expanded.start,
                    prev.selection_for_edit.start,
                    prev.selection_for_edit.end,
                    options.merge_adjacent,
                ) =>
            {
                prev.selection_for_edit.end = expanded.end.max(prev.selection_for_edit.end);
                prev.selection_for_edit.primary |= expanded.primary;
                prev.selections_to_track.push(*sel);
            }
            _ => combined.push(LineSelection {
                selection_for_edit: expanded,
                selections_to_track: vec![*sel],
            }),
        }
    }

    combined
}

/// An ordered, non-overlapping set of selections with exactly one primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selections {
    ranges: Vec<Selection>,
}

impl Selections {
    /// A single primary cursor at the start of the document
    pub fn new() -> Self {
        Self::single(Selection::cursor(Position::default()))
    }

    pub fn single(selection: Selection) -> Self {
        Self {
            ranges: vec![selection.with_primary(true)],
        }
    }

    /// Build a normalized selection set. An empty input yields a single
    /// cursor at the start of the document.
    pub fn from_vec(ranges: Vec<Selection>) -> Self {
        if ranges.is_empty() {
            return Self::new();
        }
        let mut selections = Self { ranges };
        selections.normalize();
        selections
    }

    pub fn as_slice(&self) -> &[Selection] {
        &self.ranges
    }

    pub fn to_vec(&self) -> Vec<Selection> {
        self.ranges.clone()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.ranges.iter()
    }

    pub fn primary(&self) -> &Selection {
        self.ranges
            .iter()
            .find(|sel| sel.primary)
            .unwrap_or(&self.ranges[0])
    }

    /// Sort by start, merge overlapping or touching ranges, and make sure
    /// exactly one selection is primary
    fn normalize(&mut self) {
        self.ranges.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

        let mut merged: Vec<Selection> = Vec::with_capacity(self.ranges.len());
        for sel in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.end >= sel.start => {
                    let reversed = if prev.has_selection() {
                        prev.reversed
                    } else {
                        sel.reversed
                    };
                    prev.end = prev.end.max(sel.end);
                    prev.reversed = reversed;
                    prev.primary |= sel.primary;
                }
                _ => merged.push(sel),
            }
        }

        let mut seen_primary = false;
        for sel in &mut merged {
            if sel.primary && !seen_primary {
                seen_primary = true;
            } else {
                sel.primary = false;
            }
        }
        if !seen_primary {
            if let Some(last) = merged.last_mut() {
                last.primary = true;
            }
        }

        self.ranges = merged;
    }
}

impl Default for Selections {
    fn default() -> Self {
        Self::new()
    }
}
