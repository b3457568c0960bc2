//! Line comment edits for one line selection

use crate::comment::{first_non_whitespace, CommentContext};
use crate::model::edit::{EditDescriptor, EditGroup};
use crate::model::position::Position;
use crate::model::selection::{LineSelection, Selection, TrackedSelection};

/// Add or remove line comment prefixes on every line of `line_sel`.
///
/// If any non-blank line in range is not already line-commented the lines are
/// commented, otherwise they are uncommented. Returns a track-only group when
/// the language has no line comment syntax.
pub fn line_comment_prefix_edit(cx: &CommentContext<'_>, line_sel: &LineSelection) -> EditGroup {
    let patterns = &cx.patterns.line;
    let Some(prefix) = patterns.first_prefix() else {
        return EditGroup::track_only(line_sel.selections_to_track.iter().copied());
    };

    let sel = line_sel.selection_for_edit;
    let start_line = sel.start.line;
    let mut end_line = sel.end.line;
    // A full-line selection ends at the start of the following line, which
    // is not part of the range.
    if sel.end.column == 0 && end_line > start_line {
        end_line -= 1;
    }

    if patterns.contains_uncommented_line(cx.doc, start_line, end_line) {
        let column = if cx.options.indent_line_comment {
            (start_line..=end_line)
                .map(|n| cx.line_text(n))
                .filter(|line| !line.trim().is_empty())
                .map(first_non_whitespace)
                .min()
                .unwrap_or(0)
        } else {
            0
        };
        let insert_column = |line: usize| column.min(cx.line_text(line).len());

        let edits = (start_line..=end_line)
            .map(|n| EditDescriptor::insert(Position::new(n, insert_column(n)), prefix))
            .collect();

        let selections = line_sel
            .selections_to_track
            .iter()
            .map(|tracked| {
                if tracked.start.column == 0 && tracked.has_selection() {
                    let mut kept = *tracked;
                    let end = tracked.end;
                    if end.column > 0
                        && (start_line..=end_line).contains(&end.line)
                        && end.column >= insert_column(end.line)
                    {
                        kept.end.column += prefix.len();
                    }
                    TrackedSelection::explicit(kept)
                } else {
                    TrackedSelection::before_edit(*tracked)
                }
            })
            .collect();

        tracing::debug!(
            "Line comment: adding '{}' to lines {}..={}",
            prefix,
            start_line,
            end_line
        );
        EditGroup::new(edits, selections)
    } else {
        let edits: Vec<_> = (start_line..=end_line)
            .filter_map(|n| {
                let line = cx.line_text(n);
                let found = patterns.longest_prefix(line)?;
                let column = line.find(found)?;
                Some(EditDescriptor::delete(
                    Position::new(n, column),
                    Position::new(n, column + found.len()),
                ))
            })
            .collect();

        tracing::debug!(
            "Line comment: removing {} prefix(es) from lines {}..={}",
            edits.len(),
            start_line,
            end_line
        );
        EditGroup::new(edits, before_edit(&line_sel.selections_to_track))
    }
}

pub(crate) fn before_edit(selections: &[Selection]) -> Vec<TrackedSelection> {
    selections
        .iter()
        .copied()
        .map(TrackedSelection::before_edit)
        .collect()
}
