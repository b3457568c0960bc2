//! Turns a selection set into one atomic edit batch
//!
//! Every selection contributes exactly one group to the batch, even when it
//! produces no edit, so all selections survive the toggle.

use crate::comment::block::{
    block_comment_prefix_suffix_edit, line_comment_prefix_suffix_edit, BlockCommentEdit,
};
use crate::comment::line::line_comment_prefix_edit;
use crate::comment::{CommentCommand, CommentContext, ToggleOutcome};
use crate::error::CommentError;
use crate::model::document::TextDocument;
use crate::model::edit::{EditBatch, EditGroup};
use crate::model::selection::{convert_to_line_selections, LineSelectionOptions, Selection};

/// Line-toggle edits for `selections`.
///
/// Cursors on the same line are coalesced into one line selection, but
/// adjacent line selections are kept apart.
pub fn line_comment_edits(
    cx: &CommentContext<'_>,
    selections: &[Selection],
    command: CommentCommand,
) -> EditBatch {
    let line_selections = convert_to_line_selections(
        cx.doc,
        selections,
        LineSelectionOptions {
            merge_adjacent: false,
            ..Default::default()
        },
    );

    let strategy = cx.strategy();
    line_selections
        .iter()
        .map(|line_sel| {
            if strategy.has_line() {
                return line_comment_prefix_edit(cx, line_sel);
            }
            if strategy.has_block() {
                if let BlockCommentEdit::Edit(group) =
                    line_comment_prefix_suffix_edit(cx, line_sel, command)
                {
                    return group;
                }
            }
            EditGroup::track_only(line_sel.selections_to_track.iter().copied())
        })
        .collect()
}

/// Block-toggle edits for `selections`.
///
/// Selections whose lines are all line-commented are collected and toggled
/// in a second, line-wise pass so that cursors sharing a line coalesce.
pub fn block_comment_edits(cx: &CommentContext<'_>, selections: &[Selection]) -> EditBatch {
    let mut batch = EditBatch::new();
    let mut line_comment_sels = Vec::new();
    let strategy = cx.strategy();

    for sel in selections {
        if !strategy.has_block() {
            batch.push(EditGroup::track_only([*sel]));
            continue;
        }
        match block_comment_prefix_suffix_edit(cx, *sel, None, CommentCommand::Block) {
            BlockCommentEdit::Edit(group) => batch.push(group),
            BlockCommentEdit::DelegateToLine => line_comment_sels.push(*sel),
        }
    }

    if !line_comment_sels.is_empty() {
        tracing::debug!(
            "Delegating {} selection(s) to the line comment pass",
            line_comment_sels.len()
        );
        batch.extend(line_comment_edits(
            cx,
            &line_comment_sels,
            CommentCommand::Block,
        ));
    }

    dedup_shared_edits(batch)
}

/// Two cursors inside the same block comment request identical edits. Keep
/// the first request and let the others ride along as tracked selections.
fn dedup_shared_edits(batch: EditBatch) -> EditBatch {
    let mut seen: Vec<Vec<_>> = Vec::new();
    batch
        .into_iter()
        .map(|mut group| {
            if group.has_edits() && seen.contains(&group.edits) {
                group.edits.clear();
            } else if group.has_edits() {
                seen.push(group.edits.clone());
            }
            group
        })
        .collect()
}

/// Apply a batch to `doc`, returning the remapped selections and the outcome
pub fn apply(
    doc: &mut TextDocument,
    batch: EditBatch,
) -> Result<(Vec<Selection>, ToggleOutcome), CommentError> {
    let edits = batch.iter().map(|group| group.edits.len()).sum();
    let selections = doc.do_multiple_edits(batch)?;
    Ok((selections, ToggleOutcome::Applied { edits }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::{CommentOptions, CommentSyntax};
    use crate::model::position::Position;
    use crate::primitives::tokenizer::TokenizedDocument;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    fn run(
        text: &str,
        syntax: &CommentSyntax,
        selections: &[Selection],
        block: bool,
    ) -> (String, Vec<Selection>, ToggleOutcome) {
        let mut doc = TextDocument::from_str(text);
        let batch = {
            let tokens = TokenizedDocument::new(&doc, syntax);
            let cx = CommentContext::new(&doc, &tokens, syntax, CommentOptions::default()).unwrap();
            if block {
                block_comment_edits(&cx, selections)
            } else {
                line_comment_edits(&cx, selections, CommentCommand::Line)
            }
        };
        let (sels, outcome) = apply(&mut doc, batch).unwrap();
        (doc.text(), sels, outcome)
    }

    #[test]
    fn test_cursors_on_same_line_coalesce() {
        let syntax = CommentSyntax::line(&["//"]);
        let (text, sels, outcome) = run(
            "abc\ndef",
            &syntax,
            &[Selection::cursor(pos(0, 1)), Selection::cursor(pos(0, 2))],
            false,
        );
        assert_eq!(text, "//abc\ndef");
        assert_eq!(outcome, ToggleOutcome::Applied { edits: 1 });
        assert_eq!(
            sels,
            vec![Selection::cursor(pos(0, 3)), Selection::cursor(pos(0, 4))]
        );
    }

    #[test]
    fn test_adjacent_lines_are_toggled_independently() {
        let syntax = CommentSyntax::line(&["//"]);
        let (text, _, _) = run(
            "//a\nb",
            &syntax,
            &[Selection::cursor(pos(0, 0)), Selection::cursor(pos(1, 0))],
            false,
        );
        assert_eq!(text, "a\n//b");
    }

    #[test]
    fn test_block_only_language_line_command() {
        let syntax = CommentSyntax::block("<!--", "-->");
        let (text, sels, _) = run("<p>\n<b>", &syntax, &[Selection::cursor(pos(0, 1))], false);
        assert_eq!(text, "<!--<p>-->\n<b>");
        assert_eq!(sels, vec![Selection::cursor(pos(0, 5))]);

        let (text, _, _) = run(&text, &syntax, &[sels[0]], false);
        assert_eq!(text, "<p>\n<b>");
    }

    #[test]
    fn test_block_command_delegates_line_comments() {
        let syntax = CommentSyntax::line(&["//"]).with_block("/*", "*/");
        let (text, _, _) = run(
            "// a\n// b\nx",
            &syntax,
            &[Selection::new(pos(0, 0), pos(1, 4))],
            true,
        );
        assert_eq!(text, " a\n b\nx");
    }

    #[test]
    fn test_block_command_mixes_block_and_line_selections() {
        let syntax = CommentSyntax::line(&["//"]).with_block("/*", "*/");
        let (text, sels, _) = run(
            "// a\nx",
            &syntax,
            &[Selection::cursor(pos(0, 2)), Selection::cursor(pos(1, 1))],
            true,
        );
        assert_eq!(text, " a\nx/**/");
        assert_eq!(sels.len(), 2);
        assert_eq!(sels[1], Selection::cursor(pos(1, 3)));
    }

    #[test]
    fn test_two_cursors_in_one_block_uncomment_once() {
        let syntax = CommentSyntax::line(&["//"]).with_block("/*", "*/");
        let (text, sels, outcome) = run(
            "/* abc */",
            &syntax,
            &[Selection::cursor(pos(0, 4)), Selection::cursor(pos(0, 6))],
            true,
        );
        assert_eq!(text, " abc ");
        assert_eq!(outcome, ToggleOutcome::Applied { edits: 2 });
        assert_eq!(
            sels,
            vec![Selection::cursor(pos(0, 2)), Selection::cursor(pos(0, 4))]
        );
    }

    #[test]
    fn test_block_command_without_block_syntax_keeps_selections() {
        let syntax = CommentSyntax::line(&["#"]);
        let sel = Selection::new(pos(0, 0), pos(0, 2));
        let (text, sels, outcome) = run("ab", &syntax, &[sel], true);
        assert_eq!(text, "ab");
        assert_eq!(sels, vec![sel]);
        assert_eq!(outcome, ToggleOutcome::Applied { edits: 0 });
    }

    #[test]
    fn test_line_command_follows_strategy() {
        let syntax = CommentSyntax::line(&[""]).with_block("/*", "*/");
        let (text, _, _) = run("a", &syntax, &[Selection::cursor(pos(0, 0))], false);
        assert_eq!(text, "/*a*/");

        let sel = Selection::cursor(pos(0, 1));
        let (text, sels, outcome) = run("a", &CommentSyntax::default(), &[sel], false);
        assert_eq!(text, "a");
        assert_eq!(sels, vec![sel]);
        assert_eq!(outcome, ToggleOutcome::Applied { edits: 0 });
    }
}
