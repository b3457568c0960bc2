//! Block comment edits for one selection
//!
//! The builder first walks forward from the selection start looking for a
//! comment token. Depending on what it finds the selection is commented,
//! uncommented, left alone because it spans several block comments, or handed
//! back to the caller to be line-uncommented together with the other line
//! selections.

use crate::comment::line::before_edit;
use crate::comment::patterns::BlockPatterns;
use crate::comment::scanner::is_prev_token_block_comment;
use crate::comment::{first_non_whitespace, CommentCommand, CommentContext};
use crate::model::edit::{EditDescriptor, EditGroup};
use crate::model::position::Position;
use crate::model::selection::{LineSelection, Selection, TrackedSelection};
use crate::primitives::token_context::TokenContext;

/// Result of the block builder for one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockCommentEdit {
    /// Edits (possibly none) plus the selections to carry through them
    Edit(EditGroup),
    /// Every line is already line-commented; toggle it with the line builder
    DelegateToLine,
}

/// What the scan decided to do with a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockAction {
    Comment,
    Uncomment {
        prefix: Position,
        suffix: Option<Position>,
    },
    Delegate,
    NoOp,
}

/// Add or remove a block comment around `sel`.
///
/// `selections_to_track` defaults to `sel` itself. `command` only affects
/// indentation when the indent-aware comment option is on.
pub fn block_comment_prefix_suffix_edit(
    cx: &CommentContext<'_>,
    sel: Selection,
    selections_to_track: Option<Vec<Selection>>,
    command: CommentCommand,
) -> BlockCommentEdit {
    let tracked = selections_to_track.unwrap_or_else(|| vec![sel]);
    let Some(block) = cx.patterns.block.as_ref() else {
        return BlockCommentEdit::Edit(EditGroup::track_only(tracked));
    };

    let action = scan(cx, block, sel);
    tracing::debug!("Block comment at {}..{}: {:?}", sel.start, sel.end, action);

    match action {
        BlockAction::Delegate => BlockCommentEdit::DelegateToLine,
        BlockAction::NoOp => BlockCommentEdit::Edit(EditGroup::track_only(tracked)),
        BlockAction::Comment => {
            BlockCommentEdit::Edit(comment_edit(cx, block, sel, &tracked, command))
        }
        BlockAction::Uncomment { prefix, suffix } => {
            BlockCommentEdit::Edit(uncomment_edit(cx, block, prefix, suffix, &tracked))
        }
    }
}

/// Block-comment a line selection for a language without line comments.
///
/// A selection covering one line is shrunk to exclude its trailing newline so
/// the delimiters end up on that line.
pub fn line_comment_prefix_suffix_edit(
    cx: &CommentContext<'_>,
    line_sel: &LineSelection,
    command: CommentCommand,
) -> BlockCommentEdit {
    let mut sel = line_sel.selection_for_edit;
    if sel.end.line == sel.start.line + 1 && sel.end.column == 0 {
        sel.end = Position::new(sel.start.line, cx.line_text(sel.start.line).len());
    }
    block_comment_prefix_suffix_edit(
        cx,
        sel,
        Some(line_sel.selections_to_track.clone()),
        command,
    )
}

fn scan(cx: &CommentContext<'_>, block: &BlockPatterns, sel: Selection) -> BlockAction {
    let line_patterns = &cx.patterns.line;
    let within_selection = |ctx: &TokenContext<'_>| ctx.token_start() < sel.end;

    let Some(initial) = TokenContext::at(cx.tokens, sel.start) else {
        return BlockAction::Comment;
    };

    let mut found = if initial.token().is_whitespace() {
        initial.move_next_skipping_whitespace()
    } else {
        Some(initial)
    };
    let mut comment_at_start = true;
    while let Some(ctx) = found {
        if ctx.token().is_comment() {
            break;
        }
        found = ctx
            .move_next_skipping_whitespace()
            .filter(within_selection);
        comment_at_start = false;
    }

    let Some(mut ctx) = found else {
        return BlockAction::Comment;
    };

    let is_block_comment = if line_patterns.matches(&ctx.token().text) {
        // A line comment at column 0 may still be the body of a block that
        // opened on an earlier line.
        ctx.token().start == 0
            && comment_at_start
            && is_prev_token_block_comment(ctx, line_patterns, block)
    } else {
        if block.is_bare_ambiguous_delimiter(&ctx.token().text) {
            // Step inside the block so the prefix is found backward and the
            // suffix forward.
            let at_suffix = is_prev_token_block_comment(ctx, line_patterns, block);
            let inside = if at_suffix {
                ctx.move_prev_skipping_whitespace()
            } else {
                ctx.move_next_skipping_whitespace()
            };
            ctx = inside.unwrap_or(ctx);
        }
        true
    };

    if !is_block_comment {
        let mut end_line = sel.end.line;
        if sel.end.column == 0 && sel.has_selection() && end_line > sel.start.line {
            end_line -= 1;
        }
        return if line_patterns.contains_uncommented_line(cx.doc, sel.start.line, end_line) {
            BlockAction::Comment
        } else {
            BlockAction::Delegate
        };
    }

    let inside = ctx;
    let mut cursor = Some(ctx);
    while let Some(c) = cursor.filter(|c| !block.is_prefix(&c.token().text)) {
        cursor = c.move_prev_skipping_whitespace();
    }
    let Some(prefix_ctx) = cursor else {
        return BlockAction::NoOp;
    };
    let prefix_pos = prefix_ctx.token_start();

    let mut cursor = if block.is_bare_ambiguous_delimiter(&prefix_ctx.token().text) {
        Some(inside)
    } else {
        Some(prefix_ctx)
    };
    while let Some(c) = cursor.filter(|c| !block.is_suffix(&c.token().text)) {
        cursor = c.move_next_skipping_whitespace();
    }
    let suffix_ctx = cursor;
    let suffix_pos = suffix_ctx
        .map(|c| Position::new(c.line(), c.token().end - block.suffix().len()));

    if let Some(after_suffix) = suffix_ctx {
        let mut next = after_suffix
            .move_next_skipping_whitespace()
            .filter(within_selection);
        while let Some(c) = next {
            if block.is_prefix(&c.token().text) {
                return BlockAction::NoOp;
            }
            next = c.move_next_skipping_whitespace().filter(within_selection);
        }
    }

    // The block found by searching outward may lie entirely outside the
    // selection.
    let suffix_end = suffix_pos.map(|p| Position::new(p.line, p.column + block.suffix().len()));
    if suffix_end.is_some_and(|end| sel.start > end) || sel.end < prefix_pos {
        return BlockAction::Comment;
    }

    BlockAction::Uncomment {
        prefix: prefix_pos,
        suffix: suffix_pos,
    }
}

fn comment_edit(
    cx: &CommentContext<'_>,
    block: &BlockPatterns,
    sel: Selection,
    tracked: &[Selection],
    command: CommentCommand,
) -> EditGroup {
    let prefix = block.prefix();
    let suffix = block.suffix();
    let complete_line_sel =
        sel.start.column == 0 && sel.end.column == 0 && sel.start.line < sel.end.line;
    let indent_command = cx.options.indent_line_comment && command == CommentCommand::Line;
    let first_line = cx.line_text(sel.start.line);
    let start_ch = first_non_whitespace(first_line);

    // The suffix goes first so that an empty selection ends up as
    // prefix followed by suffix.
    let edits = if complete_line_sel {
        if indent_command {
            let shallowest = (sel.start.line..sel.end.line)
                .map(|n| cx.line_text(n))
                .filter(|line| !line.trim().is_empty())
                .min_by_key(|line| first_non_whitespace(line))
                .map(leading_whitespace)
                .unwrap_or("");
            vec![
                EditDescriptor::insert(
                    Position::line_start(sel.end.line),
                    format!("{shallowest}{suffix}\n"),
                ),
                EditDescriptor::insert(
                    Position::new(sel.start.line, start_ch),
                    format!("{prefix}\n{}", leading_whitespace(first_line)),
                ),
            ]
        } else {
            vec![
                EditDescriptor::insert(sel.end, format!("{suffix}\n")),
                EditDescriptor::insert(sel.start, format!("{prefix}\n")),
            ]
        }
    } else {
        let prefix_at = if indent_command {
            Position::new(sel.start.line, start_ch)
        } else {
            sel.start
        };
        vec![
            EditDescriptor::insert(sel.end, suffix),
            EditDescriptor::insert(prefix_at, prefix),
        ]
    };

    // Positions exactly at the suffix insertion point stay before the
    // suffix; positions at the prefix insertion point move past the prefix.
    let update = |mut pos: Position| {
        if pos > sel.end {
            if complete_line_sel {
                pos.line += 1;
            } else if pos.line == sel.end.line {
                pos.column += suffix.len();
            }
        }
        if pos >= sel.start {
            if complete_line_sel {
                pos.line += 1;
            } else if pos.line == sel.start.line && !(indent_command && pos.column < start_ch) {
                pos.column += prefix.len();
            }
        }
        pos
    };

    let selections = tracked
        .iter()
        .map(|t| {
            let mut moved = *t;
            moved.start = update(t.start);
            moved.end = update(t.end);
            TrackedSelection::explicit(moved)
        })
        .collect();

    EditGroup::new(edits, selections)
}

fn uncomment_edit(
    cx: &CommentContext<'_>,
    block: &BlockPatterns,
    prefix_pos: Position,
    suffix_pos: Option<Position>,
    tracked: &[Selection],
) -> EditGroup {
    let prefix_len = block.prefix().len();
    let suffix_len = block.suffix().len();
    let indent = cx.options.indent_line_comment;

    // A delimiter alone on its line was put there by a whole-line comment;
    // remove the line with it.
    let alone = |pos: Position, len: usize| cx.line_text(pos.line).trim().len() == len;
    let prefix_alone = alone(prefix_pos, prefix_len);
    let prefix_at_start = prefix_pos.column == 0 && prefix_alone;
    let suffix_alone = suffix_pos.is_some_and(|p| alone(p, suffix_len));
    let suffix_at_start = suffix_pos.is_some_and(|p| p.column == 0) && suffix_alone;
    let whole_lines = prefix_at_start && suffix_at_start;

    let to_next_line = |line: usize| cx.doc.clip_pos(Position::line_start(line + 1));

    let mut edits = Vec::with_capacity(2);
    if let Some(suffix_pos) = suffix_pos {
        edits.push(if indent && suffix_alone {
            EditDescriptor::delete(
                Position::line_start(suffix_pos.line),
                to_next_line(suffix_pos.line),
            )
        } else if whole_lines {
            EditDescriptor::delete(suffix_pos, to_next_line(suffix_pos.line))
        } else {
            EditDescriptor::delete(
                suffix_pos,
                Position::new(suffix_pos.line, suffix_pos.column + suffix_len),
            )
        });
    }

    edits.push(if indent && prefix_alone {
        EditDescriptor::delete(
            Position::line_start(prefix_pos.line),
            to_next_line(prefix_pos.line),
        )
    } else if whole_lines {
        EditDescriptor::delete(prefix_pos, to_next_line(prefix_pos.line))
    } else {
        EditDescriptor::delete(
            prefix_pos,
            Position::new(prefix_pos.line, prefix_pos.column + prefix_len),
        )
    });

    EditGroup::new(edits, before_edit(tracked))
}

fn leading_whitespace(line: &str) -> &str {
    &line[..first_non_whitespace(line)]
}
