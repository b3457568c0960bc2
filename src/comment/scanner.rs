//! Backward search deciding whether a token sits inside a block comment

use crate::comment::patterns::{BlockPatterns, LinePatterns};
use crate::primitives::token_context::TokenContext;

/// Whether the comment token at `ctx` is inside a block comment that started
/// before it, or, for a bare delimiter of an ambiguous pair, whether that
/// delimiter closes a block.
///
/// Walks backward past whitespace and line comments to the nearest other
/// token. A comment that is neither a prefix nor a suffix must be the body of
/// a block, a prefix without its suffix means the block is still open, and a
/// token ending in the suffix closes it. When the nearest
/// token is itself a bare ambiguous delimiter the answer is the opposite of
/// that delimiter's own answer, so the search continues from there with the
/// result flipped. Reaching the start of the document or a non-comment token
/// means no open block.
pub fn is_prev_token_block_comment(
    ctx: TokenContext<'_>,
    line: &LinePatterns,
    block: &BlockPatterns,
) -> bool {
    let mut flip = false;
    let mut cursor = ctx;

    loop {
        let mut prev = cursor.move_prev_skipping_whitespace();
        while let Some(candidate) = prev.filter(|c| line.matches(&c.token().text)) {
            prev = candidate.move_prev_skipping_whitespace();
        }

        let Some(found) = prev.filter(|c| c.token().is_comment()) else {
            return flip;
        };
        let text = &found.token().text;
        let closes = block.is_suffix(text);

        if !closes && !block.is_prefix(text) {
            return !flip;
        }
        if block.is_bare_ambiguous_delimiter(text) {
            tracing::trace!("Bare delimiter at {}, flipping", found.token_start());
            flip = !flip;
            cursor = found;
            continue;
        }
        return !closes != flip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::patterns::CommentPatterns;
    use crate::comment::CommentSyntax;
    use crate::model::document::TextDocument;
    use crate::model::position::Position;
    use crate::primitives::tokenizer::TokenizedDocument;

    fn check(text: &str, syntax: &CommentSyntax, pos: Position) -> bool {
        let doc = TextDocument::from_str(text);
        let tokens = TokenizedDocument::new(&doc, syntax);
        let patterns = CommentPatterns::new(syntax).unwrap();
        let ctx = TokenContext::at(&tokens, pos).unwrap();
        is_prev_token_block_comment(ctx, &patterns.line, patterns.block.as_ref().unwrap())
    }

    fn c_syntax() -> CommentSyntax {
        CommentSyntax::line(&["//"]).with_block("/*", "*/")
    }

    fn python_syntax() -> CommentSyntax {
        CommentSyntax::line(&["#"]).with_block("\"\"\"", "\"\"\"")
    }

    #[test]
    fn test_line_comment_inside_block() {
        assert!(check("/*\n// inside\n*/", &c_syntax(), Position::new(1, 0)));
    }

    #[test]
    fn test_line_comment_after_closed_block() {
        assert!(!check("/* a */\n// outside", &c_syntax(), Position::new(1, 0)));
    }

    #[test]
    fn test_plain_token_stops_search() {
        assert!(!check("x = 1;\n// outside", &c_syntax(), Position::new(1, 0)));
    }

    #[test]
    fn test_start_of_document() {
        assert!(!check("// first", &c_syntax(), Position::new(0, 0)));
    }

    #[test]
    fn test_skips_line_comments_between() {
        assert!(check(
            "/* open\n// one\n// two",
            &c_syntax(),
            Position::new(2, 0)
        ));
    }

    #[test]
    fn test_ambiguous_opening_delimiter() {
        assert!(!check("\"\"\"\na\n\"\"\"", &python_syntax(), Position::new(0, 0)));
    }

    #[test]
    fn test_ambiguous_closing_delimiter() {
        assert!(check("\"\"\"\na\n\"\"\"", &python_syntax(), Position::new(2, 0)));
    }

    #[test]
    fn test_ambiguous_parity_over_empty_blocks() {
        // Two empty blocks: the fourth delimiter closes, the third opens.
        let text = "\"\"\"\n\"\"\"\n\"\"\"\n\"\"\"";
        assert!(check(text, &python_syntax(), Position::new(3, 0)));
        assert!(!check(text, &python_syntax(), Position::new(2, 0)));
        assert!(check(text, &python_syntax(), Position::new(1, 0)));
    }
}
