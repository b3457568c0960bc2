//! Line and block comment toggling over multi-cursor selections.
//!
//! The entry points in [`coalescer`] turn the current selection set into one
//! [`EditBatch`](crate::model::edit::EditBatch); the builders in [`line`] and
//! [`block`] decide per selection whether to comment, uncomment, do nothing,
//! or hand a block request over to the line builder.

pub mod block;
pub mod coalescer;
pub mod line;
pub mod patterns;
pub mod scanner;

use crate::comment::patterns::CommentPatterns;
use crate::model::document::TextDocument;
use crate::primitives::tokenizer::TokenizedDocument;

/// Comment delimiters of one language mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Line comment prefixes; the first one is used when commenting
    pub line_prefixes: Vec<String>,
    pub block_prefix: Option<String>,
    pub block_suffix: Option<String>,
}

impl CommentSyntax {
    pub fn line(prefixes: &[&str]) -> Self {
        Self {
            line_prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn block(prefix: &str, suffix: &str) -> Self {
        Self {
            block_prefix: Some(prefix.to_string()),
            block_suffix: Some(suffix.to_string()),
            ..Self::default()
        }
    }

    pub fn with_block(mut self, prefix: &str, suffix: &str) -> Self {
        self.block_prefix = Some(prefix.to_string());
        self.block_suffix = Some(suffix.to_string());
        self
    }

    pub fn has_line_comment_syntax(&self) -> bool {
        self.line_prefixes.iter().any(|p| !p.is_empty())
    }

    pub fn has_block_comment_syntax(&self) -> bool {
        self.block_delimiters().is_some()
    }

    /// Block prefix and suffix, when both are defined and non-empty
    pub fn block_delimiters(&self) -> Option<(&str, &str)> {
        match (&self.block_prefix, &self.block_suffix) {
            (Some(prefix), Some(suffix)) if !prefix.is_empty() && !suffix.is_empty() => {
                Some((prefix.as_str(), suffix.as_str()))
            }
            _ => None,
        }
    }
}

/// Which builders can run for a language mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStrategy {
    LineOnly,
    BlockOnly,
    Both,
    Neither,
}

pub fn choose_strategy(syntax: &CommentSyntax) -> CommentStrategy {
    match (
        syntax.has_line_comment_syntax(),
        syntax.has_block_comment_syntax(),
    ) {
        (true, true) => CommentStrategy::Both,
        (true, false) => CommentStrategy::LineOnly,
        (false, true) => CommentStrategy::BlockOnly,
        (false, false) => CommentStrategy::Neither,
    }
}

impl CommentStrategy {
    pub fn has_line(self) -> bool {
        matches!(self, Self::LineOnly | Self::Both)
    }

    pub fn has_block(self) -> bool {
        matches!(self, Self::BlockOnly | Self::Both)
    }
}

/// The command that triggered a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentCommand {
    Line,
    Block,
}

/// Options threaded into both builders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentOptions {
    /// Align inserted delimiters with the shallowest indentation instead of
    /// column 0
    pub indent_line_comment: bool,
}

/// Result of a toggle command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The batch was applied; `edits` counts the individual text edits
    Applied { edits: usize },
    /// The language defines no comment syntax; nothing was changed
    Unsupported,
}

/// Everything the builders read while computing edits
pub struct CommentContext<'a> {
    pub doc: &'a TextDocument,
    pub tokens: &'a TokenizedDocument,
    pub syntax: &'a CommentSyntax,
    pub patterns: CommentPatterns,
    pub options: CommentOptions,
}

impl<'a> CommentContext<'a> {
    pub fn new(
        doc: &'a TextDocument,
        tokens: &'a TokenizedDocument,
        syntax: &'a CommentSyntax,
        options: CommentOptions,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            doc,
            tokens,
            syntax,
            patterns: CommentPatterns::new(syntax)?,
            options,
        })
    }

    pub fn strategy(&self) -> CommentStrategy {
        choose_strategy(self.syntax)
    }

    pub(crate) fn line_text(&self, line: usize) -> &'a str {
        self.doc.get_line(line).unwrap_or("")
    }
}

/// Column of the first non-whitespace character, or the line length for a
/// blank line
pub(crate) fn first_non_whitespace(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_strategy() {
        assert_eq!(
            choose_strategy(&CommentSyntax::line(&["//"]).with_block("/*", "*/")),
            CommentStrategy::Both
        );
        assert_eq!(
            choose_strategy(&CommentSyntax::line(&["#"])),
            CommentStrategy::LineOnly
        );
        assert_eq!(
            choose_strategy(&CommentSyntax::block("<!--", "-->")),
            CommentStrategy::BlockOnly
        );
        assert_eq!(
            choose_strategy(&CommentSyntax::default()),
            CommentStrategy::Neither
        );
    }

    #[test]
    fn test_block_syntax_needs_both_delimiters() {
        let syntax = CommentSyntax {
            block_prefix: Some("/*".to_string()),
            ..CommentSyntax::default()
        };
        assert!(!syntax.has_block_comment_syntax());
    }

    #[test]
    fn test_first_non_whitespace() {
        assert_eq!(first_non_whitespace("    foo"), 4);
        assert_eq!(first_non_whitespace("\tfoo"), 1);
        assert_eq!(first_non_whitespace("   "), 3);
        assert_eq!(first_non_whitespace(""), 0);
    }
}
