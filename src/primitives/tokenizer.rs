//! Comment-aware line tokenizer
//!
//! Produces the token view the comment scanner walks over. It only knows
//! about whitespace, comments and simple quoted strings; everything else is
//! split into runs of non-whitespace text.
//!
//! Block comments spanning several lines yield one comment token per line.
//! Continuation segments include their leading whitespace, so a token that
//! closes a block ends exactly at the suffix and a token that opens one
//! starts exactly at the prefix.

use crate::comment::CommentSyntax;
use crate::model::document::TextDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    Comment,
    String,
}

/// A token within one line; `start..end` are byte columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    fn new(kind: TokenKind, line: &str, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: line[start..end].to_string(),
            start,
            end,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    /// Untyped token with no visible characters
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Plain && self.text.trim().is_empty()
    }
}

/// Tokens for every line of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedDocument {
    lines: Vec<Vec<Token>>,
}

impl TokenizedDocument {
    pub fn new(doc: &TextDocument, syntax: &CommentSyntax) -> Self {
        let tokenizer = LineTokenizer { syntax };
        let mut in_block = false;
        let lines = (0..doc.line_count())
            .map(|n| tokenizer.tokenize(doc.get_line(n).unwrap_or(""), &mut in_block))
            .collect();
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Tokens of a line; never empty for lines inside the document
    pub fn tokens(&self, line: usize) -> &[Token] {
        self.lines.get(line).map(Vec::as_slice).unwrap_or(&[])
    }
}

struct LineTokenizer<'a> {
    syntax: &'a CommentSyntax,
}

impl LineTokenizer<'_> {
    fn tokenize(&self, line: &str, in_block: &mut bool) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < line.len() {
            let (kind, end) = if *in_block {
                let (end, closed) = self.block_body_end(line, pos);
                *in_block = !closed;
                (TokenKind::Comment, end)
            } else {
                self.next_token_end(line, pos, in_block)
            };
            tokens.push(Token::new(kind, line, pos, end));
            pos = end;
        }

        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Plain, line, 0, 0));
        }
        tokens
    }

    /// End of a block comment body starting at `from`, and whether the
    /// suffix was found on this line
    fn block_body_end(&self, line: &str, from: usize) -> (usize, bool) {
        let Some((_, suffix)) = self.syntax.block_delimiters() else {
            return (line.len(), true);
        };
        match line[from..].find(suffix) {
            Some(offset) => (from + offset + suffix.len(), true),
            None => (line.len(), false),
        }
    }

    fn next_token_end(&self, line: &str, pos: usize, in_block: &mut bool) -> (TokenKind, usize) {
        let rest = &line[pos..];

        if rest.starts_with(char::is_whitespace) {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            return (TokenKind::Plain, pos + len);
        }

        if let Some((prefix, _)) = self.syntax.block_delimiters() {
            if rest.starts_with(prefix) {
                let (end, closed) = self.block_body_end(line, pos + prefix.len());
                *in_block = !closed;
                return (TokenKind::Comment, end);
            }
        }

        if self.line_prefix_at(rest).is_some() {
            return (TokenKind::Comment, line.len());
        }

        if let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
            return (TokenKind::String, pos + string_len(rest, quote));
        }

        let mut len = 0;
        for (offset, c) in rest.char_indices() {
            if offset > 0 && self.starts_special(&rest[offset..]) {
                break;
            }
            if c.is_whitespace() {
                break;
            }
            len = offset + c.len_utf8();
        }
        (TokenKind::Plain, pos + len)
    }

    fn line_prefix_at(&self, rest: &str) -> Option<&str> {
        self.syntax
            .line_prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty() && rest.starts_with(prefix.as_str()))
            .max_by_key(|prefix| prefix.len())
            .map(String::as_str)
    }

    /// Whether a comment or string starts at the beginning of `rest`
    fn starts_special(&self, rest: &str) -> bool {
        let block = self
            .syntax
            .block_delimiters()
            .is_some_and(|(prefix, _)| rest.starts_with(prefix));
        block || self.line_prefix_at(rest).is_some() || rest.starts_with(['"', '\''])
    }
}

/// Length of a quoted string at the start of `rest`, up to and including the
/// closing quote or to the end of the line
fn string_len(rest: &str, quote: char) -> usize {
    let mut escaped = false;
    for (offset, c) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return offset + c.len_utf8();
        }
    }
    rest.len()
}
