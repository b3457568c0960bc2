//! Immutable cursor over a tokenized document
//!
//! Every move returns a new cursor instead of mutating the current one, so a
//! search can branch off a copy without disturbing the caller's position.

use crate::model::position::Position;
use crate::primitives::tokenizer::{Token, TokenizedDocument};

/// A token position inside a [`TokenizedDocument`]
#[derive(Debug, Clone, Copy)]
pub struct TokenContext<'a> {
    tokens: &'a TokenizedDocument,
    line: usize,
    index: usize,
}

impl<'a> TokenContext<'a> {
    /// Context for the token touching `pos`.
    ///
    /// Picks the token with `start < column <= end`, so a position on a token
    /// boundary belongs to the token that ends there. Column 0 picks the first
    /// token of the line. Returns `None` for a line outside the document.
    pub fn at(tokens: &'a TokenizedDocument, pos: Position) -> Option<Self> {
        let line_tokens = tokens.tokens(pos.line);
        if line_tokens.is_empty() {
            return None;
        }
        let index = if pos.column == 0 {
            0
        } else {
            line_tokens
                .iter()
                .position(|t| t.start < pos.column && pos.column <= t.end)
                .unwrap_or(line_tokens.len() - 1)
        };
        Some(Self {
            tokens,
            line: pos.line,
            index,
        })
    }

    pub fn token(&self) -> &'a Token {
        &self.tokens.tokens(self.line)[self.index]
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn token_start(&self) -> Position {
        Position::new(self.line, self.token().start)
    }

    pub fn token_end(&self) -> Position {
        Position::new(self.line, self.token().end)
    }

    /// The following token, crossing line ends; `None` at the end of the
    /// document
    pub fn move_next(self) -> Option<Self> {
        if self.index + 1 < self.tokens.tokens(self.line).len() {
            return Some(Self {
                index: self.index + 1,
                ..self
            });
        }
        ((self.line + 1)..self.tokens.line_count())
            .find(|&line| !self.tokens.tokens(line).is_empty())
            .map(|line| Self {
                line,
                index: 0,
                ..self
            })
    }

    /// The preceding token, crossing line starts; `None` at the start of the
    /// document
    pub fn move_prev(self) -> Option<Self> {
        if self.index > 0 {
            return Some(Self {
                index: self.index - 1,
                ..self
            });
        }
        (0..self.line)
            .rev()
            .find(|&line| !self.tokens.tokens(line).is_empty())
            .map(|line| Self {
                line,
                index: self.tokens.tokens(line).len() - 1,
                ..self
            })
    }

    /// Move forward at least once, then past any whitespace tokens.
    /// `None` when the document ends before a non-whitespace token.
    pub fn move_next_skipping_whitespace(self) -> Option<Self> {
        let mut ctx = self.move_next()?;
        while ctx.token().is_whitespace() {
            ctx = ctx.move_next()?;
        }
        Some(ctx)
    }

    /// Move backward at least once, then past any whitespace tokens
    pub fn move_prev_skipping_whitespace(self) -> Option<Self> {
        let mut ctx = self.move_prev()?;
        while ctx.token().is_whitespace() {
            ctx = ctx.move_prev()?;
        }
        Some(ctx)
    }
}
