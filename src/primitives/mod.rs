//! Low-level primitives
//!
//! This module contains the comment-aware tokenizer and the token cursor
//! the comment scanner walks with.

pub mod token_context;
pub mod tokenizer;
