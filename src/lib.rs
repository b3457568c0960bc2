//! Comment toggling and line editing for multi-cursor text buffers.
//!
//! [`EditorState`] holds a [`TextDocument`], its selections and the language
//! configuration. Its commands build a batch of edits for all selections at
//! once and apply it atomically, remapping every selection through it.

pub mod comment;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod primitives;

pub use comment::{CommentSyntax, ToggleOutcome};
pub use config::{Config, EditorConfig, LanguageConfig};
pub use editor::EditorState;
pub use error::{CommentError, ConfigError, EditError};
pub use model::document::TextDocument;
pub use model::position::Position;
pub use model::selection::Selection;
