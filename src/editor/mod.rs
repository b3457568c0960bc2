//! Editor state and the commands that operate on all of its selections
//!
//! Every command reads the current selection set, builds one edit batch and
//! commits it through [`TextDocument::do_multiple_edits`], then replaces the
//! selection set with the remapped selections the document returns.

mod lines;

use crate::comment::coalescer::{self, block_comment_edits, line_comment_edits};
use crate::comment::{
    choose_strategy, CommentCommand, CommentContext, CommentStrategy, CommentSyntax,
    ToggleOutcome,
};
use crate::config::{Config, EditorConfig, LanguageConfig};
use crate::error::{CommentError, EditError};
use crate::model::document::TextDocument;
use crate::model::edit::EditBatch;
use crate::model::selection::{Selection, Selections};
use crate::primitives::tokenizer::TokenizedDocument;
use std::path::Path;

/// The complete state of one editing session
#[derive(Debug, Clone)]
pub struct EditorState {
    /// The text being edited
    pub document: TextDocument,

    /// All selections, sorted, with exactly one primary
    pub selections: Selections,

    /// Language of the document, if known
    pub language: Option<LanguageConfig>,

    /// Editor behavior settings
    pub config: EditorConfig,
}

impl EditorState {
    /// Create an editor over `text` with a cursor at the start and no language
    pub fn new(text: &str) -> Self {
        Self {
            document: TextDocument::from_str(text),
            selections: Selections::new(),
            language: None,
            config: EditorConfig::default(),
        }
    }

    /// Create an editor for a file, picking the language from its extension
    pub fn for_path(text: &str, path: &Path, config: &Config) -> Self {
        let language = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| config.language_for_extension(ext));
        if let Some((name, _)) = language {
            tracing::debug!("Detected language '{}' for {}", name, path.display());
        }
        Self {
            language: language.map(|(_, language)| language.clone()),
            config: config.editor.clone(),
            ..Self::new(text)
        }
    }

    pub fn with_language(mut self, language: LanguageConfig) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn selections(&self) -> &[Selection] {
        self.selections.as_slice()
    }

    /// Replace the selection set; it is normalized (sorted and merged)
    pub fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = Selections::from_vec(selections);
    }

    /// Comment syntax of the current language; empty when none is set
    pub fn comment_syntax(&self) -> CommentSyntax {
        self.language
            .as_ref()
            .map(LanguageConfig::comment_syntax)
            .unwrap_or_default()
    }

    /// Toggle line comments on the lines of every selection
    pub fn line_comment(&mut self) -> Result<ToggleOutcome, CommentError> {
        self.toggle_comment(CommentCommand::Line)
    }

    /// Toggle a block comment around every selection
    pub fn block_comment(&mut self) -> Result<ToggleOutcome, CommentError> {
        self.toggle_comment(CommentCommand::Block)
    }

    fn toggle_comment(&mut self, command: CommentCommand) -> Result<ToggleOutcome, CommentError> {
        let syntax = self.comment_syntax();
        if choose_strategy(&syntax) == CommentStrategy::Neither {
            tracing::warn!("No comment syntax defined for this language; nothing to toggle");
            return Ok(ToggleOutcome::Unsupported);
        }

        let selections = self.selections.to_vec();
        let batch = {
            let tokens = TokenizedDocument::new(&self.document, &syntax);
            let cx = CommentContext::new(
                &self.document,
                &tokens,
                &syntax,
                self.config.comment_options(),
            )?;
            tracing::debug!(
                "{:?} comment over {} selection(s), strategy {:?}",
                command,
                selections.len(),
                cx.strategy()
            );
            match command {
                CommentCommand::Line => line_comment_edits(&cx, &selections, command),
                CommentCommand::Block => block_comment_edits(&cx, &selections),
            }
        };

        let (selections, outcome) = coalescer::apply(&mut self.document, batch)?;
        self.selections = Selections::from_vec(selections);
        Ok(outcome)
    }

    /// Apply a batch and adopt the selections it returns
    fn commit(&mut self, batch: EditBatch) -> Result<(), EditError> {
        let selections = self.document.do_multiple_edits(batch)?;
        self.selections = Selections::from_vec(selections);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::position::Position;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    fn rust() -> LanguageConfig {
        Config::default().languages["rust"].clone()
    }

    #[test]
    fn test_line_comment_toggles_and_keeps_primary() {
        let mut editor = EditorState::new("fn a() {}\nfn b() {}").with_language(rust());
        editor.set_selections(vec![
            Selection::cursor(pos(0, 3)),
            Selection::cursor(pos(1, 3)).with_primary(true),
        ]);

        let outcome = editor.line_comment().unwrap();
        assert_eq!(outcome, ToggleOutcome::Applied { edits: 2 });
        assert_eq!(editor.text(), "//fn a() {}\n//fn b() {}");
        assert_eq!(editor.selections.primary().start, pos(1, 5));

        editor.line_comment().unwrap();
        assert_eq!(editor.text(), "fn a() {}\nfn b() {}");
        assert_eq!(editor.selections.primary().start, pos(1, 3));
    }

    #[test]
    fn test_unsupported_language_leaves_text_alone() {
        let mut editor = EditorState::new("plain text");
        assert_eq!(editor.line_comment().unwrap(), ToggleOutcome::Unsupported);
        assert_eq!(editor.block_comment().unwrap(), ToggleOutcome::Unsupported);
        assert_eq!(editor.text(), "plain text");
    }

    #[test]
    fn test_for_path_detects_language_and_config() {
        let mut config = Config::default();
        config.editor.indent_line_comment = true;
        let editor = EditorState::for_path("x", Path::new("src/main.rs"), &config);
        assert_eq!(editor.language, Some(rust()));
        assert!(editor.config.indent_line_comment);

        let unknown = EditorState::for_path("x", Path::new("README"), &config);
        assert!(unknown.language.is_none());
    }

    #[test]
    fn test_indent_aware_line_comment() {
        let mut editor = EditorState::new("    a\n      b\n")
            .with_language(rust())
            .with_config(EditorConfig {
                indent_line_comment: true,
            });
        editor.set_selections(vec![Selection::new(pos(0, 0), pos(2, 0))]);
        editor.line_comment().unwrap();
        assert_eq!(editor.text(), "    //a\n    //  b\n");

        editor.line_comment().unwrap();
        assert_eq!(editor.text(), "    a\n      b\n");
    }

    #[test]
    fn test_block_comment_on_selection() {
        let mut editor = EditorState::new("let x = 1;").with_language(rust());
        editor.set_selections(vec![Selection::new(pos(0, 8), pos(0, 9))]);
        editor.block_comment().unwrap();
        assert_eq!(editor.text(), "let x = /*1*/;");
        assert_eq!(editor.selections(), &[Selection::new(pos(0, 10), pos(0, 11)).with_primary(true)]);
    }

    #[test]
    fn test_whole_line_block_keeps_range_off_next_cursor_edit() {
        let mut editor = EditorState::new("a\nb\nc").with_language(rust());
        editor.set_selections(vec![
            Selection::new(pos(0, 0), pos(1, 0)).with_primary(true),
            Selection::cursor(pos(2, 0)),
        ]);
        editor.block_comment().unwrap();
        assert_eq!(editor.text(), "/*\na\n*/\nb\n/**/c");
        assert_eq!(
            editor.selections(),
            &[
                Selection::new(pos(1, 0), pos(2, 0)).with_primary(true),
                Selection::cursor(pos(4, 2)),
            ]
        );
    }

    #[test]
    fn test_full_line_range_does_not_grow_into_next_line_comment() {
        let mut editor = EditorState::new("a\nb").with_language(rust());
        editor.set_selections(vec![
            Selection::new(pos(0, 0), pos(1, 0)).with_primary(true),
            Selection::cursor(pos(1, 1)),
        ]);
        editor.line_comment().unwrap();
        assert_eq!(editor.text(), "//a\n//b");
        assert_eq!(
            editor.selections(),
            &[
                Selection::new(pos(0, 0), pos(1, 0)).with_primary(true),
                Selection::cursor(pos(1, 3)),
            ]
        );
    }
}
