use crate::model::position::Position;

/// Errors raised while applying edits to a document.
///
/// A batch that fails validation is rejected as a whole before the document
/// is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("overlapping edits: edit ending at {first} runs into edit starting at {second}")]
    OverlappingEdits { first: Position, second: Position },

    #[error("position {0} is outside the document")]
    InvalidPosition(Position),

    #[error("edit range {start}..{end} ends before it starts")]
    InvalidRange { start: Position, end: Position },
}

/// Errors raised while validating language comment configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("language '{language}' has an empty line comment prefix")]
    EmptyLineCommentPrefix { language: String },

    #[error("language '{language}' has an empty block comment delimiter")]
    EmptyBlockCommentDelimiter { language: String },
}

/// Errors raised by the comment toggle commands
#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("invalid comment delimiter pattern: {0}")]
    Pattern(#[from] regex::Error),
}
