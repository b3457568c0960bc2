use crate::model::position::Position;
use crate::model::selection::{Selection, TrackedSelection};
use serde::{Deserialize, Serialize};

/// A single replacement of `[start, end)` with `text`, or a pure insertion
/// at `start` when `end` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDescriptor {
    pub text: String,
    pub start: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
}

impl EditDescriptor {
    pub fn insert(start: Position, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start,
            end: None,
        }
    }

    pub fn delete(start: Position, end: Position) -> Self {
        Self {
            text: String::new(),
            start,
            end: Some(end),
        }
    }

    pub fn replace(start: Position, end: Position, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start,
            end: Some(end),
        }
    }

    /// End of the replaced range (equal to `start` for insertions)
    pub fn end(&self) -> Position {
        self.end.unwrap_or(self.start)
    }
}

/// One entry of an edit batch: the edits requested on behalf of one logical
/// selection, plus the selections to carry through the batch.
///
/// A group with no edits only tracks its selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditGroup {
    pub edits: Vec<EditDescriptor>,
    pub selections: Vec<TrackedSelection>,
}

impl EditGroup {
    pub fn new(edits: Vec<EditDescriptor>, selections: Vec<TrackedSelection>) -> Self {
        Self { edits, selections }
    }

    /// A group that performs no edit but keeps its selections tracked
    pub fn track_only(selections: impl IntoIterator<Item = Selection>) -> Self {
        Self {
            edits: Vec::new(),
            selections: selections.into_iter().map(TrackedSelection::explicit).collect(),
        }
    }

    /// Edits only; selections affected by them are remapped as usual
    pub fn edits_only(edits: Vec<EditDescriptor>) -> Self {
        Self {
            edits,
            selections: Vec::new(),
        }
    }

    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }
}

/// A set of edit groups applied as one atomic operation.
pub type EditBatch = Vec<EditGroup>;
