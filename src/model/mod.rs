//! Core data model: positions, selections, edits and the text document they
//! apply to.

pub mod document;
pub mod edit;
pub mod position;
pub mod selection;
