//! Core types shared across the editor: document identity and caret positions.

/// Identifier types for editor entities.
pub mod ids;
/// Caret position in line/column coordinates.
pub mod position;

pub use ids::DocumentId;
pub use position::Position;
pub use ropey::{Rope, RopeSlice};
