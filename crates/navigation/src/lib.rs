//! Per-document back/forward navigation through caret checkpoints.
//!
//! Every caret relocation that is not itself a history replay is offered to
//! [`NavigationHistory::record_position`]. Moves that stay within the
//! coalescing radius of the last recorded line overwrite the current
//! checkpoint in place; larger jumps append a new checkpoint and cut off the
//! forward (redo) horizon.
//!
//! Pointer layout:
//!
//! ```text
//! checkpoints: [ p0 ][ p1 ][ p2 ][ p3 ]
//!                      ^current  ^end
//! ```
//!
//! `0 <= current <= end < checkpoints.len()`, or no pointers when empty.
//! Entries past `end` are stale and get overwritten as new checkpoints are
//! recorded.

mod error;
mod history;

pub use error::HistoryError;
pub use history::{NavState, NavigationHistory, PositionChange, RecordOutcome, should_create_checkpoint};

#[cfg(test)]
mod tests;
