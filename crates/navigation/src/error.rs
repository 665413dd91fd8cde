use thiserror::Error;

/// Inconsistent history state.
///
/// Always a programming defect. Debug builds assert; release builds clamp
/// the pointers back into range and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	#[error("history pointers out of bounds: current={current}, end={end}, len={len}")]
	BoundsViolation { current: usize, end: usize, len: usize },
}
