use scriptide_primitives::Position;

use crate::HistoryError;

/// How the next caret move is treated.
///
/// Set by callers around programmatic navigation so the side effects of a
/// jump do not pollute history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionChange {
	/// Coalesce into the current checkpoint or create a new one.
	#[default]
	Record,
	/// Skip the next move entirely (set after a programmatic jump).
	NoStore,
	/// Overwrite the current checkpoint with the next move.
	OverrideCurrent,
	/// Ignore every move until recording is re-enabled.
	Disabled,
}

/// What [`NavigationHistory::record_position`] did with a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
	/// A new checkpoint was stored at this index.
	Checkpoint(usize),
	/// The move stayed in the neighborhood and overwrote the current checkpoint.
	Coalesced,
	/// An explicit override replaced the current checkpoint.
	Overridden,
	/// The move was consumed without touching history.
	Skipped,
	/// Recording is disabled.
	Disabled,
}

/// Back/forward affordance enablement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
	pub back_enabled: bool,
	pub forward_enabled: bool,
}

impl NavState {
	/// Pure function of the pointer pair.
	pub fn from_pointers(current: Option<usize>, end: Option<usize>) -> Self {
		match (current, end) {
			(Some(current), Some(end)) => Self {
				back_enabled: current > 0,
				forward_enabled: current < end,
			},
			_ => Self::default(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pointers {
	current: usize,
	end: usize,
}

/// Decides whether a move to `new_line` starts a new checkpoint.
///
/// The first move always does. Afterwards only jumps of more than `radius`
/// lines from the last recorded line do.
pub fn should_create_checkpoint(last_line: Option<u32>, new_line: u32, radius: u32) -> bool {
	match last_line {
		None => true,
		Some(last) => last.abs_diff(new_line) > radius,
	}
}

/// Ordered checkpoint list with a current/end pointer pair.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
	checkpoints: Vec<Position>,
	pointers: Option<Pointers>,
	/// Line of the most recently committed (or replayed) position.
	last_line: Option<u32>,
	next_change: PositionChange,
	coalesce_lines: u32,
}

impl Default for NavigationHistory {
	fn default() -> Self {
		Self::new(1)
	}
}

impl NavigationHistory {
	pub fn new(coalesce_lines: u32) -> Self {
		Self {
			checkpoints: Vec::new(),
			pointers: None,
			last_line: None,
			next_change: PositionChange::Record,
			coalesce_lines,
		}
	}

	/// Offers a caret relocation to the history.
	pub fn record_position(&mut self, pos: Position) -> RecordOutcome {
		match self.next_change {
			PositionChange::Disabled => return RecordOutcome::Disabled,
			PositionChange::NoStore => {
				self.next_change = PositionChange::Record;
				return RecordOutcome::Skipped;
			}
			PositionChange::OverrideCurrent => {
				self.next_change = PositionChange::Record;
				return if self.overwrite_current(pos) {
					RecordOutcome::Overridden
				} else {
					RecordOutcome::Skipped
				};
			}
			PositionChange::Record => {}
		}

		let last = self.last_line.replace(pos.line);
		if should_create_checkpoint(last, pos.line, self.coalesce_lines) {
			RecordOutcome::Checkpoint(self.push_checkpoint(pos))
		} else if self.overwrite_current(pos) {
			RecordOutcome::Coalesced
		} else {
			RecordOutcome::Skipped
		}
	}

	/// Sets how the next recorded move is treated.
	pub fn mark_next(&mut self, change: PositionChange) {
		self.next_change = change;
	}

	/// Enables or disables recording of all subsequent moves.
	pub fn set_recording(&mut self, enabled: bool) {
		self.next_change = if enabled {
			PositionChange::Record
		} else {
			PositionChange::Disabled
		};
	}

	pub fn is_recording(&self) -> bool {
		self.next_change != PositionChange::Disabled
	}

	pub fn next_change(&self) -> PositionChange {
		self.next_change
	}

	/// Steps back one checkpoint, returning the position to jump to.
	///
	/// The caller applies the jump; the resulting caret move is not recorded.
	pub fn go_back(&mut self) -> Option<Position> {
		let p = self.checked_pointers()?;
		if p.current == 0 {
			return None;
		}
		let current = p.current - 1;
		self.pointers = Some(Pointers { current, end: p.end });
		Some(self.land(current))
	}

	/// Steps forward one checkpoint, returning the position to jump to.
	pub fn go_forward(&mut self) -> Option<Position> {
		let p = self.checked_pointers()?;
		if p.current >= p.end {
			return None;
		}
		let current = p.current + 1;
		self.pointers = Some(Pointers { current, end: p.end });
		Some(self.land(current))
	}

	pub fn state(&self) -> NavState {
		NavState::from_pointers(self.pointer_current(), self.pointer_end())
	}

	/// Checkpoint under the current pointer.
	pub fn current(&self) -> Option<Position> {
		self.pointers.and_then(|p| self.checkpoints.get(p.current).copied())
	}

	/// Reachable checkpoints (up to and including the redo horizon).
	pub fn checkpoints(&self) -> &[Position] {
		match self.pointers {
			Some(p) if !self.checkpoints.is_empty() => &self.checkpoints[..=p.end.min(self.checkpoints.len() - 1)],
			_ => &[],
		}
	}

	pub fn pointer_current(&self) -> Option<usize> {
		self.pointers.map(|p| p.current)
	}

	pub fn pointer_end(&self) -> Option<usize> {
		self.pointers.map(|p| p.end)
	}

	pub fn len(&self) -> usize {
		self.checkpoints().len()
	}

	pub fn is_empty(&self) -> bool {
		self.pointers.is_none()
	}

	pub fn clear(&mut self) {
		self.checkpoints.clear();
		self.pointers = None;
		self.last_line = None;
		self.next_change = PositionChange::Record;
	}

	/// Checks `0 <= current <= end < len`.
	pub fn validate(&self) -> Result<(), HistoryError> {
		match self.pointers {
			None => Ok(()),
			Some(p) if p.current <= p.end && p.end < self.checkpoints.len() => Ok(()),
			Some(p) => Err(HistoryError::BoundsViolation {
				current: p.current,
				end: p.end,
				len: self.checkpoints.len(),
			}),
		}
	}

	fn push_checkpoint(&mut self, pos: Position) -> usize {
		let next = self.checked_pointers().map_or(0, |p| p.current + 1);
		if next < self.checkpoints.len() {
			self.checkpoints[next] = pos;
		} else {
			self.checkpoints.push(pos);
		}
		self.pointers = Some(Pointers { current: next, end: next });
		next
	}

	fn overwrite_current(&mut self, pos: Position) -> bool {
		let Some(p) = self.checked_pointers() else {
			return false;
		};
		self.checkpoints[p.current] = pos;
		true
	}

	fn land(&mut self, index: usize) -> Position {
		let pos = self.checkpoints[index];
		self.last_line = Some(pos.line);
		if self.next_change != PositionChange::Disabled {
			self.next_change = PositionChange::NoStore;
		}
		pos
	}

	/// Returns in-range pointers, clamping (and reporting) if they drifted.
	fn checked_pointers(&mut self) -> Option<Pointers> {
		if let Err(e) = self.validate() {
			debug_assert!(false, "{e}");
			tracing::error!(error = %e, "navigation.history.bounds_violation");
			self.clamp();
		}
		self.pointers
	}

	fn clamp(&mut self) {
		let Some(p) = self.pointers else {
			return;
		};
		if self.checkpoints.is_empty() {
			self.pointers = None;
			return;
		}
		let end = p.end.min(self.checkpoints.len() - 1);
		self.pointers = Some(Pointers {
			current: p.current.min(end),
			end,
		});
	}

	#[cfg(test)]
	pub(crate) fn corrupt_for_test(&mut self, current: usize, end: usize) {
		self.pointers = Some(Pointers { current, end });
	}
}
