use scriptide_navigation::{PositionChange, RecordOutcome};
use scriptide_primitives::{DocumentId, Position};

use super::Editor;
use crate::error::Result;
use crate::host::{EditorHost, Jump};

impl<H: EditorHost> Editor<H> {
	/// Feeds a caret relocation into the document's history.
	pub fn caret_moved(&mut self, id: DocumentId, position: Position) -> Result<RecordOutcome> {
		let session = self.session_mut(id)?;
		let before = session.history.state();
		let outcome = session.history.record_position(position);
		let after = session.history.state();
		if after != before {
			self.host.on_navigation_state(id, after);
		}
		Ok(outcome)
	}

	/// Steps back one checkpoint and asks the host to jump there.
	pub fn go_back(&mut self, id: DocumentId) -> Result<Option<Position>> {
		let session = self.session_mut(id)?;
		let target = session.history.go_back();
		self.replay(id, target);
		Ok(target)
	}

	/// Steps forward one checkpoint and asks the host to jump there.
	pub fn go_forward(&mut self, id: DocumentId) -> Result<Option<Position>> {
		let session = self.session_mut(id)?;
		let target = session.history.go_forward();
		self.replay(id, target);
		Ok(target)
	}

	/// Marks how the next caret move is treated (around programmatic jumps).
	pub fn mark_next_position(&mut self, id: DocumentId, change: PositionChange) -> Result<()> {
		self.session_mut(id)?.history.mark_next(change);
		Ok(())
	}

	/// Stops or resumes recording caret moves.
	pub fn set_history_recording(&mut self, id: DocumentId, enabled: bool) -> Result<()> {
		self.session_mut(id)?.history.set_recording(enabled);
		Ok(())
	}

	fn replay(&mut self, id: DocumentId, target: Option<Position>) {
		let Some(position) = target else {
			return;
		};
		tracing::trace!(doc_id = %id, line = position.line, column = position.column, "editor.navigation.jump");
		self.host.apply_jump(id, Jump {
			position,
			recordable: false,
		});
		if let Some(session) = self.sessions.get(&id) {
			self.host.on_navigation_state(id, session.history.state());
		}
	}
}
