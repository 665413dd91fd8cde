use scriptide_analysis::{AnalysisResult, AnalysisStatus};
use scriptide_navigation::NavState;
use scriptide_primitives::{DocumentId, Position};

/// A caret jump the editing surface must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jump {
	pub position: Position,
	/// Whether the resulting caret move may be recorded in history. Jumps
	/// replayed from history never are.
	pub recordable: bool,
}

/// Callbacks into the editing surface and dependent views.
///
/// All methods default to no-ops. Implementations must not hold on to the
/// result reference past the call.
pub trait EditorHost {
	/// A result was applied for the shown document (or one became visible).
	fn on_analysis_applied(&mut self, _doc: DocumentId, _result: &AnalysisResult) {}

	/// Status text of the shown document changed.
	fn on_status_changed(&mut self, _doc: DocumentId, _status: AnalysisStatus) {}

	/// Move the caret. Called at most once per back/forward command.
	fn apply_jump(&mut self, _doc: DocumentId, _jump: Jump) {}

	/// Back/forward affordances changed.
	fn on_navigation_state(&mut self, _doc: DocumentId, _state: NavState) {}
}

impl EditorHost for () {}
