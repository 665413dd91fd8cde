use std::path::{Path, PathBuf};

use scriptide_analysis::{AnalysisMode, AnalysisSnapshot, AnalysisState};
use scriptide_navigation::NavigationHistory;
use scriptide_primitives::{DocumentId, Rope};

/// One open document and its derived analysis and navigation state.
#[derive(Debug)]
pub struct DocumentSession {
	pub(crate) id: DocumentId,
	pub(crate) path: Option<PathBuf>,
	pub(crate) text: Rope,
	pub(crate) analysis: AnalysisState,
	pub(crate) history: NavigationHistory,
	pub(crate) modified: bool,
}

impl DocumentSession {
	pub(crate) fn new(id: DocumentId, path: Option<PathBuf>, text: Rope, analysis_enabled: bool, coalesce_lines: u32) -> Self {
		let has_path = path.is_some();
		Self {
			id,
			path,
			text,
			analysis: AnalysisState::new(analysis_enabled, has_path),
			history: NavigationHistory::new(coalesce_lines),
			modified: false,
		}
	}

	pub fn id(&self) -> DocumentId {
		self.id
	}

	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	pub fn text(&self) -> &Rope {
		&self.text
	}

	pub fn analysis(&self) -> &AnalysisState {
		&self.analysis
	}

	pub fn history(&self) -> &NavigationHistory {
		&self.history
	}

	pub fn is_modified(&self) -> bool {
		self.modified
	}

	/// Copies out everything a background pass needs.
	pub(crate) fn snapshot(&self, mode: AnalysisMode) -> AnalysisSnapshot {
		AnalysisSnapshot {
			doc_id: self.id,
			version: self.analysis.version,
			text: self.text.clone(),
			path: self.path.clone(),
			mode,
			prior: self.analysis.last_result.clone(),
		}
	}
}
