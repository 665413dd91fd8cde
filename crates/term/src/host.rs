//! Headless [`EditorHost`] that queues view refreshes for printing.

use scriptide_analysis::{AnalysisResult, AnalysisStatus};
use scriptide_editor::EditorHost;
use scriptide_primitives::DocumentId;

#[derive(Debug, Default)]
pub struct PrintHost {
	refreshed: Vec<DocumentId>,
}

impl PrintHost {
	/// Documents whose views were refreshed since the last call.
	pub fn take_refreshed(&mut self) -> Vec<DocumentId> {
		std::mem::take(&mut self.refreshed)
	}
}

impl EditorHost for PrintHost {
	fn on_analysis_applied(&mut self, doc: DocumentId, result: &AnalysisResult) {
		tracing::debug!(doc_id = %doc, procedures = result.procedures.len(), errors = result.error_count(), "term.views.refresh");
		if !self.refreshed.contains(&doc) {
			self.refreshed.push(doc);
		}
	}

	fn on_status_changed(&mut self, doc: DocumentId, status: AnalysisStatus) {
		tracing::info!(doc_id = %doc, %status, "term.status");
	}
}
