use std::time::Instant;

use scriptide_analysis::{AnalysisMode, AnalysisStatus, EditTrigger, ReconcileOutcome, RequestOutcome, reconcile};
use scriptide_primitives::{DocumentId, Rope};

use super::Editor;
use crate::error::Result;
use crate::host::EditorHost;

/// What one [`Editor::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
	pub applied: usize,
	pub stale: usize,
	/// Completions for documents closed meanwhile.
	pub closed: usize,
	pub unrecognized: usize,
	/// Passes started this tick (queued re-request or due deadline).
	pub started: usize,
	/// Due deadlines left armed because the slot was taken.
	pub deferred: usize,
}

impl<H: EditorHost> Editor<H> {
	/// Applies a text mutation and re-arms the debounce deadlines.
	///
	/// Returns the new content version.
	pub fn edit(&mut self, id: DocumentId, f: impl FnOnce(&mut Rope)) -> Result<u64> {
		self.edit_at(Instant::now(), id, f)
	}

	pub fn edit_at(&mut self, now: Instant, id: DocumentId, f: impl FnOnce(&mut Rope)) -> Result<u64> {
		let session = self.session_mut(id)?;
		f(&mut session.text);
		session.modified = true;
		let was_pending = session.analysis.status == AnalysisStatus::UpdatePending;
		let version = session.analysis.note_edit();
		let enabled = session.analysis.enabled;
		self.scheduler.note_edit(id, now, EditTrigger::Typing, enabled);
		if !was_pending {
			self.publish_status(id);
		}
		Ok(version)
	}

	/// Records a save; the next pass runs after the shorter save delay.
	pub fn note_saved(&mut self, id: DocumentId) -> Result<()> {
		self.note_saved_at(Instant::now(), id)
	}

	pub fn note_saved_at(&mut self, now: Instant, id: DocumentId) -> Result<()> {
		let session = self.session_mut(id)?;
		session.modified = false;
		session.analysis.needs_analysis = true;
		let enabled = session.analysis.enabled;
		self.scheduler.note_edit(id, now, EditTrigger::Save, enabled);
		Ok(())
	}

	/// Records a structural command (rename, insert procedure) that already
	/// went through [`Self::edit`]; shortens the pending delay.
	pub fn note_structural_change(&mut self, id: DocumentId) -> Result<()> {
		self.note_structural_change_at(Instant::now(), id)
	}

	pub fn note_structural_change_at(&mut self, now: Instant, id: DocumentId) -> Result<()> {
		let session = self.session_mut(id)?;
		session.analysis.needs_analysis = true;
		let enabled = session.analysis.enabled;
		self.scheduler.note_edit(id, now, EditTrigger::Structural, enabled);
		Ok(())
	}

	/// Requests a pass now, bypassing debounce.
	pub fn force_analyze(&mut self, id: DocumentId) -> Result<()> {
		self.session_mut(id)?.analysis.needs_analysis = true;
		self.scheduler.cancel(id);
		self.request_now(id);
		Ok(())
	}

	/// Switches between full analysis and minimal extraction, then re-analyzes.
	pub fn set_analysis_enabled(&mut self, id: DocumentId, enabled: bool) -> Result<()> {
		let session = self.session_mut(id)?;
		if !session.analysis.set_enabled(enabled) {
			return Ok(());
		}
		tracing::debug!(doc_id = %id, enabled, "editor.analysis.toggle");
		self.force_analyze(id)
	}

	/// Drives the loop once: drains completions, starts one queued
	/// re-request with the document's current text, then fires a due
	/// deadline.
	pub fn tick(&mut self, now: Instant) -> TickReport {
		let mut report = TickReport::default();

		for done in self.executor.drain_completions() {
			let doc_id = done.doc_id;
			let shown = self.is_shown(doc_id);
			let state = self.sessions.get_mut(&doc_id).map(|s| &mut s.analysis);
			match reconcile(state, done, shown) {
				ReconcileOutcome::Applied { notify_views, .. } => {
					report.applied += 1;
					if notify_views && let Some(result) = self.result(doc_id) {
						self.host.on_analysis_applied(doc_id, &result);
					}
					self.publish_status(doc_id);
				}
				ReconcileOutcome::Stale => report.stale += 1,
				ReconcileOutcome::Closed => report.closed += 1,
				ReconcileOutcome::Unrecognized => report.unrecognized += 1,
			}
		}

		while let Some((doc_id, mode)) = self.executor.take_pending() {
			let Some(session) = self.sessions.get(&doc_id) else {
				continue;
			};
			let mode = if session.analysis.enabled { mode } else { AnalysisMode::Minimal };
			if self.start(doc_id, mode) {
				report.started += 1;
			}
			break;
		}

		let busy = self.executor.is_busy();
		let poll = self.scheduler.poll(now, busy, |id| self.sessions.get(&id).map(|s| s.analysis.enabled));
		report.deferred = poll.deferred;
		if let Some(due) = poll.fired {
			let needed = self.sessions.get(&due.doc_id).is_some_and(|s| s.analysis.needs_analysis);
			if needed && self.start(due.doc_id, due.mode) {
				report.started += 1;
			} else if !needed {
				tracing::trace!(doc_id = %due.doc_id, "editor.analysis.up_to_date");
			}
		}

		report
	}

	/// Requests a pass in the document's current mode.
	pub(super) fn request_now(&mut self, id: DocumentId) {
		let Some(session) = self.sessions.get(&id) else {
			return;
		};
		let mode = session.analysis.mode();
		self.start(id, mode);
	}

	/// Hands a snapshot of the current text to the executor. Returns true if
	/// the pass started (false if it was queued).
	fn start(&mut self, id: DocumentId, mode: AnalysisMode) -> bool {
		let Some(session) = self.sessions.get_mut(&id) else {
			return false;
		};
		match self.executor.request(session.snapshot(mode)) {
			RequestOutcome::Started(_) => {
				let before = session.analysis.status;
				session.analysis.mark_in_flight(mode);
				if session.analysis.status != before {
					self.publish_status(id);
				}
				true
			}
			RequestOutcome::Queued => false,
		}
	}
}
