mod analysis;
mod navigation;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashMap;
use scriptide_analysis::{AnalysisResult, AnalysisStatus, Analyzer, DebouncePolicy, DebounceScheduler, FoldRange, OutlineItem, SingleFlightExecutor};
use scriptide_config::Config;
use scriptide_primitives::{DocumentId, Rope};
use tokio::sync::Notify;

use crate::error::{EditorError, Result};
use crate::host::EditorHost;
use crate::session::DocumentSession;

pub use analysis::TickReport;

/// Owner of all document sessions and the analysis pipeline.
pub struct Editor<H: EditorHost> {
	config: Config,
	sessions: FxHashMap<DocumentId, DocumentSession>,
	active: Option<DocumentId>,
	scheduler: DebounceScheduler,
	executor: SingleFlightExecutor,
	host: H,
}

impl<H: EditorHost> std::fmt::Debug for Editor<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Editor")
			.field("sessions", &self.sessions.len())
			.field("active", &self.active)
			.field("busy", &self.executor.is_busy())
			.field("pending", &self.executor.pending_len())
			.finish()
	}
}

impl<H: EditorHost> Editor<H> {
	pub fn new(config: Config, analyzer: Arc<dyn Analyzer>, host: H) -> Self {
		let policy = DebouncePolicy::from_config(&config.analysis);
		Self {
			config,
			sessions: FxHashMap::default(),
			active: None,
			scheduler: DebounceScheduler::new(policy),
			executor: SingleFlightExecutor::new(analyzer),
			host,
		}
	}

	/// Opens a document and requests its first analysis immediately.
	///
	/// The first opened document becomes active.
	pub fn open_document(&mut self, path: Option<PathBuf>, text: Rope) -> DocumentId {
		let id = DocumentId::next();
		let session = DocumentSession::new(id, path, text, self.config.analysis.enabled, self.config.navigation.coalesce_lines);
		tracing::debug!(doc_id = %id, path = ?session.path, "editor.document.open");
		self.sessions.insert(id, session);
		if self.active.is_none() {
			self.active = Some(id);
		}
		self.request_now(id);
		id
	}

	/// Closes a document. An in-flight analysis for it is discarded when it
	/// completes.
	pub fn close_document(&mut self, id: DocumentId) -> Result<()> {
		self.sessions.remove(&id).ok_or(EditorError::UnknownDocument(id))?;
		self.scheduler.cancel(id);
		self.executor.forget(id);
		if self.active == Some(id) {
			self.active = None;
		}
		tracing::debug!(doc_id = %id, "editor.document.close");
		Ok(())
	}

	/// Shows a document, pushing a result stored while it was hidden.
	pub fn set_active(&mut self, id: DocumentId) -> Result<()> {
		let session = self.sessions.get_mut(&id).ok_or(EditorError::UnknownDocument(id))?;
		self.active = Some(id);
		if session.analysis.views_stale {
			session.analysis.views_stale = false;
			if let Some(result) = &session.analysis.last_result {
				self.host.on_analysis_applied(id, result);
			}
		}
		self.host.on_status_changed(id, session.analysis.status);
		self.host.on_navigation_state(id, session.history.state());
		Ok(())
	}

	pub fn active(&self) -> Option<DocumentId> {
		self.active
	}

	pub fn is_shown(&self, id: DocumentId) -> bool {
		self.active == Some(id)
	}

	pub fn session(&self, id: DocumentId) -> Option<&DocumentSession> {
		self.sessions.get(&id)
	}

	pub fn documents(&self) -> impl Iterator<Item = DocumentId> + '_ {
		self.sessions.keys().copied()
	}

	pub fn result(&self, id: DocumentId) -> Option<Arc<AnalysisResult>> {
		self.sessions.get(&id).and_then(|s| s.analysis.last_result.clone())
	}

	pub fn status(&self, id: DocumentId) -> Option<AnalysisStatus> {
		self.sessions.get(&id).map(|s| s.analysis.status)
	}

	/// Fold ranges of the last applied result.
	pub fn folds(&self, id: DocumentId) -> Vec<FoldRange> {
		let Some(session) = self.sessions.get(&id) else {
			return Vec::new();
		};
		session
			.analysis
			.last_result
			.as_deref()
			.map(|r| scriptide_analysis::fold_ranges(r, session.path()))
			.unwrap_or_default()
	}

	pub fn outline(&self, id: DocumentId) -> Vec<OutlineItem> {
		self.result(id).map(|r| scriptide_analysis::outline(&r)).unwrap_or_default()
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	/// Earliest armed deadline, for drivers that sleep between ticks.
	pub fn next_wakeup(&self) -> Option<Instant> {
		self.scheduler.next_deadline()
	}

	/// Notified whenever a background pass finishes.
	pub fn completion_signal(&self) -> Arc<Notify> {
		self.executor.completion_signal()
	}

	/// A pass is running or queued.
	pub fn is_analyzing(&self) -> bool {
		self.executor.is_busy() || self.executor.pending_len() > 0
	}

	/// Nothing running, queued or armed.
	pub fn is_idle(&self) -> bool {
		!self.is_analyzing() && self.scheduler.next_deadline().is_none()
	}

	fn session_mut(&mut self, id: DocumentId) -> Result<&mut DocumentSession> {
		self.sessions.get_mut(&id).ok_or(EditorError::UnknownDocument(id))
	}

	/// Pushes the session's status to the host if it is shown.
	fn publish_status(&mut self, id: DocumentId) {
		if !self.is_shown(id) {
			return;
		}
		if let Some(session) = self.sessions.get(&id) {
			self.host.on_status_changed(id, session.analysis.status);
		}
	}
}
