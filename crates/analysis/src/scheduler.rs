use std::time::Instant;

use rustc_hash::FxHashMap;
use scriptide_primitives::DocumentId;

use crate::gateway::AnalysisMode;
use crate::policy::{DebouncePolicy, EditTrigger};

/// Armed deadlines for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DocDeadlines {
	local: Option<Instant>,
	full: Option<Instant>,
}

impl DocDeadlines {
	fn is_idle(&self) -> bool {
		self.local.is_none() && self.full.is_none()
	}

	fn earliest(&self) -> Option<Instant> {
		match (self.local, self.full) {
			(Some(a), Some(b)) => Some(a.min(b)),
			(a, b) => a.or(b),
		}
	}

	/// The deadline that is due at `now` and the mode it fires, if any.
	fn due(&self, now: Instant, enabled: bool) -> Option<(Instant, AnalysisMode)> {
		if enabled {
			if let Some(full) = self.full.filter(|d| *d <= now) {
				return Some((full, AnalysisMode::Full));
			}
			self.local.filter(|d| *d <= now).map(|d| (d, AnalysisMode::Minimal))
		} else {
			self.earliest().filter(|d| *d <= now).map(|d| (d, AnalysisMode::Minimal))
		}
	}
}

/// A deadline that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueRequest {
	pub doc_id: DocumentId,
	pub mode: AnalysisMode,
}

/// Result of one [`DebounceScheduler::poll`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerPoll {
	/// Request to hand to the executor.
	pub fired: Option<DueRequest>,
	/// Overdue documents left armed because the executor was busy, or because
	/// another document fired first.
	pub deferred: usize,
}

/// Per-document local/full deadlines.
///
/// Edits re-arm both deadlines, so nothing fires during a burst. Polling is
/// synchronous and takes `now` explicitly.
#[derive(Debug, Default)]
pub struct DebounceScheduler {
	policy: DebouncePolicy,
	docs: FxHashMap<DocumentId, DocDeadlines>,
}

impl DebounceScheduler {
	pub fn new(policy: DebouncePolicy) -> Self {
		Self {
			policy,
			docs: FxHashMap::default(),
		}
	}

	/// Re-arms both deadlines for `doc` relative to `now`.
	pub fn note_edit(&mut self, doc: DocumentId, now: Instant, trigger: EditTrigger, analysis_enabled: bool) {
		let delays = self.policy.arm(trigger, analysis_enabled);
		let entry = self.docs.entry(doc).or_default();
		entry.local = Some(now + delays.local);
		entry.full = delays.full.map(|d| now + d);
		tracing::trace!(
			doc_id = %doc,
			trigger = trigger.as_str(),
			local_ms = delays.local.as_millis() as u64,
			full_ms = delays.full.map(|d| d.as_millis() as u64),
			"analysis.scheduler.arm"
		);
	}

	/// Disarms every deadline for `doc` (forced request or close).
	pub fn cancel(&mut self, doc: DocumentId) {
		self.docs.remove(&doc);
	}

	pub fn is_armed(&self, doc: DocumentId) -> bool {
		self.docs.get(&doc).is_some_and(|d| !d.is_idle())
	}

	/// Earliest armed deadline across all documents.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.docs.values().filter_map(DocDeadlines::earliest).min()
	}

	/// Checks deadlines against `now`.
	///
	/// Fires at most one request: the document whose due deadline is
	/// earliest. When `busy`, nothing fires and deadlines stay armed so they
	/// are picked up on a later poll. `enabled_of` reports whether full
	/// analysis is enabled for a document, or `None` if it is gone; gone
	/// documents are disarmed.
	pub fn poll(&mut self, now: Instant, busy: bool, enabled_of: impl Fn(DocumentId) -> Option<bool>) -> SchedulerPoll {
		let mut due: Vec<(Instant, DocumentId, AnalysisMode)> = Vec::new();
		self.docs.retain(|&doc, deadlines| match enabled_of(doc) {
			None => false,
			Some(enabled) => {
				if let Some((at, mode)) = deadlines.due(now, enabled) {
					due.push((at, doc, mode));
				}
				!deadlines.is_idle()
			}
		});

		if due.is_empty() {
			return SchedulerPoll::default();
		}
		if busy {
			tracing::trace!(deferred = due.len(), "analysis.scheduler.busy");
			return SchedulerPoll {
				fired: None,
				deferred: due.len(),
			};
		}

		due.sort_by_key(|&(at, doc, _)| (at, doc));
		let (_, doc_id, mode) = due[0];
		if let Some(deadlines) = self.docs.get_mut(&doc_id) {
			match mode {
				AnalysisMode::Full => *deadlines = DocDeadlines::default(),
				AnalysisMode::Minimal if enabled_of(doc_id) == Some(true) => deadlines.local = None,
				AnalysisMode::Minimal => *deadlines = DocDeadlines::default(),
			}
			if deadlines.is_idle() {
				self.docs.remove(&doc_id);
			}
		}
		tracing::debug!(doc_id = %doc_id, mode = mode.as_str(), "analysis.scheduler.fire");
		SchedulerPoll {
			fired: Some(DueRequest { doc_id, mode }),
			deferred: due.len() - 1,
		}
	}
}
