use std::sync::Arc;

use crate::executor::AnalysisDone;
use crate::gateway::AnalysisMode;
use crate::result::AnalysisResult;
use crate::status::AnalysisStatus;

/// Version and mode of the last applied result.
///
/// Ordered by version, then mode: a full result supersedes a minimal one of
/// the same version but never a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AppliedStamp {
	pub version: u64,
	pub mode: AnalysisMode,
}

/// Per-document analysis bookkeeping owned by the interactive thread.
#[derive(Debug, Clone)]
pub struct AnalysisState {
	/// Content version, bumped on every edit and on a mode switch.
	pub version: u64,
	/// The text changed since the last authoritative result.
	pub needs_analysis: bool,
	/// Version of the snapshot currently being analyzed.
	pub in_flight_version: Option<u64>,
	/// Full analysis requested (otherwise minimal extraction only).
	pub enabled: bool,
	/// Document has a file on disk.
	pub has_path: bool,
	/// Replaced wholesale on apply; readers see the old or the new result.
	pub last_result: Option<Arc<AnalysisResult>>,
	pub applied: Option<AppliedStamp>,
	/// A result was stored while the document was not shown.
	pub views_stale: bool,
	pub status: AnalysisStatus,
}

impl AnalysisState {
	pub fn new(enabled: bool, has_path: bool) -> Self {
		Self {
			version: 0,
			needs_analysis: true,
			in_flight_version: None,
			enabled,
			has_path,
			last_result: None,
			applied: None,
			views_stale: false,
			status: AnalysisStatus::Idle,
		}
	}

	/// Records a text mutation and returns the new version.
	pub fn note_edit(&mut self) -> u64 {
		self.version += 1;
		self.needs_analysis = true;
		self.status = AnalysisStatus::UpdatePending;
		self.version
	}

	/// Switches between full analysis and minimal extraction.
	///
	/// Starts a new version so the next pass in the new mode is never
	/// ordered behind a result of the old mode. Returns false if unchanged.
	pub fn set_enabled(&mut self, enabled: bool) -> bool {
		if self.enabled == enabled {
			return false;
		}
		self.enabled = enabled;
		self.version += 1;
		self.needs_analysis = true;
		true
	}

	/// Records that a snapshot of the current version was handed off.
	pub fn mark_in_flight(&mut self, mode: AnalysisMode) {
		debug_assert!(
			self.applied.is_none_or(|a| a.version <= self.version),
			"in-flight snapshot older than applied result"
		);
		self.in_flight_version = Some(self.version);
		if mode == AnalysisMode::Full && self.enabled {
			self.status = AnalysisStatus::Working;
		}
	}

	/// Mode a pass for this document should run in right now.
	pub fn mode(&self) -> AnalysisMode {
		if self.enabled { AnalysisMode::Full } else { AnalysisMode::Minimal }
	}
}

/// What [`reconcile`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
	/// Stored as the document's last result.
	Applied {
		/// Dependent views should be refreshed now.
		notify_views: bool,
		/// Names-only update layered over the previous full result.
		provisional: bool,
	},
	/// Older than the result already applied; dropped.
	Stale,
	/// The document was closed; dropped.
	Closed,
	/// Tagged with a version this document never reached; dropped.
	Unrecognized,
}

/// Applies a completion to its document's state.
///
/// `state` is `None` when the document has been closed. Failures are turned
/// into a failed result here and never propagate further. A minimal pass
/// while full analysis is enabled is provisional: it refreshes the name
/// tables but keeps diagnostics, status and the dirty flag.
pub fn reconcile(state: Option<&mut AnalysisState>, done: AnalysisDone, shown: bool) -> ReconcileOutcome {
	let Some(state) = state else {
		tracing::trace!(doc_id = %done.doc_id, version = done.version, "analysis.reconcile.closed");
		return ReconcileOutcome::Closed;
	};

	if done.version > state.version {
		tracing::warn!(
			doc_id = %done.doc_id,
			version = done.version,
			current = state.version,
			"analysis.reconcile.unrecognized"
		);
		return ReconcileOutcome::Unrecognized;
	}

	if state.in_flight_version == Some(done.version) {
		state.in_flight_version = None;
	}

	let stamp = AppliedStamp {
		version: done.version,
		mode: done.mode,
	};
	if let Some(applied) = state.applied
		&& stamp < applied
	{
		tracing::debug!(
			doc_id = %done.doc_id,
			version = done.version,
			applied = applied.version,
			mode = done.mode.as_str(),
			"analysis.reconcile.stale"
		);
		return ReconcileOutcome::Stale;
	}

	let authoritative = done.mode == AnalysisMode::Full || !state.enabled;
	let prior = state.last_result.as_deref();
	let result = match done.outcome {
		Ok(result) => result,
		Err(failure) => {
			tracing::warn!(doc_id = %done.doc_id, version = done.version, error = %failure, "analysis.reconcile.failed");
			AnalysisResult::failed(prior, &failure)
		}
	};
	let provisional = !authoritative;
	let result = match prior {
		Some(base) if provisional => AnalysisResult::with_names_from(base, result),
		_ => result,
	};

	if authoritative {
		state.status = AnalysisStatus::for_result(&result, state.enabled, state.has_path);
		if done.version == state.version {
			state.needs_analysis = false;
		}
	}
	state.last_result = Some(Arc::new(result));
	state.applied = Some(stamp);
	state.views_stale = !shown;

	tracing::debug!(
		doc_id = %done.doc_id,
		version = done.version,
		mode = done.mode.as_str(),
		provisional,
		shown,
		"analysis.reconcile.applied"
	);
	ReconcileOutcome::Applied {
		notify_views: shown,
		provisional,
	}
}

#[cfg(test)]
mod tests;
