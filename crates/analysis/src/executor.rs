use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ropey::Rope;
use scriptide_primitives::DocumentId;
use tokio::sync::{Notify, Semaphore, mpsc};

use crate::gateway::{AnalysisFailure, AnalysisMode, AnalysisRequest, Analyzer, run_gateway};
use crate::result::AnalysisResult;

/// Identifier for a background analysis task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

/// Owned copy of everything one analysis pass reads.
///
/// The rope is a cheap clone of the live buffer; the interactive thread keeps
/// editing its own copy while the pass runs.
#[derive(Debug, Clone)]
pub struct AnalysisSnapshot {
	pub doc_id: DocumentId,
	pub version: u64,
	pub text: Rope,
	pub path: Option<PathBuf>,
	pub mode: AnalysisMode,
	pub prior: Option<Arc<AnalysisResult>>,
}

/// Output of a background pass, delivered over the completion channel.
#[derive(Debug)]
pub struct AnalysisDone {
	pub task: TaskId,
	pub doc_id: DocumentId,
	pub version: u64,
	pub mode: AnalysisMode,
	pub outcome: Result<AnalysisResult, AnalysisFailure>,
	pub elapsed: Duration,
}

/// What [`SingleFlightExecutor::request`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
	Started(TaskId),
	/// Another pass is running; the document was queued for a re-request.
	Queued,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
	task: TaskId,
	doc_id: DocumentId,
	version: u64,
	mode: AnalysisMode,
}

/// Process-wide single analysis slot.
///
/// The slot is a one-permit semaphore claimed with `try_acquire_owned` and
/// released by the background task itself, paired with a completion channel
/// drained on the interactive thread. Requests that arrive while the slot is
/// taken are recorded per document; the caller re-requests them with a fresh
/// snapshot once the slot frees (see [`Self::take_pending`]).
pub struct SingleFlightExecutor {
	analyzer: Arc<dyn Analyzer>,
	permits: Arc<Semaphore>,
	active: Option<InFlight>,
	pending: VecDeque<(DocumentId, AnalysisMode)>,
	next_task: u64,
	tx: mpsc::UnboundedSender<AnalysisDone>,
	rx: mpsc::UnboundedReceiver<AnalysisDone>,
	completed: Arc<Notify>,
}

impl SingleFlightExecutor {
	pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
		let (tx, rx) = mpsc::unbounded_channel();
		Self {
			analyzer,
			permits: Arc::new(Semaphore::new(1)),
			active: None,
			pending: VecDeque::new(),
			next_task: 0,
			tx,
			rx,
			completed: Arc::new(Notify::new()),
		}
	}

	/// Starts a pass if the slot is free, otherwise queues a re-request.
	pub fn request(&mut self, snapshot: AnalysisSnapshot) -> RequestOutcome {
		if self.active.is_some() {
			self.enqueue(snapshot.doc_id, snapshot.mode);
			return RequestOutcome::Queued;
		}
		let Ok(permit) = self.permits.clone().try_acquire_owned() else {
			self.enqueue(snapshot.doc_id, snapshot.mode);
			return RequestOutcome::Queued;
		};

		let task = TaskId(self.next_task);
		self.next_task = self.next_task.wrapping_add(1);
		self.active = Some(InFlight {
			task,
			doc_id: snapshot.doc_id,
			version: snapshot.version,
			mode: snapshot.mode,
		});
		self.remove_pending(snapshot.doc_id, snapshot.mode);

		tracing::debug!(
			doc_id = %snapshot.doc_id,
			version = snapshot.version,
			mode = snapshot.mode.as_str(),
			task = task.0,
			"analysis.executor.start"
		);

		let analyzer = Arc::clone(&self.analyzer);
		let tx = self.tx.clone();
		let completed = Arc::clone(&self.completed);
		scriptide_worker::spawn_blocking("analysis.pass", move || {
			let t0 = Instant::now();
			let request = AnalysisRequest {
				mode: snapshot.mode,
				path: snapshot.path,
			};
			let outcome = run_gateway(analyzer.as_ref(), snapshot.text.slice(..), snapshot.prior.as_deref(), &request);
			let elapsed = t0.elapsed();
			drop(permit);

			let _ = tx.send(AnalysisDone {
				task,
				doc_id: snapshot.doc_id,
				version: snapshot.version,
				mode: snapshot.mode,
				outcome,
				elapsed,
			});
			completed.notify_one();
		});

		RequestOutcome::Started(task)
	}

	/// Collects finished passes and frees the slot.
	///
	/// Completions for tasks this executor did not start are logged and
	/// dropped.
	pub fn drain_completions(&mut self) -> Vec<AnalysisDone> {
		let mut done = Vec::new();
		while let Ok(msg) = self.rx.try_recv() {
			match self.active {
				Some(active) if active.task == msg.task => {
					self.active = None;
					tracing::debug!(
						doc_id = %msg.doc_id,
						version = msg.version,
						mode = msg.mode.as_str(),
						elapsed_ms = msg.elapsed.as_millis() as u64,
						ok = msg.outcome.is_ok(),
						"analysis.executor.done"
					);
					done.push(msg);
				}
				_ => {
					tracing::warn!(task = msg.task.0, doc_id = %msg.doc_id, "analysis.executor.unrecognized_task");
				}
			}
		}
		done
	}

	/// Pops the next queued re-request, if the slot is free.
	///
	/// The caller builds a snapshot from the document's current text and
	/// passes it to [`Self::request`].
	pub fn take_pending(&mut self) -> Option<(DocumentId, AnalysisMode)> {
		if self.is_busy() {
			return None;
		}
		self.pending.pop_front()
	}

	/// Drops queued re-requests for a closed document.
	///
	/// An in-flight pass for it keeps running; its completion is discarded by
	/// the reconciler.
	pub fn forget(&mut self, doc_id: DocumentId) {
		self.pending.retain(|(d, _)| *d != doc_id);
	}

	pub fn is_busy(&self) -> bool {
		self.active.is_some()
	}

	pub fn is_pending(&self, doc_id: DocumentId) -> bool {
		self.pending.iter().any(|(d, _)| *d == doc_id)
	}

	pub fn pending_len(&self) -> usize {
		self.pending.len()
	}

	/// Document, version and mode of the running pass.
	pub fn in_flight(&self) -> Option<(DocumentId, u64, AnalysisMode)> {
		self.active.map(|a| (a.doc_id, a.version, a.mode))
	}

	/// Notified once per completion, for drivers that sleep between ticks.
	pub fn completion_signal(&self) -> Arc<Notify> {
		Arc::clone(&self.completed)
	}

	/// Queues `doc_id`, upgrading an existing entry to the higher mode.
	fn enqueue(&mut self, doc_id: DocumentId, mode: AnalysisMode) {
		if let Some(entry) = self.pending.iter_mut().find(|(d, _)| *d == doc_id) {
			entry.1 = entry.1.max(mode);
		} else {
			self.pending.push_back((doc_id, mode));
		}
		tracing::trace!(doc_id = %doc_id, mode = mode.as_str(), pending = self.pending.len(), "analysis.executor.queued");
	}

	/// A started pass satisfies queued requests of equal or lower mode.
	fn remove_pending(&mut self, doc_id: DocumentId, mode: AnalysisMode) {
		self.pending.retain(|(d, m)| !(*d == doc_id && *m <= mode));
	}
}
