//! Background script analysis scheduling + reconciliation.
//!
//! Goals:
//! - debounce (never analyze during a burst of edits, never drop a needed pass)
//! - single-flight, process-wide (at most one analysis running at a time)
//! - latest snapshot wins (queued re-requests read the text at start time)
//! - monotonic apply (a slow old completion never clobbers a newer result)
//! - silent discard of results for closed documents
//!
//! Control flow:
//!
//! ```text
//! edit -> DebounceScheduler (re-arm) -> poll -> SingleFlightExecutor -> Analyzer
//!                                                       |
//!              views <- reconcile(AnalysisState) <- AnalysisDone (mpsc)
//! ```

pub mod builtin;
mod executor;
mod gateway;
mod policy;
mod reconcile;
mod result;
mod scheduler;
mod status;
pub mod views;

pub use builtin::{BlockAnalyzer, NameScanner, default_analyzer};
pub use executor::{AnalysisDone, AnalysisSnapshot, RequestOutcome, SingleFlightExecutor, TaskId};
pub use gateway::{AnalysisFailure, AnalysisMode, AnalysisRequest, Analyzer, ModeRouter, run_gateway, validate_result};
pub use policy::{DebouncePolicy, EditTrigger};
pub use reconcile::{AnalysisState, AppliedStamp, ReconcileOutcome, reconcile};
pub use result::{AnalysisResult, Diagnostic, DiagnosticKind, LineSpan, Macro, Procedure};
pub use scheduler::{DebounceScheduler, DueRequest, SchedulerPoll};
pub use status::AnalysisStatus;
pub use views::{FoldKind, FoldRange, OutlineItem, fold_ranges, outline};
