use std::time::Duration;

use pretty_assertions::assert_eq;
use scriptide_primitives::DocumentId;

use super::*;
use crate::executor::TaskId;
use crate::gateway::AnalysisFailure;
use crate::result::{Diagnostic, DiagnosticKind, Procedure};

fn named(names: &[&str]) -> AnalysisResult {
	AnalysisResult {
		procedures: names
			.iter()
			.enumerate()
			.map(|(i, name)| Procedure {
				name: name.to_string(),
				declaration_line: i as u32 + 1,
				body: None,
				source_file: None,
			})
			.collect(),
		parsed: true,
		..Default::default()
	}
}

fn with_error(mut result: AnalysisResult) -> AnalysisResult {
	result.errors.push(Diagnostic {
		kind: DiagnosticKind::Error,
		file: None,
		line: 3,
		column: 1,
		length: 3,
		message: "unmatched end".into(),
	});
	result.has_error = true;
	result
}

fn done(version: u64, mode: AnalysisMode, outcome: Result<AnalysisResult, AnalysisFailure>) -> AnalysisDone {
	AnalysisDone {
		task: TaskId(version),
		doc_id: DocumentId(1),
		version,
		mode,
		outcome,
		elapsed: Duration::from_millis(3),
	}
}

fn state_at(version: u64) -> AnalysisState {
	let mut state = AnalysisState::new(true, true);
	for _ in 0..version {
		state.note_edit();
	}
	state
}

fn applied(notify_views: bool) -> ReconcileOutcome {
	ReconcileOutcome::Applied {
		notify_views,
		provisional: false,
	}
}

fn names(state: &AnalysisState) -> Vec<String> {
	state.last_result.as_ref().map(|r| r.procedures.iter().map(|p| p.name.clone()).collect()).unwrap_or_default()
}

#[test]
fn newer_result_wins_over_late_older_one() {
	let mut state = state_at(7);

	let r2 = reconcile(Some(&mut state), done(7, AnalysisMode::Full, Ok(named(&["seven"]))), true);
	assert_eq!(r2, applied(true));

	let r1 = reconcile(Some(&mut state), done(5, AnalysisMode::Full, Ok(named(&["five"]))), true);
	assert_eq!(r1, ReconcileOutcome::Stale);

	assert_eq!(names(&state), vec!["seven"]);
	assert_eq!(state.applied, Some(AppliedStamp {
		version: 7,
		mode: AnalysisMode::Full
	}));
	assert!(!state.needs_analysis);
}

#[test]
fn closed_document_discards_silently() {
	let outcome = reconcile(None, done(1, AnalysisMode::Full, Ok(named(&["gone"]))), true);
	assert_eq!(outcome, ReconcileOutcome::Closed);
}

#[test]
fn future_version_is_unrecognized() {
	let mut state = state_at(2);
	let before = state.clone();
	let outcome = reconcile(Some(&mut state), done(9, AnalysisMode::Full, Ok(named(&["x"]))), true);
	assert_eq!(outcome, ReconcileOutcome::Unrecognized);
	assert_eq!(state.last_result, before.last_result);
	assert_eq!(state.status, before.status);
}

#[test]
fn failure_becomes_failed_result_and_keeps_names() {
	let mut state = state_at(1);
	reconcile(Some(&mut state), done(1, AnalysisMode::Full, Ok(named(&["main"]))), true);
	state.note_edit();

	let outcome = reconcile(Some(&mut state), done(2, AnalysisMode::Full, Err(AnalysisFailure::Panicked("boom".into()))), true);
	assert_eq!(outcome, applied(true));

	let result = state.last_result.as_deref().unwrap();
	assert!(!result.parsed);
	assert!(result.has_error);
	assert_eq!(names(&state), vec!["main"]);
	assert_eq!(state.status, AnalysisStatus::Failed);
	assert_eq!(result.errors[0].message, "analyzer panicked: boom");
}

#[test]
fn hidden_document_stores_result_for_later() {
	let mut state = state_at(1);
	let outcome = reconcile(Some(&mut state), done(1, AnalysisMode::Full, Ok(named(&["a"]))), false);
	assert_eq!(outcome, applied(false));
	assert!(state.views_stale);
	assert_eq!(names(&state), vec!["a"]);
}

#[test]
fn older_version_applies_but_keeps_dirty_flag() {
	let mut state = state_at(3);
	reconcile(Some(&mut state), done(2, AnalysisMode::Full, Ok(named(&["a"]))), true);
	assert!(state.needs_analysis, "text moved past the analyzed version");
	assert_eq!(state.status, AnalysisStatus::Complete);
}

#[test]
fn status_reflects_errors() {
	let mut state = state_at(1);
	reconcile(Some(&mut state), done(1, AnalysisMode::Full, Ok(with_error(named(&["a"])))), true);
	assert_eq!(state.status, AnalysisStatus::CompleteWithErrors);
}

#[test]
fn minimal_pass_while_enabled_is_provisional() {
	let mut state = state_at(1);
	reconcile(Some(&mut state), done(1, AnalysisMode::Full, Ok(with_error(named(&["old"])))), true);
	state.note_edit();

	let outcome = reconcile(Some(&mut state), done(2, AnalysisMode::Minimal, Ok(named(&["old", "new"]))), true);
	assert_eq!(outcome, ReconcileOutcome::Applied {
		notify_views: true,
		provisional: true,
	});
	assert_eq!(names(&state), vec!["old", "new"]);
	let result = state.last_result.as_deref().unwrap();
	assert!(result.has_error, "diagnostics come from the last full pass");
	assert_eq!(result.errors.len(), 1);
	assert!(state.needs_analysis);
	assert_eq!(state.status, AnalysisStatus::UpdatePending);
}

#[test]
fn full_supersedes_minimal_of_same_version_but_not_reverse() {
	let mut state = state_at(4);
	reconcile(Some(&mut state), done(4, AnalysisMode::Full, Ok(named(&["full"]))), true);
	let late_minimal = reconcile(Some(&mut state), done(4, AnalysisMode::Minimal, Ok(named(&["min"]))), true);
	assert_eq!(late_minimal, ReconcileOutcome::Stale);
	assert_eq!(names(&state), vec!["full"]);
}

#[test]
fn disabling_after_full_result_applies_next_minimal_pass() {
	let mut state = state_at(2);
	reconcile(Some(&mut state), done(2, AnalysisMode::Full, Ok(with_error(named(&["a"])))), true);
	assert_eq!(state.status, AnalysisStatus::CompleteWithErrors);

	assert!(state.set_enabled(false));
	assert!(!state.set_enabled(false));
	assert_eq!(state.version, 3);
	assert!(state.needs_analysis);

	let outcome = reconcile(Some(&mut state), done(3, AnalysisMode::Minimal, Ok(named(&["a"]))), true);
	assert_eq!(outcome, applied(true));
	assert_eq!(state.status, AnalysisStatus::MinimalOnly);
	assert!(!state.needs_analysis);
	assert!(state.last_result.as_ref().unwrap().errors.is_empty());
}

#[test]
fn reenabling_runs_full_over_minimal_result() {
	let mut state = AnalysisState::new(false, true);
	reconcile(Some(&mut state), done(0, AnalysisMode::Minimal, Ok(named(&["a"]))), true);
	assert_eq!(state.status, AnalysisStatus::MinimalOnly);

	state.set_enabled(true);
	let outcome = reconcile(Some(&mut state), done(1, AnalysisMode::Full, Ok(with_error(named(&["a"])))), true);
	assert_eq!(outcome, applied(true));
	assert_eq!(state.status, AnalysisStatus::CompleteWithErrors);
	assert!(!state.needs_analysis);
}

#[test]
fn minimal_pass_is_authoritative_when_disabled() {
	let mut state = AnalysisState::new(false, true);
	state.note_edit();
	let outcome = reconcile(Some(&mut state), done(1, AnalysisMode::Minimal, Ok(named(&["m"]))), true);
	assert_eq!(outcome, applied(true));
	assert!(!state.needs_analysis);
	assert_eq!(state.status, AnalysisStatus::MinimalOnly);
}

#[test]
fn in_flight_version_cleared_on_completion() {
	let mut state = state_at(1);
	state.mark_in_flight(AnalysisMode::Full);
	assert_eq!(state.status, AnalysisStatus::Working);
	assert_eq!(state.in_flight_version, Some(1));
	reconcile(Some(&mut state), done(1, AnalysisMode::Full, Ok(named(&[]))), true);
	assert_eq!(state.in_flight_version, None);
}
