//! Analyzer Gateway: the opaque analysis capability and its call boundary.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;

use ropey::RopeSlice;
use thiserror::Error;

use crate::result::{AnalysisResult, DiagnosticKind};

/// Analysis depth requested from the gateway.
///
/// Ordered: a full result supersedes a minimal one of the same version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnalysisMode {
	/// Procedure/macro name extraction only.
	Minimal,
	/// Full structural analysis with diagnostics.
	Full,
}

impl AnalysisMode {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Minimal => "minimal",
			Self::Full => "full",
		}
	}
}

/// Per-call parameters handed to the analyzer alongside the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
	pub mode: AnalysisMode,
	/// File the text belongs to. `None` for unsaved documents.
	pub path: Option<PathBuf>,
}

/// Analysis attempt that produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisFailure {
	/// The analyzer reported an error.
	#[error("analyzer failed: {0}")]
	Analyzer(String),
	/// The analyzer returned data that violates result invariants.
	#[error("malformed analysis result: {0}")]
	Malformed(String),
	/// The analyzer panicked.
	#[error("analyzer panicked: {0}")]
	Panicked(String),
}

/// Abstract analysis capability (for test mockability).
///
/// Must be safe to invoke off the interactive thread. `prior` is the last
/// applied result for the same document, available for incremental reuse.
pub trait Analyzer: Send + Sync {
	fn analyze(&self, text: RopeSlice<'_>, prior: Option<&AnalysisResult>, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure>;
}

impl<A: Analyzer + ?Sized> Analyzer for Arc<A> {
	fn analyze(&self, text: RopeSlice<'_>, prior: Option<&AnalysisResult>, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
		(**self).analyze(text, prior, request)
	}
}

/// Dispatches by mode: minimal passes to one analyzer, full passes to another.
pub struct ModeRouter<M, F> {
	pub minimal: M,
	pub full: F,
}

impl<M: Analyzer, F: Analyzer> Analyzer for ModeRouter<M, F> {
	fn analyze(&self, text: RopeSlice<'_>, prior: Option<&AnalysisResult>, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
		match request.mode {
			AnalysisMode::Minimal => self.minimal.analyze(text, prior, request),
			AnalysisMode::Full => self.full.analyze(text, prior, request),
		}
	}
}

/// Checks result invariants once, at the gateway boundary.
pub fn validate_result(result: &AnalysisResult) -> Result<(), AnalysisFailure> {
	for proc in &result.procedures {
		if proc.name.is_empty() {
			return Err(AnalysisFailure::Malformed(format!("procedure with empty name at line {}", proc.declaration_line)));
		}
		if let Some(body) = proc.body
			&& body.is_empty()
		{
			return Err(AnalysisFailure::Malformed(format!(
				"procedure {} body ends before it starts ({}..{})",
				proc.name, body.start, body.end
			)));
		}
	}
	if let Some(block) = result.variable_blocks.iter().find(|b| b.is_empty()) {
		return Err(AnalysisFailure::Malformed(format!("variable block ends before it starts ({}..{})", block.start, block.end)));
	}
	if let Some(entry) = result.errors.iter().find(|e| e.line == 0 && e.column != 0) {
		return Err(AnalysisFailure::Malformed(format!("error entry has a column but no line: {}", entry.message)));
	}
	let blocking = result.errors.iter().any(|e| e.kind == DiagnosticKind::Error);
	if blocking && !result.has_error {
		return Err(AnalysisFailure::Malformed("error entries present but has_error is false".into()));
	}
	Ok(())
}

/// Invokes the analyzer, converting panics and malformed output into failures.
pub fn run_gateway(analyzer: &dyn Analyzer, text: RopeSlice<'_>, prior: Option<&AnalysisResult>, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
	let result = catch_unwind(AssertUnwindSafe(|| analyzer.analyze(text, prior, request)))
		.map_err(|payload| AnalysisFailure::Panicked(scriptide_worker::panic_message(payload.as_ref())))??;
	validate_result(&result)?;
	Ok(result)
}

#[cfg(test)]
mod tests {
	use ropey::Rope;

	use super::*;
	use crate::result::{Diagnostic, LineSpan, Procedure};

	struct Fixed(Result<AnalysisResult, AnalysisFailure>);

	impl Analyzer for Fixed {
		fn analyze(&self, _: RopeSlice<'_>, _: Option<&AnalysisResult>, _: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
			self.0.clone()
		}
	}

	struct Panics;

	impl Analyzer for Panics {
		fn analyze(&self, _: RopeSlice<'_>, _: Option<&AnalysisResult>, _: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
			panic!("analyzer exploded")
		}
	}

	fn full() -> AnalysisRequest {
		AnalysisRequest {
			mode: AnalysisMode::Full,
			path: None,
		}
	}

	fn proc(name: &str, body: Option<LineSpan>) -> Procedure {
		Procedure {
			name: name.into(),
			declaration_line: 1,
			body,
			source_file: None,
		}
	}

	#[test]
	fn panics_become_failures() {
		let text = Rope::from("x");
		let err = run_gateway(&Panics, text.slice(..), None, &full()).unwrap_err();
		assert_eq!(err, AnalysisFailure::Panicked("analyzer exploded".into()));
	}

	#[test]
	fn inverted_body_is_malformed() {
		let text = Rope::new();
		let bad = AnalysisResult {
			procedures: vec![proc("start", Some(LineSpan::new(9, 3)))],
			parsed: true,
			..Default::default()
		};
		let err = run_gateway(&Fixed(Ok(bad)), text.slice(..), None, &full()).unwrap_err();
		assert!(matches!(err, AnalysisFailure::Malformed(_)), "got {err:?}");
	}

	#[test]
	fn inverted_variable_block_is_malformed() {
		let bad = AnalysisResult {
			variable_blocks: vec![LineSpan::new(8, 2)],
			parsed: true,
			..Default::default()
		};
		let err = validate_result(&bad).unwrap_err();
		assert_eq!(err, AnalysisFailure::Malformed("variable block ends before it starts (8..2)".into()));
	}

	#[test]
	fn inconsistent_error_flag_is_malformed() {
		let bad = AnalysisResult {
			errors: vec![Diagnostic {
				kind: DiagnosticKind::Error,
				file: None,
				line: 1,
				column: 1,
				length: 1,
				message: "boom".into(),
			}],
			parsed: true,
			has_error: false,
			..Default::default()
		};
		assert!(validate_result(&bad).is_err());
	}

	#[test]
	fn analyzer_errors_pass_through() {
		let text = Rope::new();
		let fixed = Fixed(Err(AnalysisFailure::Analyzer("no parser".into())));
		let err = run_gateway(&fixed, text.slice(..), None, &full()).unwrap_err();
		assert_eq!(err.to_string(), "analyzer failed: no parser");
	}

	#[test]
	fn router_dispatches_by_mode() {
		let router = ModeRouter {
			minimal: Fixed(Ok(AnalysisResult {
				procedures: vec![proc("names", None)],
				parsed: true,
				..Default::default()
			})),
			full: Fixed(Ok(AnalysisResult {
				procedures: vec![proc("full", Some(LineSpan::new(1, 4)))],
				parsed: true,
				..Default::default()
			})),
		};
		let text = Rope::new();
		let minimal = AnalysisRequest {
			mode: AnalysisMode::Minimal,
			path: None,
		};
		assert_eq!(router.analyze(text.slice(..), None, &minimal).unwrap().procedures[0].name, "names");
		assert_eq!(router.analyze(text.slice(..), None, &full()).unwrap().procedures[0].name, "full");
	}
}
