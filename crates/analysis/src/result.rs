use std::path::{Path, PathBuf};

use crate::gateway::AnalysisFailure;

/// Inclusive 1-based line span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
	pub start: u32,
	pub end: u32,
}

impl LineSpan {
	pub const fn new(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	/// Number of lines covered.
	pub const fn len(&self) -> u32 {
		self.end.saturating_sub(self.start) + 1
	}

	pub const fn is_empty(&self) -> bool {
		self.end < self.start
	}
}

/// A procedure known to the analyzer.
///
/// Lines are 1-based, as reported by analyzers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
	pub name: String,
	/// First line the procedure is declared on (forward declaration or definition).
	pub declaration_line: u32,
	/// Definition body, from the defining `procedure` line to its closing `end`.
	/// `None` for declared-only procedures.
	pub body: Option<LineSpan>,
	/// File the procedure lives in. `None` for unsaved documents.
	pub source_file: Option<PathBuf>,
}

impl Procedure {
	pub fn is_defined(&self) -> bool {
		self.body.is_some()
	}

	/// True if this procedure was found in `file` (case-insensitive, like the
	/// scripting toolchain's own path handling).
	pub fn is_in_file(&self, file: Option<&Path>) -> bool {
		match (&self.source_file, file) {
			(None, None) => true,
			(Some(a), Some(b)) => a.to_string_lossy().eq_ignore_ascii_case(&b.to_string_lossy()),
			_ => false,
		}
	}
}

/// A `#define`d macro name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
	pub name: String,
	pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
	Error,
	Warning,
	Message,
}

/// One entry of the analyzer's error list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub kind: DiagnosticKind,
	pub file: Option<PathBuf>,
	/// 1-based line, or 0 when the entry has no location.
	pub line: u32,
	/// 1-based column, or 0 when the entry has no location.
	pub column: u32,
	pub length: u32,
	pub message: String,
}

/// Immutable outcome of one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
	pub procedures: Vec<Procedure>,
	pub macros: Vec<Macro>,
	pub errors: Vec<Diagnostic>,
	/// Top-level `variable begin ... end` blocks of the analyzed text.
	pub variable_blocks: Vec<LineSpan>,
	/// Analysis completed structurally.
	pub parsed: bool,
	/// At least one blocking error was found.
	pub has_error: bool,
}

impl AnalysisResult {
	/// Result recorded when the gateway failed.
	///
	/// Keeps the prior name tables and variable blocks so outline and folds
	/// survive a failed pass; the failure itself becomes the only error entry.
	pub fn failed(prior: Option<&AnalysisResult>, failure: &AnalysisFailure) -> Self {
		let (procedures, macros, variable_blocks) = prior
			.map(|p| (p.procedures.clone(), p.macros.clone(), p.variable_blocks.clone()))
			.unwrap_or_default();
		Self {
			procedures,
			macros,
			variable_blocks,
			errors: vec![Diagnostic {
				kind: DiagnosticKind::Error,
				file: None,
				line: 0,
				column: 0,
				length: 0,
				message: failure.to_string(),
			}],
			parsed: false,
			has_error: true,
		}
	}

	/// Provisional update: name tables from a minimal pass, diagnostics and
	/// flags from the last full pass.
	pub fn with_names_from(base: &AnalysisResult, names: AnalysisResult) -> Self {
		Self {
			procedures: names.procedures,
			macros: names.macros,
			variable_blocks: names.variable_blocks,
			errors: base.errors.clone(),
			parsed: base.parsed,
			has_error: base.has_error,
		}
	}

	pub fn procedure(&self, name: &str) -> Option<&Procedure> {
		self.procedures.iter().find(|p| p.name.eq_ignore_ascii_case(name))
	}

	pub fn error_count(&self) -> usize {
		self.errors.iter().filter(|e| e.kind == DiagnosticKind::Error).count()
	}
}
