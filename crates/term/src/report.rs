//! Plain-text rendering of a document's analysis state.

use std::fmt::Write as _;

use scriptide_analysis::{AnalysisResult, AnalysisStatus, DiagnosticKind, FoldKind, FoldRange, OutlineItem, Procedure};

/// Everything printed for one document.
pub struct DocumentReport<'a> {
	pub name: &'a str,
	pub status: AnalysisStatus,
	pub result: Option<&'a AnalysisResult>,
	pub folds: &'a [FoldRange],
	pub outline: &'a [OutlineItem],
}

impl DocumentReport<'_> {
	pub fn render(&self) -> String {
		let mut out = String::new();
		let _ = writeln!(out, "{}: {}", self.name, self.status);

		let Some(result) = self.result else {
			return out;
		};

		if !self.outline.is_empty() {
			out.push_str("  outline:\n");
			for item in self.outline {
				let _ = match item {
					OutlineItem::Procedure { name, line, defined: true } => writeln!(out, "    proc  {name} @{line}"),
					OutlineItem::Procedure { name, line, defined: false } => writeln!(out, "    proc  {name} @{line} (declared)"),
					OutlineItem::Macro { name, line } => writeln!(out, "    macro {name} @{line}"),
				};
			}
		}

		if !self.folds.is_empty() {
			out.push_str("  folds:\n");
			for fold in self.folds {
				let marker = match fold.kind {
					FoldKind::Procedure => "",
					FoldKind::DeclarationRegion => " (region)",
				FoldKind::Variables => " (variables)",
				};
				let _ = writeln!(out, "    {}-{} {}{marker}", fold.start_line, fold.end_line, fold.label);
			}
		}

		if !result.errors.is_empty() {
			out.push_str("  diagnostics:\n");
			for diag in &result.errors {
				let kind = match diag.kind {
					DiagnosticKind::Error => "error",
					DiagnosticKind::Warning => "warning",
					DiagnosticKind::Message => "note",
				};
				let _ = if diag.line == 0 {
					writeln!(out, "    {kind}: {}", diag.message)
				} else {
					writeln!(out, "    {kind} {}:{}: {}", diag.line, diag.column, diag.message)
				};
			}
		}

		out
	}
}

/// The defined procedure whose body contains `line`, or whose declaration
/// sits on it.
pub fn enclosing_procedure(result: &AnalysisResult, line: u32) -> Option<&Procedure> {
	result
		.procedures
		.iter()
		.find(|p| p.body.is_some_and(|body| (body.start..=body.end).contains(&line)))
		.or_else(|| result.procedures.iter().find(|p| p.declaration_line == line))
}
