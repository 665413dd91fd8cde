//! Built-in analyzers for the scripting language.
//!
//! [`NameScanner`] is the minimal (names only) pass, [`BlockAnalyzer`] the
//! full structural pass. Both share one line scanner that blanks comments and
//! strings before tokenizing, and both keep procedures a prior result
//! attributed to other files (headers).

mod scan;

use std::path::Path;

use ropey::RopeSlice;

use crate::gateway::{AnalysisFailure, AnalysisRequest, Analyzer, ModeRouter};
use crate::result::{AnalysisResult, Diagnostic, DiagnosticKind, Procedure};

/// Minimal extraction: procedure and macro names, no diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameScanner;

impl Analyzer for NameScanner {
	fn analyze(&self, text: RopeSlice<'_>, prior: Option<&AnalysisResult>, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
		let out = scan::scan(text);
		Ok(AnalysisResult {
			procedures: merge_procedures(out.procedures, prior, request.path.as_deref()),
			macros: out.macros,
			variable_blocks: out.variable_blocks,
			errors: Vec::new(),
			parsed: true,
			has_error: false,
		})
	}
}

/// Full structural pass: procedure bodies, block balance, duplicate
/// definitions and undefined forward declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockAnalyzer;

impl Analyzer for BlockAnalyzer {
	fn analyze(&self, text: RopeSlice<'_>, prior: Option<&AnalysisResult>, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisFailure> {
		let out = scan::scan(text);
		let file = request.path.clone();

		let mut errors: Vec<Diagnostic> = out
			.issues
			.iter()
			.map(|issue| Diagnostic {
				kind: DiagnosticKind::Error,
				file: file.clone(),
				line: issue.line,
				column: issue.column,
				length: issue.length,
				message: issue.to_string(),
			})
			.collect();
		errors.extend(out.procedures.iter().filter(|p| p.body.is_none()).map(|p| Diagnostic {
			kind: DiagnosticKind::Warning,
			file: file.clone(),
			line: p.declaration_line,
			column: 0,
			length: 0,
			message: format!("procedure `{}` is declared but never defined", p.name),
		}));
		errors.sort_by_key(|e| (e.line, e.column));

		let has_error = !out.issues.is_empty();
		Ok(AnalysisResult {
			procedures: merge_procedures(out.procedures, prior, request.path.as_deref()),
			macros: out.macros,
			variable_blocks: out.variable_blocks,
			errors,
			parsed: true,
			has_error,
		})
	}
}

/// Default routing: [`NameScanner`] for minimal passes, [`BlockAnalyzer`]
/// for full ones.
pub fn default_analyzer() -> ModeRouter<NameScanner, BlockAnalyzer> {
	ModeRouter {
		minimal: NameScanner,
		full: BlockAnalyzer,
	}
}

/// Procedures found in this text, followed by the prior result's procedures
/// from other files.
fn merge_procedures(scanned: Vec<scan::ScannedProc>, prior: Option<&AnalysisResult>, path: Option<&Path>) -> Vec<Procedure> {
	let mut procedures: Vec<Procedure> = scanned
		.into_iter()
		.map(|p| Procedure {
			name: p.name,
			declaration_line: p.declaration_line,
			body: p.body,
			source_file: path.map(Path::to_path_buf),
		})
		.collect();
	if let Some(prior) = prior {
		let imported: Vec<Procedure> = prior
			.procedures
			.iter()
			.filter(|p| !p.is_in_file(path) && procedures.iter().all(|q| !q.name.eq_ignore_ascii_case(&p.name)))
			.cloned()
			.collect();
		procedures.extend(imported);
	}
	procedures
}
