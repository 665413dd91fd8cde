use std::fmt;

use crate::result::AnalysisResult;

/// Human-readable analysis state surfaced to the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
	/// No analysis has been applied yet.
	#[default]
	Idle,
	/// A full pass is running.
	Working,
	/// The text changed since the last applied result.
	UpdatePending,
	Complete,
	CompleteWithErrors,
	Failed,
	/// Full analysis is off; only names were extracted.
	MinimalOnly,
	/// Unsaved document with full analysis on: only names from this buffer.
	LocalOnly,
	/// Unsaved document with full analysis off.
	Disabled,
}

impl AnalysisStatus {
	/// Status after applying an authoritative result.
	pub fn for_result(result: &AnalysisResult, analysis_enabled: bool, has_path: bool) -> Self {
		match (has_path, analysis_enabled) {
			(false, true) => Self::LocalOnly,
			(false, false) => Self::Disabled,
			(true, false) => Self::MinimalOnly,
			(true, true) if !result.parsed => Self::Failed,
			(true, true) if result.has_error => Self::CompleteWithErrors,
			(true, true) => Self::Complete,
		}
	}

	pub fn is_error(self) -> bool {
		matches!(self, Self::CompleteWithErrors | Self::Failed)
	}
}

impl fmt::Display for AnalysisStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Idle => "Parser:",
			Self::Working => "Parser: Working",
			Self::UpdatePending => "Parser: Update change",
			Self::Complete => "Parser: Complete",
			Self::CompleteWithErrors => "Parser: Script syntax error (see parser errors log)",
			Self::Failed => "Parser: Failed script parsing (see parser errors log)",
			Self::MinimalOnly => "Parser: Disabled [Get only macros]",
			Self::LocalOnly => "Parser: Get only local macros",
			Self::Disabled => "Parser: Disabled",
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn result(parsed: bool, has_error: bool) -> AnalysisResult {
		AnalysisResult {
			parsed,
			has_error,
			..Default::default()
		}
	}

	#[test]
	fn full_analysis_statuses() {
		assert_eq!(AnalysisStatus::for_result(&result(true, false), true, true), AnalysisStatus::Complete);
		assert_eq!(AnalysisStatus::for_result(&result(true, true), true, true), AnalysisStatus::CompleteWithErrors);
		assert_eq!(AnalysisStatus::for_result(&result(false, true), true, true), AnalysisStatus::Failed);
	}

	#[test]
	fn minimal_extraction_is_distinguished() {
		assert_eq!(AnalysisStatus::for_result(&result(true, false), false, true), AnalysisStatus::MinimalOnly);
		assert_eq!(AnalysisStatus::for_result(&result(false, true), false, true), AnalysisStatus::MinimalOnly);
		assert_eq!(AnalysisStatus::MinimalOnly.to_string(), "Parser: Disabled [Get only macros]");
	}

	#[test]
	fn unsaved_documents() {
		assert_eq!(AnalysisStatus::for_result(&result(true, false), true, false), AnalysisStatus::LocalOnly);
		assert_eq!(AnalysisStatus::for_result(&result(true, false), false, false), AnalysisStatus::Disabled);
		assert_eq!(AnalysisStatus::LocalOnly.to_string(), "Parser: Get only local macros");
	}

	#[test]
	fn error_statuses() {
		assert!(AnalysisStatus::Failed.is_error());
		assert!(AnalysisStatus::CompleteWithErrors.is_error());
		assert!(!AnalysisStatus::Complete.is_error());
	}
}
