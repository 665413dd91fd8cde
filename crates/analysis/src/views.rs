//! Views derived from an applied [`AnalysisResult`]: fold ranges and outline.

use std::path::Path;

use crate::result::{AnalysisResult, LineSpan, Macro, Procedure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldKind {
	Procedure,
	/// Block of forward declarations above the first procedure body.
	DeclarationRegion,
	/// Top-level `variable begin ... end` block.
	Variables,
}

/// A collapsible line range (1-based, inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRange {
	pub start_line: u32,
	pub end_line: u32,
	pub label: String,
	pub kind: FoldKind,
}

/// Fold ranges for the procedures defined in `file`.
///
/// One fold per multi-line body, labelled with the upper-cased name, plus one
/// per multi-line variable block, sorted by start line. The declaration
/// region, if any, comes first.
pub fn fold_ranges(result: &AnalysisResult, file: Option<&Path>) -> Vec<FoldRange> {
	let mut folds: Vec<FoldRange> = result
		.procedures
		.iter()
		.filter(|p| p.is_in_file(file))
		.filter_map(|p| {
			let body = p.body?;
			(body.start < body.end).then(|| FoldRange {
				start_line: body.start,
				end_line: body.end,
				label: p.name.to_uppercase(),
				kind: FoldKind::Procedure,
			})
		})
		.collect();
	folds.extend(result.variable_blocks.iter().filter(|b| b.start < b.end).map(|b| FoldRange {
		start_line: b.start,
		end_line: b.end,
		label: "VARIABLES".into(),
		kind: FoldKind::Variables,
	}));
	folds.sort_by_key(|f| f.start_line);

	if let Some(region) = declaration_region(result, file) {
		folds.insert(0, FoldRange {
			start_line: region.start,
			end_line: region.end,
			label: "DECLARATIONS".into(),
			kind: FoldKind::DeclarationRegion,
		});
	}
	folds
}

/// Span from the first to the last forward declaration preceding the first
/// body, when it covers more than one line.
fn declaration_region(result: &AnalysisResult, file: Option<&Path>) -> Option<LineSpan> {
	let local: Vec<&Procedure> = result.procedures.iter().filter(|p| p.is_in_file(file)).collect();
	let first_body = local.iter().filter_map(|p| p.body.map(|b| b.start)).min().unwrap_or(u32::MAX);
	let mut decl_lines = local
		.iter()
		.filter(|p| p.body.is_none_or(|b| b.start != p.declaration_line))
		.map(|p| p.declaration_line)
		.filter(|&line| line < first_body);
	let first = decl_lines.next()?;
	let (start, end) = decl_lines.fold((first, first), |(lo, hi), line| (lo.min(line), hi.max(line)));
	(start < end).then_some(LineSpan::new(start, end))
}

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineItem {
	Procedure { name: String, line: u32, defined: bool },
	Macro { name: String, line: u32 },
}

/// Procedures sorted by declaration line, followed by macros sorted by line.
pub fn outline(result: &AnalysisResult) -> Vec<OutlineItem> {
	let mut procs: Vec<&Procedure> = result.procedures.iter().collect();
	procs.sort_by_key(|p| p.declaration_line);
	let mut macros: Vec<&Macro> = result.macros.iter().collect();
	macros.sort_by_key(|m| m.line);

	procs
		.into_iter()
		.map(|p| OutlineItem::Procedure {
			name: p.name.clone(),
			line: p.declaration_line,
			defined: p.is_defined(),
		})
		.chain(macros.into_iter().map(|m| OutlineItem::Macro {
			name: m.name.clone(),
			line: m.line,
		}))
		.collect()
}
