use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use ropey::RopeSlice;

use crate::result::{LineSpan, Macro};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*|;").expect("token pattern is valid"));
static DEFINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)").expect("define pattern is valid"));

/// Procedure as found by the scanner. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScannedProc {
	pub name: String,
	pub declaration_line: u32,
	pub body: Option<LineSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IssueKind {
	UnmatchedEnd,
	UnterminatedProcedure(String),
	DuplicateProcedure { name: String, first_line: u32 },
	MissingBody(String),
	UnterminatedVariables,
}

/// Structural problem found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanIssue {
	pub kind: IssueKind,
	pub line: u32,
	pub column: u32,
	pub length: u32,
}

impl fmt::Display for ScanIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			IssueKind::UnmatchedEnd => f.write_str("`end` without matching `begin`"),
			IssueKind::UnterminatedProcedure(name) => write!(f, "procedure `{name}` has no matching `end`"),
			IssueKind::DuplicateProcedure { name, first_line } => {
				write!(f, "procedure `{name}` is already defined at line {first_line}")
			}
			IssueKind::MissingBody(name) => write!(f, "procedure `{name}` expects `;` or `begin`"),
			IssueKind::UnterminatedVariables => f.write_str("`variable begin` block has no matching `end`"),
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct ScanOutput {
	pub procedures: Vec<ScannedProc>,
	pub macros: Vec<Macro>,
	/// Top-level `variable begin ... end` blocks.
	pub variable_blocks: Vec<LineSpan>,
	pub issues: Vec<ScanIssue>,
}

#[derive(Debug)]
struct Token<'a> {
	text: &'a str,
	line: u32,
	column: u32,
}

impl Token<'_> {
	fn is(&self, keyword: &str) -> bool {
		self.text.eq_ignore_ascii_case(keyword)
	}

	fn len(&self) -> u32 {
		self.text.len() as u32
	}
}

enum State {
	Top,
	/// Saw `procedure`, waiting for its name.
	AwaitName { line: u32, column: u32 },
	/// Saw `procedure NAME`, waiting for `;` or `begin`.
	Header { name: String, line: u32, column: u32 },
	InBody { name: String, start: u32, column: u32, depth: u32 },
	/// Saw top-level `variable`; a `begin` opens a block.
	AwaitVarBegin { line: u32, column: u32 },
	VarBlock { start: u32, column: u32, depth: u32 },
}

/// Scans script text for procedures, macros and block structure.
pub(crate) fn scan(text: RopeSlice<'_>) -> ScanOutput {
	let lines = clean_lines(text);
	let mut out = ScanOutput::default();
	let mut state = State::Top;
	let mut top_depth = 0u32;
	let mut last_line = 1u32;
	let mut in_define = false;

	for (idx, line) in lines.iter().enumerate() {
		let line_no = idx as u32 + 1;
		last_line = line_no;

		if in_define || line.trim_start().starts_with('#') {
			if let Some(caps) = DEFINE.captures(line) {
				out.macros.push(Macro {
					name: caps[1].to_string(),
					line: line_no,
				});
			}
			in_define = line.trim_end().ends_with('\\');
			continue;
		}

		for m in TOKEN.find_iter(line) {
			let tok = Token {
				text: m.as_str(),
				line: line_no,
				column: line[..m.start()].chars().count() as u32 + 1,
			};
			state = step(state, &tok, &mut out, &mut top_depth);
		}
	}

	match state {
		State::InBody { name, start, column, .. } => {
			unterminated(&mut out, name, start, column, last_line.max(start));
		}
		State::Header { name, line, column } => missing_body(&mut out, name, line, column),
		State::VarBlock { start, column, .. } => unterminated_variables(&mut out, start, column),
		State::Top | State::AwaitName { .. } | State::AwaitVarBegin { .. } => {}
	}
	out
}

fn step(state: State, tok: &Token<'_>, out: &mut ScanOutput, top_depth: &mut u32) -> State {
	match state {
		State::Top => {
			if tok.is("procedure") {
				State::AwaitName {
					line: tok.line,
					column: tok.column,
				}
			} else if tok.is("variable") {
				State::AwaitVarBegin {
					line: tok.line,
					column: tok.column,
				}
			} else {
				if tok.is("begin") {
					*top_depth += 1;
				} else if tok.is("end") {
					if *top_depth == 0 {
						out.issues.push(ScanIssue {
							kind: IssueKind::UnmatchedEnd,
							line: tok.line,
							column: tok.column,
							length: tok.len(),
						});
					} else {
						*top_depth -= 1;
					}
				}
				State::Top
			}
		}
		State::AwaitName { line, column } => {
			if tok.text == ";" || is_keyword(tok) {
				// `procedure` with no usable name; resynchronize.
				step(State::Top, tok, out, top_depth)
			} else {
				State::Header {
					name: tok.text.to_string(),
					line,
					column,
				}
			}
		}
		State::Header { name, line, column } => {
			if tok.text == ";" {
				declare(out, name, line);
				State::Top
			} else if tok.is("begin") {
				State::InBody {
					name,
					start: line,
					column,
					depth: 1,
				}
			} else if tok.is("procedure") {
				missing_body(out, name, line, column);
				step(State::Top, tok, out, top_depth)
			} else {
				// Parameter list and other header tokens.
				State::Header { name, line, column }
			}
		}
		State::InBody {
			name,
			start,
			column,
			depth,
		} => {
			if tok.is("begin") {
				State::InBody {
					name,
					start,
					column,
					depth: depth + 1,
				}
			} else if tok.is("end") {
				if depth == 1 {
					define(out, name, start, tok.line, column);
					State::Top
				} else {
					State::InBody {
						name,
						start,
						column,
						depth: depth - 1,
					}
				}
			} else if tok.is("procedure") {
				let end = tok.line.saturating_sub(1).max(start);
				unterminated(out, name, start, column, end);
				step(State::Top, tok, out, top_depth)
			} else {
				State::InBody {
					name,
					start,
					column,
					depth,
				}
			}
		}
		State::AwaitVarBegin { line, column } => {
			if tok.is("begin") {
				State::VarBlock {
					start: line,
					column,
					depth: 1,
				}
			} else {
				// Plain `variable x;` declaration.
				step(State::Top, tok, out, top_depth)
			}
		}
		State::VarBlock { start, column, depth } => {
			if tok.is("begin") {
				State::VarBlock {
					start,
					column,
					depth: depth + 1,
				}
			} else if tok.is("end") {
				if depth == 1 {
					out.variable_blocks.push(LineSpan::new(start, tok.line));
					State::Top
				} else {
					State::VarBlock {
						start,
						column,
						depth: depth - 1,
					}
				}
			} else if tok.is("procedure") {
				unterminated_variables(out, start, column);
				step(State::Top, tok, out, top_depth)
			} else {
				State::VarBlock { start, column, depth }
			}
		}
	}
}

fn is_keyword(tok: &Token<'_>) -> bool {
	tok.is("procedure") || tok.is("begin") || tok.is("end")
}

fn find_proc<'a>(out: &'a mut ScanOutput, name: &str) -> Option<&'a mut ScannedProc> {
	out.procedures.iter_mut().find(|p| p.name.eq_ignore_ascii_case(name))
}

fn declare(out: &mut ScanOutput, name: String, line: u32) {
	if find_proc(out, &name).is_none() {
		out.procedures.push(ScannedProc {
			name,
			declaration_line: line,
			body: None,
		});
	}
}

fn define(out: &mut ScanOutput, name: String, start: u32, end: u32, column: u32) {
	let body = Some(LineSpan::new(start, end));
	match find_proc(out, &name) {
		Some(existing) if existing.body.is_some() => {
			let first_line = existing.body.map_or(existing.declaration_line, |b| b.start);
			let length = name.len() as u32;
			out.issues.push(ScanIssue {
				kind: IssueKind::DuplicateProcedure { name, first_line },
				line: start,
				column,
				length,
			});
		}
		Some(existing) => existing.body = body,
		None => out.procedures.push(ScannedProc {
			name,
			declaration_line: start,
			body,
		}),
	}
}

fn unterminated(out: &mut ScanOutput, name: String, start: u32, column: u32, end: u32) {
	out.issues.push(ScanIssue {
		kind: IssueKind::UnterminatedProcedure(name.clone()),
		line: start,
		column,
		length: "procedure".len() as u32,
	});
	define(out, name, start, end, column);
}

fn missing_body(out: &mut ScanOutput, name: String, line: u32, column: u32) {
	out.issues.push(ScanIssue {
		kind: IssueKind::MissingBody(name.clone()),
		line,
		column,
		length: "procedure".len() as u32,
	});
	declare(out, name, line);
}

fn unterminated_variables(out: &mut ScanOutput, line: u32, column: u32) {
	out.issues.push(ScanIssue {
		kind: IssueKind::UnterminatedVariables,
		line,
		column,
		length: "variable".len() as u32,
	});
}

/// Splits `text` into lines with comments and string literals blanked out.
///
/// Blanked characters become spaces, so columns are preserved.
pub(crate) fn clean_lines(text: RopeSlice<'_>) -> Vec<String> {
	let mut in_block = false;
	text.lines()
		.map(|line| {
			let raw = line.to_string();
			let raw = raw.trim_end_matches(['\n', '\r']);
			let mut cleaned = String::with_capacity(raw.len());
			let mut chars = raw.chars().peekable();
			let mut in_string = false;
			while let Some(c) = chars.next() {
				if in_block {
					if c == '*' && chars.peek() == Some(&'/') {
						chars.next();
						cleaned.push_str("  ");
						in_block = false;
					} else {
						cleaned.push(' ');
					}
				} else if in_string {
					if c == '"' {
						in_string = false;
					}
					cleaned.push(' ');
				} else if c == '"' {
					in_string = true;
					cleaned.push(' ');
				} else if c == '/' && chars.peek() == Some(&'/') {
					break;
				} else if c == '/' && chars.peek() == Some(&'*') {
					chars.next();
					cleaned.push_str("  ");
					in_block = true;
				} else {
					cleaned.push(c);
				}
			}
			cleaned
		})
		.collect()
}
