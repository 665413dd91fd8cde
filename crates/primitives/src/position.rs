/// Caret position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
	/// Zero-based line index.
	pub line: u32,
	/// Zero-based column (char offset in the line).
	pub column: u32,
}

impl Position {
	/// Creates a new position.
	pub const fn new(line: u32, column: u32) -> Self {
		Self { line, column }
	}
}

