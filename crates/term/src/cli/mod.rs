//! CLI schema and parsing helpers for the scriptide binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A script path with an optional 1-based line, written `path:line`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLocation {
	pub path: PathBuf,
	/// 1-based line, matching analysis result lines.
	pub line: Option<u32>,
}

impl FileLocation {
	/// Splits a trailing `:line` off `s`; anything else is a plain path.
	///
	/// A drive letter prefix (`C:\...`) is not mistaken for a line suffix.
	pub fn parse(s: &str) -> Self {
		let skip = if s.len() > 2 && s.as_bytes().get(1) == Some(&b':') { 2 } else { 0 };
		let split = s[skip..].rfind(':').map(|i| skip + i);

		if let Some(colon) = split
			&& let Ok(line) = s[colon + 1..].parse::<u32>()
			&& line > 0
		{
			return Self {
				path: PathBuf::from(&s[..colon]),
				line: Some(line),
			};
		}

		Self {
			path: PathBuf::from(s),
			line: None,
		}
	}
}

#[derive(Parser, Debug)]
#[command(name = "scriptide")]
#[command(about = "Incremental analysis for procedure scripts")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to the user config directory)
	#[arg(short, long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Analyze scripts and print status, outline, folds and diagnostics
	Analyze {
		/// Script files
		#[arg(required = true)]
		files: Vec<PathBuf>,

		/// Only extract names (no structural checks)
		#[arg(long)]
		minimal: bool,
	},
	/// Print the procedure enclosing `path:line`
	Locate {
		/// Script location, e.g. `main.ssl:42`
		target: String,
	},
	/// Re-analyze a script whenever it changes on disk
	Watch {
		/// Script file
		file: PathBuf,

		/// Interval between modification checks
		#[arg(long, value_name = "MS", default_value_t = 200)]
		poll_ms: u64,
	},
}
