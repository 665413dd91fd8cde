//! Scriptide command-line driver.
//!
//! Runs the incremental analysis loop headless:
//! - `analyze` prints status, outline, folds and diagnostics for files
//! - `locate` finds the procedure enclosing a `path:line`
//! - `watch` re-analyzes a file as it changes on disk

mod cli;
mod commands;
mod host;
mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use scriptide_config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let mut config = match &cli.config {
		Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => Config::discover().context("loading user configuration")?,
	};

	match cli.command {
		Command::Analyze { files, minimal } => {
			if minimal {
				config.analysis.enabled = false;
			}
			for report in commands::analyze(config, &files).await? {
				print!("{report}");
			}
		}
		Command::Locate { target } => {
			let location = cli::FileLocation::parse(&target);
			println!("{}", commands::locate(config, &location).await?);
		}
		Command::Watch { file, poll_ms } => {
			info!(path = %file.display(), "watching");
			commands::watch(config, file, std::time::Duration::from_millis(poll_ms)).await?;
		}
	}

	Ok(())
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::fmt::format::FmtSpan;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_env("SCRIPTIDE_LOG")
			.or_else(|_| EnvFilter::try_from_default_env())
			.unwrap_or_else(|_| {
				if verbose {
					EnvFilter::new("scriptide=trace,scriptide_analysis=debug,scriptide_editor=debug,info")
				} else {
					EnvFilter::new("warn")
				}
			})
	};

	if let Some(log_dir) = std::env::var("SCRIPTIDE_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("scriptide.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_span_events(FmtSpan::CLOSE)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	// Fallback to stderr so stdout stays clean for reports
	tracing_subscriber::fmt().with_env_filter(filter()).with_writer(std::io::stderr).init();
}
