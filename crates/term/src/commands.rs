//! Subcommand drivers around a headless [`Editor`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context, bail};
use scriptide_analysis::default_analyzer;
use scriptide_config::Config;
use scriptide_editor::{Editor, EditorHost};
use scriptide_primitives::{DocumentId, Rope};
use tokio::time::sleep;

use crate::cli::FileLocation;
use crate::host::PrintHost;
use crate::report::{DocumentReport, enclosing_procedure};

/// Upper bound on one idle wait, so a missed wakeup only costs latency.
const MAX_WAIT: Duration = Duration::from_millis(50);

fn new_editor(config: Config) -> Editor<PrintHost> {
	Editor::new(config, Arc::new(default_analyzer()), PrintHost::default())
}

fn read_script(path: &Path) -> anyhow::Result<Rope> {
	let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	Ok(Rope::from(text))
}

/// Ticks until nothing is running, queued or armed.
async fn run_until_idle<H: EditorHost>(editor: &mut Editor<H>) {
	let signal = editor.completion_signal();
	loop {
		editor.tick(Instant::now());
		if editor.is_idle() {
			return;
		}
		tokio::select! {
			_ = signal.notified() => {}
			_ = sleep(wait_budget(editor)) => {}
		}
	}
}

fn wait_budget<H: EditorHost>(editor: &Editor<H>) -> Duration {
	editor
		.next_wakeup()
		.map_or(MAX_WAIT, |at| at.saturating_duration_since(Instant::now()).min(MAX_WAIT))
}

fn render(editor: &Editor<PrintHost>, doc: DocumentId) -> String {
	let session = editor.session(doc);
	let name = session.and_then(|s| s.path()).map(|p| p.display().to_string()).unwrap_or_else(|| doc.to_string());
	let result = editor.result(doc);
	let folds = editor.folds(doc);
	let outline = editor.outline(doc);
	DocumentReport {
		name: &name,
		status: editor.status(doc).unwrap_or_default(),
		result: result.as_deref(),
		folds: &folds,
		outline: &outline,
	}
	.render()
}

/// Analyzes every file and returns one rendered report per file.
pub async fn analyze(config: Config, files: &[PathBuf]) -> anyhow::Result<Vec<String>> {
	let mut editor = new_editor(config);
	let mut docs = Vec::with_capacity(files.len());
	for path in files {
		let text = read_script(path)?;
		docs.push(editor.open_document(Some(path.clone()), text));
	}

	run_until_idle(&mut editor).await;
	Ok(docs.into_iter().map(|doc| render(&editor, doc)).collect())
}

/// Describes the procedure enclosing `location`.
pub async fn locate(config: Config, location: &FileLocation) -> anyhow::Result<String> {
	let Some(line) = location.line else {
		bail!("expected `path:line`, got {}", location.path.display());
	};

	let mut editor = new_editor(config);
	let doc = editor.open_document(Some(location.path.clone()), read_script(&location.path)?);
	run_until_idle(&mut editor).await;

	let result = editor.result(doc).context("analysis produced no result")?;
	Ok(match enclosing_procedure(&result, line) {
		Some(found) => match found.body {
			Some(body) => format!("{} (declared @{}, body {}-{})", found.name, found.declaration_line, body.start, body.end),
			None => format!("{} (declared @{}, no body)", found.name, found.declaration_line),
		},
		None => format!("no procedure at {}:{line}", location.path.display()),
	})
}

fn modified_at(path: &Path) -> anyhow::Result<SystemTime> {
	let meta = std::fs::metadata(path).with_context(|| format!("reading metadata of {}", path.display()))?;
	Ok(meta.modified()?)
}

/// Prints a report after every applied analysis until interrupted.
pub async fn watch(config: Config, path: PathBuf, poll: Duration) -> anyhow::Result<()> {
	let mut editor = new_editor(config);
	let mut seen = modified_at(&path)?;
	let doc = editor.open_document(Some(path.clone()), read_script(&path)?);
	let signal = editor.completion_signal();

	let ctrl_c = tokio::signal::ctrl_c();
	tokio::pin!(ctrl_c);

	loop {
		tokio::select! {
			_ = &mut ctrl_c => {
				tracing::info!("term.watch.interrupted");
				return Ok(());
			}
			_ = signal.notified() => {}
			_ = sleep(wait_budget(&editor).min(poll)) => {}
		}

		match modified_at(&path) {
			Ok(stamp) if stamp != seen => {
				seen = stamp;
				let text = read_script(&path)?;
				editor.edit(doc, |rope| *rope = text)?;
				editor.note_saved(doc)?;
			}
			Ok(_) => {}
			Err(error) => tracing::warn!(%error, "term.watch.stat_failed"),
		}

		editor.tick(Instant::now());
		for refreshed in editor.host_mut().take_refreshed() {
			print!("{}", render(&editor, refreshed));
		}
	}
}
