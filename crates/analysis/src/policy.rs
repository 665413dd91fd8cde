use std::time::Duration;

use scriptide_config::AnalysisConfig;

/// What kind of mutation re-armed the deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditTrigger {
	/// Ordinary keystroke-level edit.
	#[default]
	Typing,
	/// The document was just saved.
	Save,
	/// A structural command (rename, insert procedure) changed the text.
	Structural,
}

impl EditTrigger {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Typing => "typing",
			Self::Save => "save",
			Self::Structural => "structural",
		}
	}
}

/// Delays armed by an edit, relative to the edit instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArmedDelays {
	/// Local (minimal extraction) deadline.
	pub local: Duration,
	/// Full analysis deadline. `None` when full analysis is disabled.
	pub full: Option<Duration>,
}

/// Debounce delays per trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncePolicy {
	pub typing: Duration,
	pub save: Duration,
	pub structural: Duration,
	/// Local deadline while full analysis is enabled.
	pub local: Duration,
}

impl Default for DebouncePolicy {
	fn default() -> Self {
		Self::from_config(&AnalysisConfig::default())
	}
}

impl DebouncePolicy {
	pub fn from_config(cfg: &AnalysisConfig) -> Self {
		Self {
			typing: cfg.typing_delay(),
			save: cfg.save_delay(),
			structural: cfg.structural_delay(),
			local: cfg.local_delay(),
		}
	}

	/// Uniform policy, mostly for tests.
	pub const fn uniform(delay: Duration) -> Self {
		Self {
			typing: delay,
			save: delay,
			structural: delay,
			local: delay,
		}
	}

	pub fn delay_for(&self, trigger: EditTrigger) -> Duration {
		match trigger {
			EditTrigger::Typing => self.typing,
			EditTrigger::Save => self.save,
			EditTrigger::Structural => self.structural,
		}
	}

	/// Computes both deadlines for an edit.
	///
	/// With full analysis disabled only the local path runs, and it fires at
	/// half the trigger delay. Otherwise the local deadline never trails the
	/// full one.
	pub(crate) fn arm(&self, trigger: EditTrigger, analysis_enabled: bool) -> ArmedDelays {
		let delay = self.delay_for(trigger);
		if analysis_enabled {
			ArmedDelays {
				local: self.local.min(delay),
				full: Some(delay),
			}
		} else {
			ArmedDelays {
				local: delay / 2,
				full: None,
			}
		}
	}
}
