//! Configuration system for scriptide.
//!
//! Configuration is written in TOML. Every field has a default, so an empty
//! (or missing) file yields a usable configuration:
//!
//! ```toml
//! [analysis]
//! enabled = true
//! typing_delay_ms = 4000
//! save_delay_ms = 1000
//! structural_delay_ms = 1000
//! local_delay_ms = 500
//!
//! [navigation]
//! coalesce_lines = 1
//! ```
//!
//! # Configuration Files
//!
//! [`Config::discover`] looks for `$XDG_CONFIG_HOME/scriptide/config.toml`
//! (or the platform equivalent) and falls back to defaults if absent.

mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Background analysis scheduling.
	pub analysis: AnalysisConfig,
	/// Caret navigation history.
	pub navigation: NavigationConfig,
}

/// Analysis scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
	/// Run the full structural analyzer. When false only minimal
	/// (procedure/macro name) extraction runs.
	pub enabled: bool,
	/// Full deadline after an ordinary edit.
	pub typing_delay_ms: u64,
	/// Full deadline after an explicit save.
	pub save_delay_ms: u64,
	/// Full deadline after a structural command (rename, insert procedure).
	pub structural_delay_ms: u64,
	/// Local deadline while full analysis is enabled.
	pub local_delay_ms: u64,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			typing_delay_ms: 4000,
			save_delay_ms: 1000,
			structural_delay_ms: 1000,
			local_delay_ms: 500,
		}
	}
}

impl AnalysisConfig {
	pub fn typing_delay(&self) -> Duration {
		Duration::from_millis(self.typing_delay_ms)
	}

	pub fn save_delay(&self) -> Duration {
		Duration::from_millis(self.save_delay_ms)
	}

	pub fn structural_delay(&self) -> Duration {
		Duration::from_millis(self.structural_delay_ms)
	}

	pub fn local_delay(&self) -> Duration {
		Duration::from_millis(self.local_delay_ms)
	}
}

/// Navigation history settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
	/// Caret moves within this many lines of the last checkpoint overwrite
	/// it instead of creating a new one.
	pub coalesce_lines: u32,
}

impl Default for NavigationConfig {
	fn default() -> Self {
		Self { coalesce_lines: 1 }
	}
}

impl Config {
	/// Parses configuration from a TOML string.
	pub fn from_toml(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from a file.
	pub fn load(path: &Path) -> Result<Self> {
		let contents = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml(&contents)?;
		tracing::debug!(path = %path.display(), "config.loaded");
		Ok(config)
	}

	/// Loads the user configuration file if present, defaults otherwise.
	pub fn discover() -> Result<Self> {
		match Self::default_path() {
			Some(path) if path.exists() => Self::load(&path),
			_ => {
				tracing::debug!("config.defaults");
				Ok(Self::default())
			}
		}
	}

	/// Platform location of the user configuration file.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("scriptide").join("config.toml"))
	}

	/// Rejects values that would break the scheduler.
	pub fn validate(&self) -> Result<()> {
		if self.analysis.typing_delay_ms == 0 {
			return Err(ConfigError::Invalid("analysis.typing_delay_ms must be greater than zero".into()));
		}
		Ok(())
	}
}
