//! Surface-level defaults, loadable from TOML.
//!
//! ```toml
//! placement = "bottom-right"
//! auto-dismiss = true
//! auto-dismiss-timeout-ms = 5000
//! transition-duration-ms = 220
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::placement::Placement;

/// Auto-dismiss timeout used when neither the toast nor the config sets one.
pub const DEFAULT_AUTO_DISMISS_TIMEOUT: Duration = Duration::from_millis(5000);
/// Duration of the enter and exit transitions.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(220);

/// Defaults applied to every toast on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
	pub placement: Placement,
	/// Whether toasts auto-dismiss unless their options say otherwise.
	pub auto_dismiss: bool,
	pub auto_dismiss_timeout: Duration,
	pub transition_duration: Duration,
}

impl Default for SurfaceConfig {
	fn default() -> Self {
		Self {
			placement: Placement::default(),
			auto_dismiss: false,
			auto_dismiss_timeout: DEFAULT_AUTO_DISMISS_TIMEOUT,
			transition_duration: DEFAULT_TRANSITION_DURATION,
		}
	}
}

/// On-disk shape of [`SurfaceConfig`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
	placement: Option<Placement>,
	auto_dismiss: Option<bool>,
	auto_dismiss_timeout_ms: Option<u64>,
	transition_duration_ms: Option<u64>,
}

impl SurfaceConfig {
	/// Parses a config from TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		let raw: RawConfig = toml::from_str(text)?;
		let defaults = Self::default();
		Ok(Self {
			placement: raw.placement.unwrap_or(defaults.placement),
			auto_dismiss: raw.auto_dismiss.unwrap_or(defaults.auto_dismiss),
			auto_dismiss_timeout: positive_ms("auto-dismiss-timeout-ms", raw.auto_dismiss_timeout_ms)?
				.unwrap_or(defaults.auto_dismiss_timeout),
			transition_duration: positive_ms("transition-duration-ms", raw.transition_duration_ms)?
				.unwrap_or(defaults.transition_duration),
		})
	}

	/// Reads and parses a config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&text)?;
		tracing::debug!(path = %path.display(), ?config, "config.load");
		Ok(config)
	}

	/// Effective timeout for a toast with an optional per-toast override.
	pub fn timeout_for(&self, per_toast: Option<Duration>) -> Duration {
		per_toast.filter(|t| !t.is_zero()).unwrap_or(self.auto_dismiss_timeout)
	}

	#[must_use]
	pub fn placement(mut self, placement: Placement) -> Self {
		self.placement = placement;
		self
	}

	#[must_use]
	pub fn auto_dismiss(mut self, enabled: bool) -> Self {
		self.auto_dismiss = enabled;
		self
	}

	/// Sets the default countdown. Zero is ignored and keeps the current value.
	#[must_use]
	pub fn auto_dismiss_timeout(mut self, timeout: Duration) -> Self {
		if !timeout.is_zero() {
			self.auto_dismiss_timeout = timeout;
		}
		self
	}

	#[must_use]
	pub fn transition_duration(mut self, duration: Duration) -> Self {
		self.transition_duration = duration;
		self
	}
}

fn positive_ms(field: &'static str, value: Option<u64>) -> Result<Option<Duration>> {
	match value {
		Some(0) => Err(ConfigError::Invalid {
			field,
			reason: "must be greater than zero".into(),
		}),
		other => Ok(other.map(Duration::from_millis)),
	}
}
