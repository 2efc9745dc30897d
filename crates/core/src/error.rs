//! Error types for the fallible edges of the toast engine.
//!
//! Queue, timer, and transition operations never fail; guard conditions are
//! absorbed as no-ops. Only configuration loading and name parsing report
//! errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a surface configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value parsed but is outside its allowed range.
	#[error("invalid value for `{field}`: {reason}")]
	Invalid {
		/// Config key that holds the bad value.
		field: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
}

/// A placement name did not match any known screen anchor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown placement `{0}` (expected top-left, top-center, top-right, bottom-left, bottom-center or bottom-right)")]
pub struct PlacementParseError(pub String);

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
