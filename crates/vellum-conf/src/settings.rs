//! Typed runtime settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Every setting Vellum reads at runtime. Missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VellumSettings {
	pub logging: LoggingSettings,
	pub validation: ValidationLimits,
	pub persistence: PersistenceSettings,
	pub compat: CompatSettings,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Compact,
	Pretty,
	Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Filter directive, e.g. `info` or `vellum_forms=debug,info`
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::default(),
		}
	}
}

/// Limits applied to user-authored validation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
	/// Compiled size limit of a validation pattern, in bytes
	pub regex_size_limit: usize,
	pub json_max_depth: usize,
}

impl Default for ValidationLimits {
	fn default() -> Self {
		Self {
			regex_size_limit: 1 << 20,
			json_max_depth: 64,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
	/// Upper bound of one store call in milliseconds; unset waits forever
	pub timeout_ms: Option<u64>,
}

impl PersistenceSettings {
	pub fn timeout(&self) -> Option<Duration> {
		self.timeout_ms.map(Duration::from_millis)
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatSettings {
	/// Also update the top-level section copies of legacy field records
	pub legacy_dual_write: bool,
}
