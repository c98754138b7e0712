//! Settings builder
//!
//! Loads every registered source, merges them from lowest to highest
//! priority and deserializes the result into [`VellumSettings`].

use crate::settings::VellumSettings;
use crate::sources::{ConfigSource, EnvSource, SourceError, TomlFileSource};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ConfError {
	#[error("Failed to load {description}: {source}")]
	Source {
		description: String,
		#[source]
		source: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid settings: {0}")]
	Validation(String),
}

/// Merges `patch` into `target`, recursing into objects present on both sides.
fn merge_into(target: &mut Map<String, Value>, patch: Map<String, Value>) {
	for (key, incoming) in patch {
		match (target.get_mut(&key), incoming) {
			(Some(Value::Object(existing)), Value::Object(nested)) => merge_into(existing, nested),
			(_, incoming) => {
				target.insert(key, incoming);
			}
		}
	}
}

/// Builder for [`VellumSettings`]
///
/// # Examples
///
/// ```
/// use vellum_conf::SettingsBuilder;
/// use vellum_conf::sources::{DefaultSource, EnvSource};
/// use serde_json::json;
///
/// let settings = SettingsBuilder::new()
///     .add_source(DefaultSource::new().with_value("persistence", json!({"timeout_ms": 1000})))
///     .add_source(EnvSource::new().with_vars([("VELLUM_PERSISTENCE__TIMEOUT_MS", "250")]))
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.persistence.timeout_ms, Some(250));
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// The usual stack: an optional TOML file under `VELLUM_*` environment
	/// variables.
	pub fn standard(config_file: impl Into<PathBuf>) -> Self {
		Self::new()
			.add_source(TomlFileSource::new(config_file))
			.add_source(EnvSource::new())
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merged raw document. Sources of equal priority apply in the order
	/// they were added.
	pub fn build_value(&self) -> Result<Value, ConfError> {
		let mut ordered: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
		ordered.sort_by_key(|s| s.priority());

		let mut merged = Map::new();
		for source in ordered {
			let description = source.description();
			let loaded = source.load().map_err(|source| ConfError::Source {
				description: description.clone(),
				source,
			})?;
			debug!(source = %description, keys = loaded.len(), "Loaded configuration source");
			merge_into(&mut merged, loaded.into_iter().collect());
		}
		Ok(Value::Object(merged))
	}

	pub fn build(&self) -> Result<VellumSettings, ConfError> {
		let settings: VellumSettings = serde_json::from_value(self.build_value()?)?;
		validate(&settings)?;
		Ok(settings)
	}
}

fn validate(settings: &VellumSettings) -> Result<(), ConfError> {
	if settings.validation.regex_size_limit == 0 {
		return Err(ConfError::Validation(
			"validation.regex_size_limit must be greater than zero".to_string(),
		));
	}
	if settings.validation.json_max_depth == 0 {
		return Err(ConfError::Validation(
			"validation.json_max_depth must be greater than zero".to_string(),
		));
	}
	if settings.logging.level.trim().is_empty() {
		return Err(ConfError::Validation("logging.level must not be empty".to_string()));
	}
	Ok(())
}
