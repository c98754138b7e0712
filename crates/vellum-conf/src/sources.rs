//! Configuration sources for the layered settings system
//!
//! Sources are merged in priority order (environment variables > config
//! files > defaults).

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

fn root_object(value: Value) -> Result<IndexMap<String, Value>, SourceError> {
	match value {
		Value::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(SourceError::Parse("Expected object at root".to_string())),
	}
}

/// Inserts `value` at `path`, creating (or replacing non-object) sections
/// on the way.
fn insert_path(map: &mut Map<String, Value>, path: &[String], value: Value) {
	match path {
		[] => {}
		[leaf] => {
			map.insert(leaf.clone(), value);
		}
		[section, rest @ ..] => {
			let child = map
				.entry(section.clone())
				.or_insert_with(|| Value::Object(Map::new()));
			if !child.is_object() {
				*child = Value::Object(Map::new());
			}
			if let Value::Object(child) = child {
				insert_path(child, rest, value);
			}
		}
	}
}

/// Environment variable configuration source
///
/// `VELLUM_PERSISTENCE__TIMEOUT_MS=2500` becomes
/// `{"persistence": {"timeout_ms": 2500}}`: the prefix is stripped, `__`
/// separates sections and keys are lowercased.
pub struct EnvSource {
	prefix: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	pub const DEFAULT_PREFIX: &'static str = "VELLUM_";

	/// Create a source reading `VELLUM_*` variables
	pub fn new() -> Self {
		Self {
			prefix: Self::DEFAULT_PREFIX.to_string(),
			vars: None,
		}
	}

	/// Set the prefix filter for environment variables
	///
	/// # Examples
	///
	/// ```
	/// use vellum_conf::sources::EnvSource;
	///
	/// let source = EnvSource::new().with_prefix("CMS_");
	/// ```
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Read from the given pairs instead of the process environment
	pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
		self
	}

	fn parse_value(raw: String) -> Value {
		match raw.trim().to_ascii_lowercase().as_str() {
			"true" | "yes" | "on" => return Value::Bool(true),
			"false" | "no" | "off" => return Value::Bool(false),
			_ => {}
		}
		if let Ok(num) = raw.trim().parse::<i64>() {
			Value::Number(num.into())
		} else {
			Value::String(raw)
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let vars = match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		};

		let mut config = Map::new();
		for (key, value) in vars {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let path: Vec<String> = clean_key
				.split("__")
				.filter(|segment| !segment.is_empty())
				.map(str::to_lowercase)
				.collect();
			insert_path(&mut config, &path, Self::parse_value(value));
		}

		Ok(config.into_iter().collect())
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// TOML file configuration source. A missing file loads as empty.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		root_object(serde_json::to_value(toml_value)?)
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// JSON file configuration source. A missing file loads as empty.
pub struct JsonFileSource {
	path: PathBuf,
}

impl JsonFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for JsonFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		root_object(serde_json::from_str(&content)?)
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("JSON file: {}", self.path.display())
	}
}

/// Default values configuration source
///
/// # Examples
///
/// ```
/// use vellum_conf::sources::{ConfigSource, DefaultSource};
/// use serde_json::json;
///
/// let source = DefaultSource::new().with_value("logging", json!({"level": "debug"}));
/// assert_eq!(source.load().unwrap()["logging"]["level"], json!("debug"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a default value for a top-level key
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}
