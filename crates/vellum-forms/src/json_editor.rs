//! Text input of JSON editor fields

use crate::error::{FormError, FormResult};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Nesting depth accepted by [`parse_json_input`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

fn depth(value: &Value) -> usize {
	match value {
		Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
		Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
		_ => 0,
	}
}

/// Parses the text of a JSON editor.
///
/// # Examples
///
/// ```
/// use vellum_forms::parse_json_input;
/// use serde_json::json;
///
/// assert_eq!(parse_json_input(r#"{"a": [1, 2]}"#).unwrap(), json!({"a": [1, 2]}));
/// assert!(parse_json_input("{oops}").is_err());
/// ```
pub fn parse_json_input(text: &str) -> FormResult<Value> {
	parse_json_input_with_depth(text, DEFAULT_MAX_DEPTH)
}

/// Like [`parse_json_input`] with an explicit nesting limit.
pub fn parse_json_input_with_depth(text: &str, max_depth: usize) -> FormResult<Value> {
	let value: Value =
		serde_json::from_str(text).map_err(|e| FormError::Serialization(e.to_string()))?;
	let found = depth(&value);
	if found > max_depth {
		return Err(FormError::Serialization(format!(
			"nesting depth {found} exceeds the limit of {max_depth}"
		)));
	}
	Ok(value)
}

/// Pretty-prints `value` with `indent` spaces per level, the way a JSON
/// editor shows it.
pub fn to_pretty_json(value: &Value, indent: usize) -> FormResult<String> {
	let indent = " ".repeat(indent);
	let mut out = Vec::new();
	let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
	value
		.serialize(&mut serializer)
		.map_err(|e| FormError::Serialization(e.to_string()))?;
	String::from_utf8(out).map_err(|e| FormError::Serialization(e.to_string()))
}
