//! Lenient extraction of known keys from an open settings bag.
//!
//! Each helper removes the key from the bag only when the value could be
//! coerced; anything else stays in the bag untouched.

use crate::JsonMap;
use serde_json::{Number, Value};

pub(crate) fn take_bool(bag: &mut JsonMap, key: &str) -> Option<bool> {
	let parsed = match bag.get(key)? {
		Value::Bool(b) => Some(*b),
		Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
			"true" | "1" | "yes" | "on" => Some(true),
			"false" | "0" | "no" | "off" => Some(false),
			_ => None,
		},
		Value::Number(n) => n.as_i64().map(|v| v != 0),
		_ => None,
	};
	if parsed.is_some() {
		bag.remove(key);
	}
	parsed
}

pub(crate) fn take_u64(bag: &mut JsonMap, key: &str) -> Option<u64> {
	let parsed = match bag.get(key)? {
		Value::Number(n) => n
			.as_u64()
			.or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
		Value::String(s) => s.trim().parse::<u64>().ok(),
		_ => None,
	};
	if parsed.is_some() {
		bag.remove(key);
	}
	parsed
}

pub(crate) fn take_number(bag: &mut JsonMap, key: &str) -> Option<Number> {
	let parsed = match bag.get(key)? {
		Value::Number(n) => Some(n.clone()),
		Value::String(s) => {
			let s = s.trim();
			s.parse::<i64>()
				.map(Number::from)
				.ok()
				.or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64))
		}
		_ => None,
	};
	if parsed.is_some() {
		bag.remove(key);
	}
	parsed
}

pub(crate) fn take_string(bag: &mut JsonMap, key: &str) -> Option<String> {
	let parsed = match bag.get(key)? {
		Value::String(s) => Some(s.clone()),
		_ => None,
	};
	if parsed.is_some() {
		bag.remove(key);
	}
	parsed
}

pub(crate) fn take_object(bag: &mut JsonMap, key: &str) -> Option<JsonMap> {
	if !matches!(bag.get(key), Some(Value::Object(_))) {
		return None;
	}
	match bag.remove(key) {
		Some(Value::Object(map)) => Some(map),
		_ => None,
	}
}

/// Removes the key whatever its value, for fields typed as raw JSON.
pub(crate) fn take_value(bag: &mut JsonMap, key: &str) -> Option<Value> {
	bag.remove(key)
}

/// Serializes a schema struct into an object map.
///
/// The schema types only ever produce objects with string keys, so the
/// fallback branch is never taken in practice.
pub(crate) fn to_map<T: serde::Serialize>(value: &T) -> JsonMap {
	match serde_json::to_value(value) {
		Ok(Value::Object(map)) => map,
		_ => JsonMap::new(),
	}
}
