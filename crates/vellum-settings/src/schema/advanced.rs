//! Advanced section: type-specific extras and conditional display

use super::lenient::{take_bool, take_object, take_string, to_map};
use crate::JsonMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shows a field only while another field holds an expected value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalRule {
	/// Api id of the field being observed
	pub field: String,
	/// Value that makes the guarded field visible
	pub value: Value,
	#[serde(flatten)]
	pub extra: JsonMap,
}

impl ConditionalRule {
	/// Parses a rule; `None` when the observed field is missing or blank.
	pub fn from_map(raw: &JsonMap) -> Option<Self> {
		let mut bag = raw.clone();
		let field = take_string(&mut bag, "field").filter(|f| !f.trim().is_empty())?;
		let value = bag.remove("value").unwrap_or(Value::Null);
		Some(Self {
			field,
			value,
			extra: bag,
		})
	}

	/// Evaluates the rule against the observed field's current value.
	///
	/// Numbers compare by numeric value, so `1` matches `1.0`. An expected
	/// list matches when the current value is one of its items.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_settings::ConditionalRule;
	/// use serde_json::json;
	///
	/// let rule = ConditionalRule::from_map(
	///     json!({"field": "kind", "value": "video"}).as_object().unwrap()
	/// ).unwrap();
	///
	/// assert!(rule.is_satisfied(Some(&json!("video"))));
	/// assert!(!rule.is_satisfied(Some(&json!("image"))));
	/// assert!(!rule.is_satisfied(None));
	/// ```
	pub fn is_satisfied(&self, current: Option<&Value>) -> bool {
		let current = current.unwrap_or(&Value::Null);
		match &self.value {
			Value::Array(options) => options.iter().any(|o| loosely_equal(o, current)),
			expected => loosely_equal(expected, current),
		}
	}
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
		_ => a == b,
	}
}

/// Advanced section of a field's settings.
///
/// Besides the typed keys below, the extension bag holds the per-type
/// settings filled in by [`normalize_for_type`](crate::normalize_for_type).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettings {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub prefix: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suffix: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub show_buttons: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub button_layout: Option<String>,
	/// Input mask pattern, e.g. `99/99/9999`
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mask: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub conditional: Option<ConditionalRule>,
	#[serde(flatten)]
	pub extra: JsonMap,
}

impl AdvancedSettings {
	pub fn from_map(raw: &JsonMap) -> Self {
		let mut bag = raw.clone();
		let conditional = match bag.get("conditional") {
			Some(Value::Object(rule)) => ConditionalRule::from_map(rule),
			_ => None,
		};
		if conditional.is_some() {
			take_object(&mut bag, "conditional");
		}
		Self {
			prefix: take_string(&mut bag, "prefix"),
			suffix: take_string(&mut bag, "suffix"),
			currency: take_string(&mut bag, "currency"),
			locale: take_string(&mut bag, "locale"),
			show_buttons: take_bool(&mut bag, "showButtons"),
			button_layout: take_string(&mut bag, "buttonLayout"),
			mask: take_string(&mut bag, "mask"),
			conditional,
			extra: bag,
		}
	}

	pub fn from_value(raw: &Value) -> Self {
		raw.as_object().map(Self::from_map).unwrap_or_default()
	}

	pub fn to_map(&self) -> JsonMap {
		to_map(self)
	}

	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}
}

impl<'de> Deserialize<'de> for AdvancedSettings {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Value::deserialize(deserializer)?;
		Ok(Self::from_value(&raw))
	}
}
