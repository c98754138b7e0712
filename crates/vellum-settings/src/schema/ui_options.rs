//! Display-only hints

use super::lenient::{take_bool, take_string, take_value, to_map};
use crate::JsonMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	/// Legacy duplicate of `settings.helpText`
	#[serde(skip_serializing_if = "Option::is_none")]
	pub help_text: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub width: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub show_char_count: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hidden_in_forms: Option<bool>,
	#[serde(flatten)]
	pub extra: JsonMap,
}

impl UiOptions {
	pub fn from_map(raw: &JsonMap) -> Self {
		let mut bag = raw.clone();
		Self {
			placeholder: take_string(&mut bag, "placeholder"),
			help_text: take_string(&mut bag, "helpText"),
			width: take_value(&mut bag, "width"),
			show_char_count: take_bool(&mut bag, "showCharCount"),
			hidden_in_forms: take_bool(&mut bag, "hiddenInForms"),
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

	pub fn is_hidden(&self) -> bool {
		self.hidden_in_forms.unwrap_or(false)
	}
}

impl<'de> Deserialize<'de> for UiOptions {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Value::deserialize(deserializer)?;
		Ok(Self::from_value(&raw))
	}
}
