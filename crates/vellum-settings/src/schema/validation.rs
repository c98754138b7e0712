//! Validation section of a field's settings

use super::lenient::{take_bool, take_number, take_string, take_u64, to_map};
use crate::JsonMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Rules checked by the validation engine at submit time.
///
/// `required` duplicates [`FieldDefinition::required`](crate::FieldDefinition);
/// the field flag is authoritative and this copy is only read when a legacy
/// record carries no field-level flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSettings {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub required: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_length_enabled: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_length: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_length_enabled: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_length: Option<u64>,
	/// Regular expression the value must match
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pattern: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pattern_message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min: Option<Number>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max: Option<Number>,
	/// Predicate expression, e.g. `value.length >= 8`
	#[serde(skip_serializing_if = "Option::is_none")]
	pub custom_validation: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub custom_message: Option<String>,
	#[serde(flatten)]
	pub extra: JsonMap,
}

impl ValidationSettings {
	/// Builds the section from a raw bag, keeping unrecognized keys.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_settings::ValidationSettings;
	/// use serde_json::json;
	///
	/// let raw = json!({"minLengthEnabled": true, "minLength": "5", "legacyFlag": 1});
	/// let settings = ValidationSettings::from_map(raw.as_object().unwrap());
	///
	/// assert_eq!(settings.min_length_bound(), Some(5));
	/// assert_eq!(settings.extra["legacyFlag"], json!(1));
	/// ```
	pub fn from_map(raw: &JsonMap) -> Self {
		let mut bag = raw.clone();
		Self {
			required: take_bool(&mut bag, "required"),
			min_length_enabled: take_bool(&mut bag, "minLengthEnabled"),
			min_length: take_u64(&mut bag, "minLength"),
			max_length_enabled: take_bool(&mut bag, "maxLengthEnabled"),
			max_length: take_u64(&mut bag, "maxLength"),
			pattern: take_string(&mut bag, "pattern"),
			pattern_message: take_string(&mut bag, "patternMessage"),
			min: take_number(&mut bag, "min"),
			max: take_number(&mut bag, "max"),
			custom_validation: take_string(&mut bag, "customValidation"),
			custom_message: take_string(&mut bag, "customMessage"),
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

	/// Minimum length in characters, if the rule is active.
	///
	/// A bound applies unless its toggle is explicitly switched off.
	pub fn min_length_bound(&self) -> Option<usize> {
		if self.min_length_enabled == Some(false) {
			return None;
		}
		self.min_length.map(|n| n as usize)
	}

	/// Maximum length in characters, if the rule is active.
	pub fn max_length_bound(&self) -> Option<usize> {
		if self.max_length_enabled == Some(false) {
			return None;
		}
		self.max_length.map(|n| n as usize)
	}

	pub fn min_value(&self) -> Option<f64> {
		self.min.as_ref().and_then(Number::as_f64)
	}

	pub fn max_value(&self) -> Option<f64> {
		self.max.as_ref().and_then(Number::as_f64)
	}

	/// Pattern text, ignoring blank strings.
	pub fn active_pattern(&self) -> Option<&str> {
		self.pattern.as_deref().filter(|p| !p.trim().is_empty())
	}

	/// Custom predicate text, ignoring blank strings.
	pub fn active_custom_validation(&self) -> Option<&str> {
		self.custom_validation
			.as_deref()
			.filter(|p| !p.trim().is_empty())
	}
}

impl<'de> Deserialize<'de> for ValidationSettings {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Value::deserialize(deserializer)?;
		Ok(Self::from_value(&raw))
	}
}
