//! Typed settings schema
//!
//! Every section follows the same layout: the keys the engine understands are
//! typed fields, everything else lands in a flattened `extra` bag and is
//! written back untouched.

mod advanced;
mod appearance;
pub(crate) mod lenient;
mod ui_options;
mod validation;

pub use advanced::{AdvancedSettings, ConditionalRule};
pub use appearance::{
	AppearanceOverride, AppearanceSettings, Breakpoint, ColorRoles, ResponsiveOverrides, UiVariant,
};
pub use ui_options::UiOptions;
pub use validation::ValidationSettings;

use crate::JsonMap;
use crate::error::SettingsError;
use lenient::{take_object, take_string};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One of the four named settings groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
	Validation,
	Appearance,
	Advanced,
	UiOptions,
}

impl Section {
	pub const ALL: [Section; 4] = [
		Section::Validation,
		Section::Appearance,
		Section::Advanced,
		Section::UiOptions,
	];

	/// Key of the section in a persisted record.
	pub fn as_str(&self) -> &'static str {
		match self {
			Section::Validation => "validation",
			Section::Appearance => "appearance",
			Section::Advanced => "advanced",
			Section::UiOptions => "ui_options",
		}
	}
}

impl fmt::Display for Section {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Section {
	type Err = SettingsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"validation" => Ok(Section::Validation),
			"appearance" => Ok(Section::Appearance),
			"advanced" => Ok(Section::Advanced),
			"ui_options" | "uiOptions" => Ok(Section::UiOptions),
			other => Err(SettingsError::UnknownSection(other.to_string())),
		}
	}
}

/// The `settings` object of a field record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldSettings {
	#[serde(skip_serializing_if = "ValidationSettings::is_empty")]
	pub validation: ValidationSettings,
	#[serde(skip_serializing_if = "AppearanceSettings::is_empty")]
	pub appearance: AppearanceSettings,
	#[serde(skip_serializing_if = "AdvancedSettings::is_empty")]
	pub advanced: AdvancedSettings,
	#[serde(skip_serializing_if = "UiOptions::is_empty")]
	pub ui_options: UiOptions,
	#[serde(rename = "helpText", skip_serializing_if = "Option::is_none")]
	pub help_text: Option<String>,
	#[serde(flatten)]
	pub extra: JsonMap,
}

impl FieldSettings {
	/// Builds settings from a raw `settings` object.
	///
	/// Section values that are not objects are kept in `extra` rather than
	/// discarded.
	pub fn from_map(raw: &JsonMap) -> Self {
		let mut bag = raw.clone();
		let mut section = |key: &str| take_object(&mut bag, key).unwrap_or_default();
		let validation = ValidationSettings::from_map(&section("validation"));
		let appearance = AppearanceSettings::from_map(&section("appearance"));
		let advanced = AdvancedSettings::from_map(&section("advanced"));
		let ui_options = UiOptions::from_map(&section("ui_options"));
		let help_text = take_string(&mut bag, "helpText");
		Self {
			validation,
			appearance,
			advanced,
			ui_options,
			help_text,
			extra: bag,
		}
	}

	pub fn from_value(raw: &Value) -> Self {
		raw.as_object().map(Self::from_map).unwrap_or_default()
	}

	pub fn to_map(&self) -> JsonMap {
		lenient::to_map(self)
	}

	/// Raw view of one section.
	pub fn section_map(&self, section: Section) -> JsonMap {
		match section {
			Section::Validation => self.validation.to_map(),
			Section::Appearance => self.appearance.to_map(),
			Section::Advanced => self.advanced.to_map(),
			Section::UiOptions => self.ui_options.to_map(),
		}
	}

	/// Replaces one section with the parsed form of `raw`.
	///
	/// A non-object value kept in `extra` under the same name is dropped so
	/// the typed section is the only one serialized.
	pub fn set_section_map(&mut self, section: Section, raw: &JsonMap) {
		self.extra.remove(section.as_str());
		match section {
			Section::Validation => self.validation = ValidationSettings::from_map(raw),
			Section::Appearance => self.appearance = AppearanceSettings::from_map(raw),
			Section::Advanced => self.advanced = AdvancedSettings::from_map(raw),
			Section::UiOptions => self.ui_options = UiOptions::from_map(raw),
		}
	}

	/// Help text, preferring the top-level entry over the `ui_options` copy.
	pub fn effective_help_text(&self) -> Option<&str> {
		self.help_text
			.as_deref()
			.or(self.ui_options.help_text.as_deref())
			.filter(|t| !t.trim().is_empty())
	}
}

impl<'de> Deserialize<'de> for FieldSettings {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Value::deserialize(deserializer)?;
		Ok(Self::from_value(&raw))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_section_names_parse_back() {
		for section in Section::ALL {
			assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
		}
		assert_eq!("uiOptions".parse::<Section>().unwrap(), Section::UiOptions);
		assert!("layout".parse::<Section>().is_err());
	}

	#[rstest]
	fn test_field_settings_round_trip() {
		// Arrange
		let raw = json!({
			"validation": {"required": true},
			"appearance": {"uiVariant": "pill"},
			"advanced": {"prefix": "$"},
			"ui_options": {"placeholder": "Type here"},
			"helpText": "Shown below the field",
			"revision": 3
		});

		// Act
		let settings = FieldSettings::from_value(&raw);

		// Assert
		assert_eq!(Value::Object(settings.to_map()), raw);
		assert_eq!(settings.effective_help_text(), Some("Shown below the field"));
	}

	#[rstest]
	fn test_non_object_section_is_preserved() {
		let raw = json!({"validation": "legacy-string"});

		let settings = FieldSettings::from_value(&raw);

		assert!(settings.validation.is_empty());
		assert_eq!(settings.extra["validation"], json!("legacy-string"));
	}

	#[rstest]
	fn test_setting_a_section_replaces_non_object_value() {
		let mut settings = FieldSettings::from_value(&json!({"validation": "legacy-string"}));

		settings.set_section_map(Section::Validation, json!({"minLength": 3}).as_object().unwrap());

		assert!(!settings.extra.contains_key("validation"));
		assert_eq!(
			Value::Object(settings.to_map()),
			json!({"validation": {"minLength": 3}})
		);
	}

	#[rstest]
	fn test_empty_sections_are_omitted() {
		let settings = FieldSettings::default();

		assert_eq!(Value::Object(settings.to_map()), json!({}));
	}

	#[rstest]
	fn test_help_text_falls_back_to_ui_options() {
		let settings = FieldSettings::from_value(&json!({"ui_options": {"helpText": "hint"}}));

		assert_eq!(settings.effective_help_text(), Some("hint"));
	}
}
