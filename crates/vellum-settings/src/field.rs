//! Field definitions as stored and as edited

use crate::api_id::derive_api_id;
use crate::error::SettingsResult;
use crate::field_type::FieldType;
use crate::normalizer::migrate_record;
use crate::schema::{
	AdvancedSettings, AppearanceSettings, FieldSettings, Section, UiOptions, ValidationSettings,
};
use crate::typed::normalize_for_type;
use crate::JsonMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One configurable content field of a collection or component.
///
/// Serializes to the persisted wire shape:
/// `{ id, name, api_id, type, collection_id, description, required, sort_order, settings }`.
/// Deserialization accepts any record shape and goes through
/// [`migrate_record`], so flat legacy sections end up under `settings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldDefinition {
	pub id: String,
	pub name: String,
	pub api_id: String,
	#[serde(rename = "type")]
	pub field_type: FieldType,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub collection_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub required: bool,
	pub sort_order: i64,
	pub settings: FieldSettings,
}

impl FieldDefinition {
	/// Create a new field; the api id is derived from `name`.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_settings::{FieldDefinition, FieldType};
	///
	/// let field = FieldDefinition::new("f1", "Hero Title", FieldType::Text);
	/// assert_eq!(field.api_id, "hero_title");
	/// assert!(!field.required);
	/// ```
	pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
		let name = name.into();
		Self {
			id: id.into(),
			api_id: derive_api_id(&name),
			name,
			field_type,
			..Default::default()
		}
	}

	/// Overrides the derived api id.
	pub fn with_api_id(mut self, api_id: impl Into<String>) -> Self {
		self.api_id = api_id.into();
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_collection(mut self, collection_id: impl Into<String>) -> Self {
		self.collection_id = Some(collection_id.into());
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_sort_order(mut self, sort_order: i64) -> Self {
		self.sort_order = sort_order;
		self
	}

	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.settings.help_text = Some(help_text.into());
		self
	}

	pub fn with_validation(mut self, validation: ValidationSettings) -> Self {
		self.settings.validation = validation;
		self
	}

	pub fn with_appearance(mut self, appearance: AppearanceSettings) -> Self {
		self.settings.appearance = appearance;
		self
	}

	pub fn with_advanced(mut self, advanced: AdvancedSettings) -> Self {
		self.settings.advanced = advanced;
		self
	}

	pub fn with_ui_options(mut self, ui_options: UiOptions) -> Self {
		self.settings.ui_options = ui_options;
		self
	}

	/// Replaces one section from a raw JSON bag.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_settings::{FieldDefinition, FieldType, Section};
	/// use serde_json::json;
	///
	/// let field = FieldDefinition::new("f1", "Summary", FieldType::Text)
	///     .with_section(Section::Validation, json!({"minLength": 5}));
	/// assert_eq!(field.settings.validation.min_length, Some(5));
	/// ```
	pub fn with_section(mut self, section: Section, raw: Value) -> Self {
		let raw = raw.as_object().cloned().unwrap_or_default();
		self.settings.set_section_map(section, &raw);
		self
	}

	/// Key under which this field's value and errors are stored: the api id,
	/// or the opaque id when the api id is blank.
	pub fn key(&self) -> &str {
		if self.api_id.is_empty() {
			&self.id
		} else {
			&self.api_id
		}
	}

	/// Whether the field must be filled in. The field-level flag is the single
	/// source of truth.
	pub fn is_required(&self) -> bool {
		self.required
	}

	pub fn help_text(&self) -> Option<&str> {
		self.settings.effective_help_text()
	}

	/// Advanced settings with the per-type defaults filled in.
	pub fn typed_settings(&self) -> JsonMap {
		normalize_for_type(
			self.field_type.as_str(),
			&self.settings.section_map(Section::Advanced),
		)
	}

	/// Parses a record from JSON text.
	///
	/// Only malformed JSON is an error; any well-formed value is migrated.
	pub fn from_json_str(text: &str) -> SettingsResult<Self> {
		let raw: Value = serde_json::from_str(text)?;
		Ok(migrate_record(&raw))
	}

	/// Wire representation of the field.
	pub fn to_record(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}
}

impl<'de> Deserialize<'de> for FieldDefinition {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Value::deserialize(deserializer)?;
		Ok(migrate_record(&raw))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_to_record_uses_wire_shape() {
		// Arrange
		let field = FieldDefinition::new("f-1", "Price", FieldType::Number)
			.with_collection("products")
			.required()
			.with_sort_order(2)
			.with_section(Section::Advanced, json!({"currency": "EUR"}));

		// Act
		let record = field.to_record();

		// Assert
		assert_eq!(
			record,
			json!({
				"id": "f-1",
				"name": "Price",
				"api_id": "price",
				"type": "number",
				"collection_id": "products",
				"required": true,
				"sort_order": 2,
				"settings": {"advanced": {"currency": "EUR"}}
			})
		);
	}

	#[rstest]
	fn test_record_round_trip() {
		let field = FieldDefinition::new("f-2", "Body", FieldType::RichText)
			.with_help_text("Main copy")
			.with_section(Section::Appearance, json!({"uiVariant": "material"}));

		let back: FieldDefinition = serde_json::from_value(field.to_record()).unwrap();

		assert_eq!(back, field);
	}

	#[rstest]
	fn test_key_falls_back_to_id() {
		let field = FieldDefinition::new("f-3", "Title", FieldType::Text).with_api_id("");

		assert_eq!(field.key(), "f-3");
	}

	#[rstest]
	fn test_typed_settings_fill_defaults() {
		let field = FieldDefinition::new("f-4", "Tags", FieldType::Tags)
			.with_section(Section::Advanced, json!({"maxTags": 3}));

		let typed = field.typed_settings();

		assert_eq!(typed["maxTags"], json!(3));
		assert_eq!(typed["separator"], json!(","));
	}

	#[rstest]
	fn test_from_json_str_rejects_malformed_text() {
		assert!(FieldDefinition::from_json_str("{not json").is_err());
		assert!(FieldDefinition::from_json_str("42").is_ok());
	}
}
