//! Collections, components, entries and new-field payloads

use serde::{Deserialize, Serialize};
use vellum_settings::{FieldSettings, FieldType, JsonMap, Section, derive_api_id};

/// A content type: a named list of fields whose entries are edited in the
/// admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
	pub id: String,
	pub name: String,
	pub api_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Holds exactly one entry, e.g. a site settings page
	#[serde(default)]
	pub singleton: bool,
}

impl Collection {
	/// New collection with an api id derived from `name`. The id is assigned
	/// by the store.
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			api_id: derive_api_id(&name),
			name,
			..Default::default()
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn singleton(mut self) -> Self {
		self.singleton = true;
		self
	}
}

/// A reusable group of fields embedded in collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
	pub id: String,
	pub name: String,
	pub api_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

impl Component {
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			api_id: derive_api_id(&name),
			name,
			..Default::default()
		}
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}
}

/// Submitted content of one collection entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
	pub id: String,
	pub collection_id: String,
	pub data: JsonMap,
}

/// Payload for creating a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewField {
	pub name: String,
	/// Derived from `name` when absent
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_id: Option<String>,
	#[serde(rename = "type")]
	pub field_type: FieldType,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub required: bool,
	pub settings: FieldSettings,
}

impl NewField {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			api_id: None,
			field_type,
			description: None,
			required: false,
			settings: FieldSettings::default(),
		}
	}

	pub fn with_api_id(mut self, api_id: impl Into<String>) -> Self {
		self.api_id = Some(api_id.into());
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Replaces one settings section from a raw JSON object.
	pub fn with_section(mut self, section: Section, raw: serde_json::Value) -> Self {
		let raw = raw.as_object().cloned().unwrap_or_default();
		self.settings.set_section_map(section, &raw);
		self
	}

	/// The api id this field will be created with.
	pub fn resolved_api_id(&self) -> String {
		match self.api_id.as_deref().map(str::trim) {
			Some(api_id) if !api_id.is_empty() => api_id.to_string(),
			_ => derive_api_id(&self.name),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_collection_defaults() {
		let collection = Collection::new("Blog Posts").with_description("All articles");

		assert_eq!(collection.api_id, "blog_posts");
		assert!(collection.id.is_empty());
		assert!(!collection.singleton);
	}

	#[rstest]
	fn test_collection_deserializes_sparse_records() {
		let collection: Collection =
			serde_json::from_value(json!({"id": "c1", "name": "Home", "api_id": "home"})).unwrap();

		assert_eq!(collection.description, None);
		assert!(!collection.singleton);
	}

	#[rstest]
	#[case(None, "seo_title")]
	#[case(Some("  "), "seo_title")]
	#[case(Some("meta_title"), "meta_title")]
	fn test_resolved_api_id(#[case] explicit: Option<&str>, #[case] expected: &str) {
		let mut field = NewField::new("SEO Title", FieldType::Text);
		field.api_id = explicit.map(str::to_string);

		assert_eq!(field.resolved_api_id(), expected);
	}
}
