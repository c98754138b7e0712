//! Closed set of field type tags

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Type tag of a content field.
///
/// Every known tag maps to one variant; anything else is kept verbatim in
/// [`FieldType::Unknown`] so a form can still be rendered around it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FieldType {
	#[default]
	Text,
	Textarea,
	Number,
	Boolean,
	Select,
	Date,
	Password,
	Mask,
	Otp,
	Autocomplete,
	RichText,
	RichTextBlocks,
	Markdown,
	Tags,
	Slug,
	Color,
	RadioCards,
	CheckboxCards,
	File,
	Files,
	Json,
	Rating,
	Slider,
	Hash,
	Icon,
	Listbox,
	Tree,
	InlineRepeater,
	Divider,
	Header,
	DetailGroup,
	RawGroup,
	CollectionItem,
	/// Tag outside the closed set, kept as written
	Unknown(String),
}

impl FieldType {
	/// Every known variant, in declaration order.
	pub const KNOWN: [FieldType; 33] = [
		FieldType::Text,
		FieldType::Textarea,
		FieldType::Number,
		FieldType::Boolean,
		FieldType::Select,
		FieldType::Date,
		FieldType::Password,
		FieldType::Mask,
		FieldType::Otp,
		FieldType::Autocomplete,
		FieldType::RichText,
		FieldType::RichTextBlocks,
		FieldType::Markdown,
		FieldType::Tags,
		FieldType::Slug,
		FieldType::Color,
		FieldType::RadioCards,
		FieldType::CheckboxCards,
		FieldType::File,
		FieldType::Files,
		FieldType::Json,
		FieldType::Rating,
		FieldType::Slider,
		FieldType::Hash,
		FieldType::Icon,
		FieldType::Listbox,
		FieldType::Tree,
		FieldType::InlineRepeater,
		FieldType::Divider,
		FieldType::Header,
		FieldType::DetailGroup,
		FieldType::RawGroup,
		FieldType::CollectionItem,
	];

	/// Parses a type tag, case-insensitively.
	///
	/// Underscores and hyphens are interchangeable and a handful of common
	/// aliases are accepted.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_settings::FieldType;
	///
	/// assert_eq!(FieldType::from_tag("TEXT"), FieldType::Text);
	/// assert_eq!(FieldType::from_tag("radio_cards"), FieldType::RadioCards);
	/// assert_eq!(FieldType::from_tag("toggle"), FieldType::Boolean);
	/// assert_eq!(
	///     FieldType::from_tag("totally-unknown"),
	///     FieldType::Unknown("totally-unknown".to_string())
	/// );
	/// ```
	pub fn from_tag(tag: &str) -> Self {
		let trimmed = tag.trim();
		let normalized = trimmed.to_lowercase().replace('_', "-");
		match normalized.as_str() {
			"text" | "string" | "input" => FieldType::Text,
			"textarea" | "text-area" => FieldType::Textarea,
			"number" | "integer" | "decimal" | "float" => FieldType::Number,
			"boolean" | "bool" | "toggle" | "switch" => FieldType::Boolean,
			"select" | "dropdown" => FieldType::Select,
			"date" | "datetime" | "calendar" => FieldType::Date,
			"password" => FieldType::Password,
			"mask" | "input-mask" => FieldType::Mask,
			"otp" | "input-otp" => FieldType::Otp,
			"autocomplete" => FieldType::Autocomplete,
			"richtext" | "rich-text" | "editor" => FieldType::RichText,
			"richtext-blocks" | "rich-text-blocks" | "blocks" => FieldType::RichTextBlocks,
			"markdown" => FieldType::Markdown,
			"tags" | "chips" => FieldType::Tags,
			"slug" => FieldType::Slug,
			"color" | "colour" | "color-picker" => FieldType::Color,
			"radio-cards" | "radio" => FieldType::RadioCards,
			"checkbox-cards" | "checkbox" => FieldType::CheckboxCards,
			"file" | "media" => FieldType::File,
			"files" | "multi-file" => FieldType::Files,
			"json" => FieldType::Json,
			"rating" => FieldType::Rating,
			"slider" | "range" => FieldType::Slider,
			"hash" => FieldType::Hash,
			"icon" => FieldType::Icon,
			"listbox" => FieldType::Listbox,
			"tree" | "tree-select" => FieldType::Tree,
			"inline-repeater" | "repeater" => FieldType::InlineRepeater,
			"divider" => FieldType::Divider,
			"header" | "heading" => FieldType::Header,
			"detail-group" => FieldType::DetailGroup,
			"raw-group" => FieldType::RawGroup,
			"collection-item" | "relation" => FieldType::CollectionItem,
			_ => FieldType::Unknown(trimmed.to_string()),
		}
	}

	/// Canonical tag written back to records.
	pub fn as_str(&self) -> &str {
		match self {
			FieldType::Text => "text",
			FieldType::Textarea => "textarea",
			FieldType::Number => "number",
			FieldType::Boolean => "boolean",
			FieldType::Select => "select",
			FieldType::Date => "date",
			FieldType::Password => "password",
			FieldType::Mask => "mask",
			FieldType::Otp => "otp",
			FieldType::Autocomplete => "autocomplete",
			FieldType::RichText => "richtext",
			FieldType::RichTextBlocks => "richtext-blocks",
			FieldType::Markdown => "markdown",
			FieldType::Tags => "tags",
			FieldType::Slug => "slug",
			FieldType::Color => "color",
			FieldType::RadioCards => "radio-cards",
			FieldType::CheckboxCards => "checkbox-cards",
			FieldType::File => "file",
			FieldType::Files => "files",
			FieldType::Json => "json",
			FieldType::Rating => "rating",
			FieldType::Slider => "slider",
			FieldType::Hash => "hash",
			FieldType::Icon => "icon",
			FieldType::Listbox => "listbox",
			FieldType::Tree => "tree",
			FieldType::InlineRepeater => "inline-repeater",
			FieldType::Divider => "divider",
			FieldType::Header => "header",
			FieldType::DetailGroup => "detail-group",
			FieldType::RawGroup => "raw-group",
			FieldType::CollectionItem => "collection-item",
			FieldType::Unknown(tag) => tag,
		}
	}

	pub fn is_known(&self) -> bool {
		!matches!(self, FieldType::Unknown(_))
	}

	/// Layout-only pseudo-fields that carry no data.
	pub fn is_structural(&self) -> bool {
		matches!(
			self,
			FieldType::Divider | FieldType::Header | FieldType::DetailGroup | FieldType::RawGroup
		)
	}

	/// Whether the field carries a value that is collected and validated.
	pub fn is_data(&self) -> bool {
		self.is_known() && !self.is_structural()
	}

	pub fn is_numeric(&self) -> bool {
		matches!(
			self,
			FieldType::Number | FieldType::Rating | FieldType::Slider
		)
	}

	/// Types whose value is a list.
	pub fn is_multi_valued(&self) -> bool {
		matches!(
			self,
			FieldType::Tags
				| FieldType::CheckboxCards
				| FieldType::Files | FieldType::Listbox
				| FieldType::Tree | FieldType::InlineRepeater
		)
	}

	/// Value a fresh form state starts with: `null` for numeric fields and
	/// an empty string otherwise.
	pub fn initial_value(&self) -> Value {
		if self.is_numeric() {
			Value::Null
		} else {
			Value::String(String::new())
		}
	}

	/// Empty value handed to a widget that has no current value.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_settings::FieldType;
	/// use serde_json::json;
	///
	/// assert_eq!(FieldType::Number.empty_value(), json!(null));
	/// assert_eq!(FieldType::Tags.empty_value(), json!([]));
	/// assert_eq!(FieldType::Json.empty_value(), json!({}));
	/// assert_eq!(FieldType::Text.empty_value(), json!(""));
	/// ```
	pub fn empty_value(&self) -> Value {
		if self.is_numeric() {
			Value::Null
		} else if self.is_multi_valued() {
			Value::Array(Vec::new())
		} else if matches!(self, FieldType::Json) {
			Value::Object(Map::new())
		} else if matches!(self, FieldType::Boolean) {
			Value::Bool(false)
		} else {
			Value::String(String::new())
		}
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<&str> for FieldType {
	fn from(tag: &str) -> Self {
		FieldType::from_tag(tag)
	}
}

impl Serialize for FieldType {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for FieldType {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let tag = String::deserialize(deserializer)?;
		Ok(FieldType::from_tag(&tag))
	}
}
