//! Field-type normalizer
//!
//! Fills the per-type defaults into a field's advanced settings bag. Only
//! absent keys are filled: an explicit `false`, `0` or `null` is a value the
//! editor chose and is never replaced.

use crate::JsonMap;
use crate::field_type::FieldType;
use serde_json::{Value, json};

/// Default settings for one field type.
///
/// Structural and unknown types have none.
pub fn type_defaults(field_type: &FieldType) -> JsonMap {
	let defaults = match field_type {
		FieldType::Text => json!({"inputType": "text", "trim": true}),
		FieldType::Textarea => json!({"rows": 5, "autoResize": false}),
		FieldType::Number => json!({
			"mode": "decimal",
			"minFractionDigits": 0,
			"maxFractionDigits": 2,
			"useGrouping": true,
			"showButtons": false,
			"buttonLayout": "stacked",
			"step": 1
		}),
		FieldType::Boolean => json!({"style": "checkbox"}),
		FieldType::Password => json!({"feedback": true, "toggleMask": true}),
		FieldType::Mask => json!({"mask": "", "slotChar": "_", "autoClear": true}),
		FieldType::Otp => json!({"length": 4, "integerOnly": true}),
		FieldType::Date => json!({"dateFormat": "yy-mm-dd", "showTime": false, "showIcon": true}),
		FieldType::Select => json!({"options": [], "filter": false, "multiple": false}),
		FieldType::Listbox => json!({"options": [], "filter": false, "multiple": true}),
		FieldType::Autocomplete => json!({"options": [], "minQueryLength": 1, "dropdown": true}),
		FieldType::RadioCards | FieldType::CheckboxCards => json!({"options": [], "columns": 2}),
		FieldType::Tags => json!({"maxTags": 10, "separator": ",", "allowDuplicates": false}),
		FieldType::Slug => json!({"sourceField": "", "separator": "-"}),
		FieldType::Color => json!({"format": "hex"}),
		FieldType::File => json!({"accept": "*/*", "maxFileSize": 10_485_760, "multiple": false}),
		FieldType::Files => json!({
			"accept": "*/*",
			"maxFileSize": 10_485_760,
			"multiple": true,
			"maxFiles": 10
		}),
		FieldType::Json => json!({"indent": 2}),
		FieldType::Rating => json!({"stars": 5, "cancel": true}),
		FieldType::Slider => json!({"min": 0, "max": 100, "step": 1}),
		FieldType::Hash => json!({"algorithm": "sha256"}),
		FieldType::RichText | FieldType::RichTextBlocks | FieldType::Markdown => {
			json!({"height": "320px", "toolbar": "standard"})
		}
		FieldType::Icon => json!({"iconSet": "default"}),
		FieldType::Tree => json!({"selectionMode": "single"}),
		FieldType::InlineRepeater => json!({"minItems": 0, "maxItems": 20}),
		FieldType::CollectionItem => json!({"collection": "", "multiple": false}),
		FieldType::Divider
		| FieldType::Header
		| FieldType::DetailGroup
		| FieldType::RawGroup
		| FieldType::Unknown(_) => Value::Null,
	};
	match defaults {
		Value::Object(map) => map,
		_ => JsonMap::new(),
	}
}

/// Returns `raw` with the defaults of the field type `type_tag` filled in.
///
/// The tag is matched case-insensitively. Unknown tags return the input
/// unchanged. Applying the function twice gives the same result as applying
/// it once.
///
/// # Examples
///
/// ```
/// use vellum_settings::normalize_for_type;
/// use serde_json::json;
///
/// let raw = json!({"step": 0.5, "showButtons": null}).as_object().unwrap().clone();
/// let settings = normalize_for_type("Number", &raw);
///
/// assert_eq!(settings["step"], json!(0.5));
/// assert_eq!(settings["showButtons"], json!(null));
/// assert_eq!(settings["mode"], json!("decimal"));
/// ```
pub fn normalize_for_type(type_tag: &str, raw: &JsonMap) -> JsonMap {
	let mut out = raw.clone();
	for (key, value) in type_defaults(&FieldType::from_tag(type_tag)) {
		out.entry(key).or_insert(value);
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("text", "inputType", json!("text"))]
	#[case("textarea", "rows", json!(5))]
	#[case("otp", "length", json!(4))]
	#[case("listbox", "multiple", json!(true))]
	#[case("select", "multiple", json!(false))]
	#[case("files", "maxFiles", json!(10))]
	#[case("markdown", "toolbar", json!("standard"))]
	#[case("collection-item", "collection", json!(""))]
	fn test_defaults_are_filled(#[case] tag: &str, #[case] key: &str, #[case] expected: Value) {
		let settings = normalize_for_type(tag, &JsonMap::new());

		assert_eq!(settings[key], expected);
	}

	#[rstest]
	fn test_explicit_falsy_values_survive() {
		// Arrange
		let raw = json!({"trim": false, "inputType": null}).as_object().cloned().unwrap();

		// Act
		let settings = normalize_for_type("text", &raw);

		// Assert
		assert_eq!(settings["trim"], json!(false));
		assert_eq!(settings["inputType"], json!(null));
	}

	#[rstest]
	#[case("divider")]
	#[case("header")]
	#[case("sparkline")]
	fn test_types_without_defaults_pass_through(#[case] tag: &str) {
		let raw = json!({"anything": [1, 2]}).as_object().cloned().unwrap();

		assert_eq!(normalize_for_type(tag, &raw), raw);
	}

	#[rstest]
	fn test_tag_matching_ignores_case() {
		assert_eq!(
			normalize_for_type("RICHTEXT", &JsonMap::new()),
			type_defaults(&FieldType::RichText)
		);
	}

	#[rstest]
	fn test_every_data_type_has_defaults() {
		for field_type in FieldType::KNOWN.iter().filter(|t| !t.is_structural()) {
			assert!(!type_defaults(field_type).is_empty(), "{field_type}");
		}
	}
}
