//! Settings normalizer
//!
//! Field records reach this crate in two shapes:
//!
//! - **Nested**: sections live under `settings.<section>` (canonical)
//! - **Flat**: legacy records carry the sections at the top level
//!
//! Reads accept both. Writes target the nested location; the raw-record
//! variant [`merge_record_section`] can still keep an existing top-level copy
//! in sync for stores that have not been migrated yet.

use crate::JsonMap;
use crate::api_id::derive_api_id;
use crate::field::FieldDefinition;
use crate::field_type::FieldType;
use crate::merge::{deep_merge, merged};
use crate::schema::lenient::{take_bool, take_object, take_string};
use crate::schema::{FieldSettings, Section};
use serde_json::Value;
use tracing::trace;

const SETTINGS_KEY: &str = "settings";
const HELP_TEXT_KEY: &str = "helpText";

/// Keys a section may appear under at the top level of a legacy record.
fn legacy_keys(section: Section) -> &'static [&'static str] {
	match section {
		Section::UiOptions => &["ui_options", "uiOptions"],
		Section::Validation => &["validation"],
		Section::Appearance => &["appearance"],
		Section::Advanced => &["advanced"],
	}
}

fn flat_section(record: &JsonMap, section: Section) -> Option<&JsonMap> {
	legacy_keys(section)
		.iter()
		.find_map(|key| record.get(*key).and_then(Value::as_object))
}

fn nested_section(record: &JsonMap, section: Section) -> Option<&JsonMap> {
	record
		.get(SETTINGS_KEY)
		.and_then(Value::as_object)
		.and_then(|settings| settings.get(section.as_str()))
		.and_then(Value::as_object)
}

/// Reads one settings section from a record of either shape.
///
/// The top-level location wins, then `settings.<section>`; a record carrying
/// neither yields an empty map. Any JSON value is accepted.
///
/// # Examples
///
/// ```
/// use vellum_settings::{Section, read_section};
/// use serde_json::json;
///
/// let nested = json!({"settings": {"validation": {"minLength": 3}}});
/// assert_eq!(read_section(&nested, Section::Validation)["minLength"], json!(3));
///
/// assert!(read_section(&json!("not a record"), Section::Advanced).is_empty());
/// ```
pub fn read_section(record: &Value, section: Section) -> JsonMap {
	let Some(record) = record.as_object() else {
		return JsonMap::new();
	};
	flat_section(record, section)
		.or_else(|| nested_section(record, section))
		.cloned()
		.unwrap_or_default()
}

/// Reads the help text of a record: `settings.helpText`, then a top-level
/// `helpText`, then the copy inside `ui_options`. Blank strings are ignored.
pub fn read_help_text(record: &Value) -> Option<String> {
	let record = record.as_object()?;
	let non_blank = |v: Option<&Value>| {
		v.and_then(Value::as_str)
			.filter(|s| !s.trim().is_empty())
			.map(str::to_string)
	};
	let settings = record.get(SETTINGS_KEY).and_then(Value::as_object);
	non_blank(settings.and_then(|s| s.get(HELP_TEXT_KEY)))
		.or_else(|| non_blank(record.get(HELP_TEXT_KEY)))
		.or_else(|| {
			let ui = flat_section(record, Section::UiOptions)
				.or_else(|| nested_section(record, Section::UiOptions));
			non_blank(ui.and_then(|u| u.get(HELP_TEXT_KEY)))
		})
}

/// Deep-merges `patch` into one section of a field, returning the new field.
///
/// The input is left untouched. Patch values win on leaf conflicts and
/// nested objects merge recursively.
pub fn merge_section(field: &FieldDefinition, section: Section, patch: &JsonMap) -> FieldDefinition {
	let mut next = field.clone();
	let current = next.settings.section_map(section);
	next.settings
		.set_section_map(section, &merged(&current, patch));
	next
}

/// Merges `patch` into a section of a raw, possibly unmigrated record.
///
/// The nested location is always written. With `dual_write` on, each
/// location is merged with `patch` on its own: the nested copy keeps its
/// own keys, and a top-level copy that already exists is updated in place.
/// With it off, a top-level copy is folded into the nested one (nested
/// leaves win) and then removed.
///
/// # Examples
///
/// ```
/// use vellum_settings::{Section, merge_record_section};
/// use serde_json::json;
///
/// let record = json!({"validation": {"required": true}});
/// let patch = json!({"minLength": 2}).as_object().unwrap().clone();
///
/// let updated = merge_record_section(&record, Section::Validation, &patch, false);
/// assert_eq!(
///     updated,
///     json!({"settings": {"validation": {"required": true, "minLength": 2}}})
/// );
/// ```
pub fn merge_record_section(
	record: &Value,
	section: Section,
	patch: &JsonMap,
	dual_write: bool,
) -> Value {
	let mut out = record.as_object().cloned().unwrap_or_default();
	let flat_key = legacy_keys(section)
		.iter()
		.copied()
		.find(|key| out.get(*key).is_some_and(Value::is_object));

	let next = if dual_write {
		let nested = nested_section(&out, section).cloned().unwrap_or_default();
		if let Some(key) = flat_key {
			let flat = flat_section(&out, section).cloned().unwrap_or_default();
			out.insert(key.to_string(), Value::Object(merged(&flat, patch)));
		}
		merged(&nested, patch)
	} else {
		let mut current = flat_section(&out, section).cloned().unwrap_or_default();
		if let Some(nested) = nested_section(&out, section) {
			deep_merge(&mut current, nested);
		}
		deep_merge(&mut current, patch);
		if let Some(key) = flat_key {
			out.remove(key);
		}
		current
	};

	let settings = out
		.entry(SETTINGS_KEY)
		.or_insert_with(|| Value::Object(JsonMap::new()));
	if !settings.is_object() {
		*settings = Value::Object(JsonMap::new());
	}
	if let Value::Object(settings) = settings {
		settings.insert(section.as_str().to_string(), Value::Object(next));
	}
	Value::Object(out)
}

/// Builds the body of a section update: exactly
/// `{"settings": {<section>: patch}}`.
///
/// The receiving store performs the deep merge; nothing is read back from
/// remote state here.
pub fn build_update_payload(section: Section, patch: &JsonMap) -> Value {
	let mut sections = JsonMap::new();
	sections.insert(section.as_str().to_string(), Value::Object(patch.clone()));
	let mut payload = JsonMap::new();
	payload.insert(SETTINGS_KEY.to_string(), Value::Object(sections));
	Value::Object(payload)
}

fn take_id(bag: &mut JsonMap, key: &str) -> Option<String> {
	match bag.remove(key)? {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		other => {
			bag.insert(key.to_string(), other);
			None
		}
	}
}

fn take_i64(bag: &mut JsonMap, key: &str) -> Option<i64> {
	let parsed = match bag.get(key)? {
		Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	};
	if parsed.is_some() {
		bag.remove(key);
	}
	parsed
}

fn take_either<T>(
	bag: &mut JsonMap,
	keys: [&str; 2],
	take: impl Fn(&mut JsonMap, &str) -> Option<T>,
) -> Option<T> {
	let [snake, camel] = keys;
	take(bag, snake).or_else(|| take(bag, camel))
}

/// Reads a field record of any shape into a canonical [`FieldDefinition`].
///
/// Flat sections are folded into `settings.<section>`; where both copies set
/// the same leaf, the nested value is kept. A top-level `helpText` is only
/// used when the settings carry none. The field-level `required` flag wins
/// over `validation.required`, which is consulted only when the record has
/// no usable field-level flag. Missing api ids are derived from the name.
///
/// Never fails: anything that is not a JSON object migrates to a default
/// field.
///
/// # Examples
///
/// ```
/// use vellum_settings::{FieldType, migrate_record};
/// use serde_json::json;
///
/// let field = migrate_record(&json!({
///     "id": "f1",
///     "name": "Price",
///     "type": "number",
///     "validation": {"min": 0, "required": true},
///     "settings": {"validation": {"min": 1}}
/// }));
///
/// assert_eq!(field.field_type, FieldType::Number);
/// assert_eq!(field.api_id, "price");
/// assert!(field.required);
/// assert_eq!(field.settings.validation.min_value(), Some(1.0));
/// ```
pub fn migrate_record(record: &Value) -> FieldDefinition {
	let mut bag = record.as_object().cloned().unwrap_or_default();

	let mut settings = match bag.remove(SETTINGS_KEY) {
		Some(Value::Object(settings)) => settings,
		_ => JsonMap::new(),
	};
	for section in Section::ALL {
		let flat = legacy_keys(section)
			.iter()
			.find_map(|key| take_object(&mut bag, key));
		let Some(mut folded) = flat else {
			continue;
		};
		trace!(section = section.as_str(), "Folding top-level legacy section");
		if let Some(Value::Object(nested)) = settings.get(section.as_str()) {
			deep_merge(&mut folded, nested);
		}
		settings.insert(section.as_str().to_string(), Value::Object(folded));
	}
	let has_help_text = settings
		.get(HELP_TEXT_KEY)
		.and_then(Value::as_str)
		.is_some_and(|s| !s.trim().is_empty());
	if !has_help_text && let Some(help_text) = take_string(&mut bag, HELP_TEXT_KEY) {
		settings.insert(HELP_TEXT_KEY.to_string(), Value::String(help_text));
	}
	let settings = FieldSettings::from_map(&settings);

	let name = take_string(&mut bag, "name").unwrap_or_default();
	let api_id = take_either(&mut bag, ["api_id", "apiId"], take_string)
		.unwrap_or_else(|| derive_api_id(&name));
	let field_type = take_string(&mut bag, "type")
		.or_else(|| take_either(&mut bag, ["field_type", "fieldType"], take_string))
		.map(|tag| FieldType::from_tag(&tag))
		.unwrap_or_default();
	if !field_type.is_known() {
		trace!(field_type = field_type.as_str(), "Migrating field of unknown type");
	}
	let required = take_bool(&mut bag, "required")
		.or(settings.validation.required)
		.unwrap_or(false);

	FieldDefinition {
		id: take_id(&mut bag, "id").unwrap_or_default(),
		api_id,
		name,
		field_type,
		collection_id: take_either(&mut bag, ["collection_id", "collectionId"], take_id),
		description: take_string(&mut bag, "description"),
		required,
		sort_order: take_either(&mut bag, ["sort_order", "sortOrder"], take_i64).unwrap_or(0),
		settings,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn map(value: Value) -> JsonMap {
		value.as_object().cloned().unwrap()
	}

	#[rstest]
	fn test_read_section_prefers_top_level() {
		// Arrange
		let record = json!({
			"appearance": {"uiVariant": "pill"},
			"settings": {"appearance": {"uiVariant": "material"}}
		});

		// Act
		let section = read_section(&record, Section::Appearance);

		// Assert
		assert_eq!(section, map(json!({"uiVariant": "pill"})));
	}

	#[rstest]
	fn test_read_section_accepts_camel_case_ui_options() {
		let record = json!({"uiOptions": {"placeholder": "Name"}});

		let section = read_section(&record, Section::UiOptions);

		assert_eq!(section["placeholder"], json!("Name"));
	}

	#[rstest]
	#[case(json!(null))]
	#[case(json!([1, 2]))]
	#[case(json!({"settings": "broken"}))]
	#[case(json!({"validation": 7}))]
	fn test_read_section_is_total(#[case] record: Value) {
		assert!(read_section(&record, Section::Validation).is_empty());
	}

	#[rstest]
	fn test_read_help_text_order() {
		let record = json!({
			"helpText": "top",
			"settings": {"ui_options": {"helpText": "ui"}}
		});
		assert_eq!(read_help_text(&record).as_deref(), Some("top"));

		let record = json!({"settings": {"helpText": " ", "ui_options": {"helpText": "ui"}}});
		assert_eq!(read_help_text(&record).as_deref(), Some("ui"));
	}

	#[rstest]
	fn test_merge_section_does_not_mutate_input() {
		// Arrange
		let field = FieldDefinition::new("f1", "Title", FieldType::Text)
			.with_section(Section::Validation, json!({"minLength": 2, "required": true}));
		let patch = map(json!({"minLength": 4}));

		// Act
		let next = merge_section(&field, Section::Validation, &patch);

		// Assert
		assert_eq!(field.settings.validation.min_length, Some(2));
		assert_eq!(next.settings.validation.min_length, Some(4));
		assert_eq!(next.settings.validation.required, Some(true));
	}

	#[rstest]
	fn test_merge_section_over_non_object_section_survives_round_trip() {
		// Arrange
		let field = migrate_record(&json!({
			"id": "f1",
			"name": "Title",
			"type": "text",
			"settings": {"validation": "legacy"}
		}));

		// Act
		let next = merge_section(&field, Section::Validation, &map(json!({"minLength": 3})));
		let encoded = serde_json::to_string(&next).unwrap();
		let decoded: FieldDefinition = serde_json::from_str(&encoded).unwrap();

		// Assert
		assert_eq!(encoded.matches("\"validation\"").count(), 1);
		assert_eq!(decoded.settings.validation.min_length, Some(3));
		assert!(!decoded.settings.extra.contains_key("validation"));
	}

	#[rstest]
	fn test_merge_record_section_dual_write_keeps_top_level_copy() {
		let record = json!({"advanced": {"prefix": "$"}, "settings": {}});
		let patch = map(json!({"suffix": "USD"}));

		let updated = merge_record_section(&record, Section::Advanced, &patch, true);

		assert_eq!(updated["advanced"], json!({"prefix": "$", "suffix": "USD"}));
		assert_eq!(updated["settings"]["advanced"], json!({"suffix": "USD"}));
		assert_eq!(
			migrate_record(&updated).settings.section_map(Section::Advanced),
			map(json!({"prefix": "$", "suffix": "USD"}))
		);
	}

	#[rstest]
	fn test_merge_record_section_dual_write_merges_each_copy_separately() {
		// Arrange
		let record = json!({
			"advanced": {"prefix": "$"},
			"settings": {"advanced": {"suffix": "USD"}}
		});
		let patch = map(json!({"locale": "en"}));

		// Act
		let updated = merge_record_section(&record, Section::Advanced, &patch, true);

		// Assert
		assert_eq!(
			updated["settings"]["advanced"],
			json!({"suffix": "USD", "locale": "en"})
		);
		assert_eq!(updated["advanced"], json!({"prefix": "$", "locale": "en"}));
		assert_eq!(
			migrate_record(&updated).settings.section_map(Section::Advanced),
			map(json!({"prefix": "$", "suffix": "USD", "locale": "en"}))
		);
	}

	#[rstest]
	fn test_merge_record_section_without_top_level_copy_writes_nested_only() {
		let record = json!({"settings": {"advanced": {"prefix": "$"}}});
		let patch = map(json!({"prefix": "EUR "}));

		let updated = merge_record_section(&record, Section::Advanced, &patch, true);

		assert!(updated.get("advanced").is_none());
		assert_eq!(updated["settings"]["advanced"], json!({"prefix": "EUR "}));
	}

	#[rstest]
	fn test_merge_record_section_folds_flat_copy() {
		let record = json!({
			"id": "f1",
			"validation": {"minLength": 1, "pattern": "^a"},
			"settings": {"validation": {"minLength": 3}}
		});
		let patch = map(json!({"maxLength": 9}));

		let updated = merge_record_section(&record, Section::Validation, &patch, false);

		assert_eq!(
			updated,
			json!({
				"id": "f1",
				"settings": {"validation": {"minLength": 3, "pattern": "^a", "maxLength": 9}}
			})
		);
	}

	#[rstest]
	fn test_merge_record_section_replaces_non_object_settings() {
		let record = json!({"settings": 5});

		let updated = merge_record_section(&record, Section::UiOptions, &map(json!({"width": 6})), false);

		assert_eq!(updated, json!({"settings": {"ui_options": {"width": 6}}}));
	}

	#[rstest]
	fn test_build_update_payload_shape() {
		let payload = build_update_payload(Section::UiOptions, &map(json!({"placeholder": "x"})));

		assert_eq!(payload, json!({"settings": {"ui_options": {"placeholder": "x"}}}));
	}

	#[rstest]
	fn test_migrate_record_nested_wins_on_conflict() {
		// Arrange
		let record = json!({
			"id": 12,
			"name": "Summary",
			"apiId": "summary_text",
			"type": "TEXTAREA",
			"collectionId": "posts",
			"sortOrder": "3",
			"validation": {"maxLength": 100, "pattern": "^S"},
			"settings": {"validation": {"maxLength": 200}}
		});

		// Act
		let field = migrate_record(&record);

		// Assert
		assert_eq!(field.id, "12");
		assert_eq!(field.api_id, "summary_text");
		assert_eq!(field.field_type, FieldType::Textarea);
		assert_eq!(field.collection_id.as_deref(), Some("posts"));
		assert_eq!(field.sort_order, 3);
		assert_eq!(field.settings.validation.max_length, Some(200));
		assert_eq!(field.settings.validation.pattern.as_deref(), Some("^S"));
	}

	#[rstest]
	fn test_migrate_record_required_precedence() {
		let explicit = migrate_record(&json!({"required": false, "validation": {"required": true}}));
		let legacy = migrate_record(&json!({"validation": {"required": true}}));

		assert!(!explicit.required);
		assert!(legacy.required);
	}

	#[rstest]
	fn test_migrate_record_help_text() {
		let from_top = migrate_record(&json!({"helpText": "top"}));
		let nested_wins = migrate_record(&json!({"helpText": "top", "settings": {"helpText": "nested"}}));

		assert_eq!(from_top.help_text(), Some("top"));
		assert_eq!(nested_wins.help_text(), Some("nested"));
	}

	#[rstest]
	fn test_migrate_record_of_garbage_is_default() {
		let field = migrate_record(&json!("oops"));

		assert_eq!(field.field_type, FieldType::Text);
		assert_eq!(field.api_id, "field");
		assert!(field.settings.validation.is_empty());
	}
}
