//! Current values of a data-entry form

use crate::error::{FormError, FormResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use vellum_settings::{FieldDefinition, JsonMap};

/// Map from field key (api id) to the value currently entered.
///
/// Lives for one editing session and is never persisted as-is; the snapshot
/// taken on submit is what reaches the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
	values: HashMap<String, Value>,
}

impl FormState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Initial state for `fields`: `null` for numeric fields, an empty string
	/// for every other data field. Structural fields hold no value.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_forms::FormState;
	/// use vellum_settings::{FieldDefinition, FieldType};
	/// use serde_json::json;
	///
	/// let fields = vec![
	///     FieldDefinition::new("1", "Title", FieldType::Text),
	///     FieldDefinition::new("2", "Price", FieldType::Number),
	///     FieldDefinition::new("3", "Break", FieldType::Divider),
	/// ];
	/// let state = FormState::initialize(&fields);
	///
	/// assert_eq!(state.get("title"), Some(&json!("")));
	/// assert_eq!(state.get("price"), Some(&json!(null)));
	/// assert_eq!(state.get("break"), None);
	/// ```
	pub fn initialize(fields: &[FieldDefinition]) -> Self {
		let values = fields
			.iter()
			.filter(|f| !f.field_type.is_structural())
			.map(|f| (f.key().to_string(), f.field_type.initial_value()))
			.collect();
		Self { values }
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Stores `value` under `key`, returning the previous value.
	pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.values.insert(key.into(), value)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn values(&self) -> &HashMap<String, Value> {
		&self.values
	}

	/// Copy of the current values as a JSON object.
	pub fn snapshot(&self) -> JsonMap {
		self.values
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}

	/// Pretty-printed JSON of the current values, keys sorted.
	pub fn export_json(&self) -> FormResult<String> {
		let sorted: BTreeMap<&String, &Value> = self.values.iter().collect();
		serde_json::to_string_pretty(&sorted).map_err(|e| FormError::Serialization(e.to_string()))
	}

	/// Whether `field` is shown in the form given the current values.
	///
	/// A field is hidden when its ui options say so or when its conditional
	/// rule is not satisfied by the observed field's value.
	pub fn is_visible(&self, field: &FieldDefinition) -> bool {
		if field.settings.ui_options.is_hidden() {
			return false;
		}
		match &field.settings.advanced.conditional {
			Some(rule) => rule.is_satisfied(self.get(&rule.field)),
			None => true,
		}
	}

	/// Discards every entered value and starts over from `fields`.
	pub fn reset(&mut self, fields: &[FieldDefinition]) {
		*self = Self::initialize(fields);
	}
}

impl FromIterator<(String, Value)> for FormState {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self {
			values: iter.into_iter().collect(),
		}
	}
}
