//! Validation engine
//!
//! Checks every visible data field of a form against its validation
//! settings. Rules run in a fixed order and a failing rule never stops the
//! remaining fields from being checked:
//!
//! 1. required
//! 2. minimum and maximum length
//! 3. numeric bounds
//! 4. pattern
//! 5. custom predicate
//! 6. JSON syntax, for JSON editor fields
//!
//! An empty value (missing, `null`, `""` or `[]`) that is not required
//! passes without further checks, so length, pattern and custom rules only
//! constrain values that were actually entered.

use crate::ErrorMap;
use crate::expr::{self, EvalContext};
use crate::json_editor::{DEFAULT_MAX_DEPTH, parse_json_input_with_depth};
use crate::state::FormState;
use regex::RegexBuilder;
use serde_json::Value;
use tracing::{debug, warn};
use vellum_settings::{FieldDefinition, FieldType, ValidationSettings};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const PATTERN_MESSAGE: &str = "Value does not match the required pattern";
pub const CUSTOM_MESSAGE: &str = "Value failed custom validation";

/// Limits applied while validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
	/// Compiled size limit for user-supplied patterns, in bytes
	pub regex_size_limit: usize,
	/// Deepest nesting accepted from JSON editor fields
	pub json_max_depth: usize,
}

impl Default for ValidatorConfig {
	fn default() -> Self {
		Self {
			regex_size_limit: 1 << 20,
			json_max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
	config: ValidatorConfig,
}

/// Missing, `null`, `""` and empty lists count as empty. `0` and `false` do
/// not.
fn is_empty_value(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => true,
		Some(Value::String(s)) => s.is_empty(),
		Some(Value::Array(items)) => items.is_empty(),
		Some(_) => false,
	}
}

fn format_bound(bound: f64) -> String {
	if bound.fract() == 0.0 && bound.abs() < 1e15 {
		format!("{}", bound as i64)
	} else {
		bound.to_string()
	}
}

impl Validator {
	pub fn new(config: ValidatorConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &ValidatorConfig {
		&self.config
	}

	/// Validates every field of a form.
	///
	/// Structural fields, fields of unknown type and hidden fields are
	/// skipped. Fields without violations are absent from the result.
	pub fn validate(&self, fields: &[FieldDefinition], state: &FormState) -> ErrorMap {
		let mut errors = ErrorMap::new();
		for field in fields {
			if field.field_type.is_structural() || !field.field_type.is_known() {
				continue;
			}
			if !state.is_visible(field) {
				debug!(field = field.key(), "Skipping validation of hidden field");
				continue;
			}
			let messages = self.validate_field(field, state.get(field.key()), state);
			if !messages.is_empty() {
				errors.insert(field.key().to_string(), messages);
			}
		}
		errors
	}

	/// Messages raised for one field's value, in rule order.
	pub fn validate_field(
		&self,
		field: &FieldDefinition,
		value: Option<&Value>,
		state: &FormState,
	) -> Vec<String> {
		let rules = &field.settings.validation;
		let mut messages = Vec::new();

		if is_empty_value(value) {
			if field.is_required() {
				messages.push(REQUIRED_MESSAGE.to_string());
			}
			return messages;
		}
		let value = value.unwrap_or(&Value::Null);

		check_length(rules, value, &mut messages);
		check_bounds(rules, value, &mut messages);
		self.check_pattern(field, rules, value, &mut messages);
		check_custom(rules, value, state, &mut messages);
		if field.field_type == FieldType::Json
			&& let Value::String(text) = value
			&& let Err(e) = parse_json_input_with_depth(text, self.config.json_max_depth)
		{
			messages.push(format!("Invalid JSON: {e}"));
		}
		messages
	}

	fn check_pattern(
		&self,
		field: &FieldDefinition,
		rules: &ValidationSettings,
		value: &Value,
		messages: &mut Vec<String>,
	) {
		let Some(pattern) = rules.active_pattern() else {
			return;
		};
		let text = match value {
			Value::String(s) => s.clone(),
			Value::Number(n) => n.to_string(),
			_ => return,
		};
		let regex = match RegexBuilder::new(pattern)
			.size_limit(self.config.regex_size_limit)
			.build()
		{
			Ok(regex) => regex,
			Err(e) => {
				warn!(
					field = field.key(),
					pattern,
					error = %e,
					"Skipping malformed validation pattern"
				);
				return;
			}
		};
		if !regex.is_match(&text) {
			let message = rules
				.pattern_message
				.as_deref()
				.filter(|m| !m.trim().is_empty())
				.unwrap_or(PATTERN_MESSAGE);
			messages.push(message.to_string());
		}
	}
}

fn check_length(rules: &ValidationSettings, value: &Value, messages: &mut Vec<String>) {
	let Value::String(text) = value else {
		return;
	};
	let len = text.chars().count();
	if let Some(min) = rules.min_length_bound()
		&& len < min
	{
		messages.push(format!("Value must be at least {min} characters"));
	}
	if let Some(max) = rules.max_length_bound()
		&& len > max
	{
		messages.push(format!("Value must be at most {max} characters"));
	}
}

fn check_bounds(rules: &ValidationSettings, value: &Value, messages: &mut Vec<String>) {
	let Some(number) = value.as_f64() else {
		return;
	};
	if let Some(min) = rules.min_value()
		&& number < min
	{
		messages.push(format!("Value must be at least {}", format_bound(min)));
	}
	if let Some(max) = rules.max_value()
		&& number > max
	{
		messages.push(format!("Value must be at most {}", format_bound(max)));
	}
}

fn check_custom(
	rules: &ValidationSettings,
	value: &Value,
	state: &FormState,
	messages: &mut Vec<String>,
) {
	let Some(source) = rules.active_custom_validation() else {
		return;
	};
	match expr::evaluate(source, &EvalContext::new(value, state)) {
		Ok(true) => {}
		Ok(false) => {
			let message = rules
				.custom_message
				.as_deref()
				.filter(|m| !m.trim().is_empty())
				.unwrap_or(CUSTOM_MESSAGE);
			messages.push(message.to_string());
		}
		Err(e) => messages.push(format!("Custom validation error: {e}")),
	}
}

/// Validates a form with the default limits.
///
/// # Examples
///
/// ```
/// use vellum_forms::{FormState, validate};
/// use vellum_settings::{FieldDefinition, FieldType, Section};
/// use serde_json::json;
///
/// let fields = vec![
///     FieldDefinition::new("1", "Code", FieldType::Text)
///         .with_section(Section::Validation, json!({"minLengthEnabled": true, "minLength": 5})),
/// ];
/// let state: FormState = [("code".to_string(), json!("ab"))].into_iter().collect();
///
/// let errors = validate(&fields, &state);
/// assert_eq!(errors["code"], vec!["Value must be at least 5 characters".to_string()]);
/// ```
pub fn validate(fields: &[FieldDefinition], state: &FormState) -> ErrorMap {
	Validator::default().validate(fields, state)
}
