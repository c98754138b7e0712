//! Dynamic form renderer
//!
//! Maps each field definition to one control. The widget is chosen by an
//! exhaustive match on [`FieldType`]; a type without a widget renders as a
//! [`Widget::Unsupported`] placeholder so the rest of the form stays usable.

use crate::ErrorMap;
use crate::error::FormResult;
use crate::state::FormState;
use crate::validation::Validator;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use vellum_settings::{AppearanceOverride, Breakpoint, FieldDefinition, FieldType, JsonMap};

/// Input control used for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
	TextInput,
	TextArea,
	NumberInput,
	Toggle,
	Dropdown,
	DatePicker,
	PasswordInput,
	MaskedInput,
	OtpInput,
	Autocomplete,
	RichTextEditor,
	BlockEditor,
	MarkdownEditor,
	TagInput,
	SlugInput,
	ColorPicker,
	RadioCards,
	CheckboxCards,
	FileUpload,
	MultiFileUpload,
	JsonEditor,
	Rating,
	Slider,
	HashInput,
	IconPicker,
	Listbox,
	TreeSelect,
	InlineRepeater,
	Divider,
	Heading,
	DetailGroup,
	RawGroup,
	CollectionPicker,
	/// Placeholder for a type tag with no widget
	Unsupported { tag: String },
}

impl Widget {
	pub fn for_field_type(field_type: &FieldType) -> Widget {
		match field_type {
			FieldType::Text => Widget::TextInput,
			FieldType::Textarea => Widget::TextArea,
			FieldType::Number => Widget::NumberInput,
			FieldType::Boolean => Widget::Toggle,
			FieldType::Select => Widget::Dropdown,
			FieldType::Date => Widget::DatePicker,
			FieldType::Password => Widget::PasswordInput,
			FieldType::Mask => Widget::MaskedInput,
			FieldType::Otp => Widget::OtpInput,
			FieldType::Autocomplete => Widget::Autocomplete,
			FieldType::RichText => Widget::RichTextEditor,
			FieldType::RichTextBlocks => Widget::BlockEditor,
			FieldType::Markdown => Widget::MarkdownEditor,
			FieldType::Tags => Widget::TagInput,
			FieldType::Slug => Widget::SlugInput,
			FieldType::Color => Widget::ColorPicker,
			FieldType::RadioCards => Widget::RadioCards,
			FieldType::CheckboxCards => Widget::CheckboxCards,
			FieldType::File => Widget::FileUpload,
			FieldType::Files => Widget::MultiFileUpload,
			FieldType::Json => Widget::JsonEditor,
			FieldType::Rating => Widget::Rating,
			FieldType::Slider => Widget::Slider,
			FieldType::Hash => Widget::HashInput,
			FieldType::Icon => Widget::IconPicker,
			FieldType::Listbox => Widget::Listbox,
			FieldType::Tree => Widget::TreeSelect,
			FieldType::InlineRepeater => Widget::InlineRepeater,
			FieldType::Divider => Widget::Divider,
			FieldType::Header => Widget::Heading,
			FieldType::DetailGroup => Widget::DetailGroup,
			FieldType::RawGroup => Widget::RawGroup,
			FieldType::CollectionItem => Widget::CollectionPicker,
			FieldType::Unknown(tag) => Widget::Unsupported { tag: tag.clone() },
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Widget::TextInput => "text_input",
			Widget::TextArea => "text_area",
			Widget::NumberInput => "number_input",
			Widget::Toggle => "toggle",
			Widget::Dropdown => "dropdown",
			Widget::DatePicker => "date_picker",
			Widget::PasswordInput => "password_input",
			Widget::MaskedInput => "masked_input",
			Widget::OtpInput => "otp_input",
			Widget::Autocomplete => "autocomplete",
			Widget::RichTextEditor => "rich_text_editor",
			Widget::BlockEditor => "block_editor",
			Widget::MarkdownEditor => "markdown_editor",
			Widget::TagInput => "tag_input",
			Widget::SlugInput => "slug_input",
			Widget::ColorPicker => "color_picker",
			Widget::RadioCards => "radio_cards",
			Widget::CheckboxCards => "checkbox_cards",
			Widget::FileUpload => "file_upload",
			Widget::MultiFileUpload => "multi_file_upload",
			Widget::JsonEditor => "json_editor",
			Widget::Rating => "rating",
			Widget::Slider => "slider",
			Widget::HashInput => "hash_input",
			Widget::IconPicker => "icon_picker",
			Widget::Listbox => "listbox",
			Widget::TreeSelect => "tree_select",
			Widget::InlineRepeater => "inline_repeater",
			Widget::Divider => "divider",
			Widget::Heading => "heading",
			Widget::DetailGroup => "detail_group",
			Widget::RawGroup => "raw_group",
			Widget::CollectionPicker => "collection_picker",
			Widget::Unsupported { .. } => "unsupported",
		}
	}

	pub fn is_unsupported(&self) -> bool {
		matches!(self, Widget::Unsupported { .. })
	}
}

/// One control of a rendered form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedControl {
	/// Api id the control reads and writes
	pub key: String,
	pub label: String,
	pub field_type: FieldType,
	pub widget: Widget,
	pub value: Value,
	pub required: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub help_text: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	/// Advanced settings with the per-type defaults filled in
	pub props: JsonMap,
	pub appearance: AppearanceOverride,
	pub errors: Vec<String>,
	pub visible: bool,
	/// Layout-only control that holds no value
	pub structural: bool,
}

/// Builds controls for a list of fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormRenderer {
	breakpoint: Breakpoint,
}

impl FormRenderer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Renders with the appearance resolved for `breakpoint`.
	pub fn at_breakpoint(breakpoint: Breakpoint) -> Self {
		Self { breakpoint }
	}

	pub fn breakpoint(&self) -> Breakpoint {
		self.breakpoint
	}

	/// One control per field, in the order given.
	pub fn render(&self, fields: &[FieldDefinition], state: &FormState) -> Vec<RenderedControl> {
		self.render_with_errors(fields, state, &ErrorMap::new())
	}

	pub fn render_with_errors(
		&self,
		fields: &[FieldDefinition],
		state: &FormState,
		errors: &ErrorMap,
	) -> Vec<RenderedControl> {
		fields
			.iter()
			.map(|field| self.render_field(field, state, errors))
			.collect()
	}

	/// Renders a single field.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_forms::{FormRenderer, FormState, Widget};
	/// use vellum_settings::{FieldDefinition, FieldType};
	/// use serde_json::json;
	///
	/// let field = FieldDefinition::new("1", "Mood", FieldType::from_tag("emoji-picker"));
	/// let control = FormRenderer::new().render_field(&field, &FormState::new(), &Default::default());
	///
	/// assert_eq!(control.widget, Widget::Unsupported { tag: "emoji-picker".to_string() });
	/// assert_eq!(control.value, json!(""));
	/// ```
	pub fn render_field(
		&self,
		field: &FieldDefinition,
		state: &FormState,
		errors: &ErrorMap,
	) -> RenderedControl {
		let widget = Widget::for_field_type(&field.field_type);
		if let Widget::Unsupported { tag } = &widget {
			warn!(field = field.key(), tag = tag.as_str(), "No widget for field type; rendering placeholder");
		} else {
			debug!(field = field.key(), widget = widget.as_str(), "Rendering field control");
		}

		let structural = field.field_type.is_structural();
		let value = if structural {
			Value::Null
		} else {
			match state.get(field.key()) {
				None | Some(Value::Null) => field.field_type.empty_value(),
				Some(value) => value.clone(),
			}
		};

		RenderedControl {
			key: field.key().to_string(),
			label: field.name.clone(),
			field_type: field.field_type.clone(),
			widget,
			value,
			required: field.is_required(),
			help_text: field.help_text().map(str::to_string),
			placeholder: field.settings.ui_options.placeholder.clone(),
			props: field.typed_settings(),
			appearance: field.settings.appearance.resolve(self.breakpoint),
			errors: errors.get(field.key()).cloned().unwrap_or_default(),
			visible: state.is_visible(field),
			structural,
		}
	}
}

/// A form being filled in: the field list, current values and the errors of
/// the last submit attempt.
#[derive(Debug, Clone)]
pub struct FormSession {
	fields: Vec<FieldDefinition>,
	state: FormState,
	errors: ErrorMap,
	renderer: FormRenderer,
	validator: Validator,
}

impl FormSession {
	pub fn new(fields: Vec<FieldDefinition>) -> Self {
		Self::with_validator(fields, Validator::default())
	}

	pub fn with_validator(fields: Vec<FieldDefinition>, validator: Validator) -> Self {
		let state = FormState::initialize(&fields);
		Self {
			fields,
			state,
			errors: ErrorMap::new(),
			renderer: FormRenderer::default(),
			validator,
		}
	}

	pub fn with_renderer(mut self, renderer: FormRenderer) -> Self {
		self.renderer = renderer;
		self
	}

	pub fn fields(&self) -> &[FieldDefinition] {
		&self.fields
	}

	pub fn state(&self) -> &FormState {
		&self.state
	}

	pub fn errors(&self) -> &ErrorMap {
		&self.errors
	}

	/// Records a new value for a field and clears that field's errors.
	///
	/// Other fields keep their errors until the next submit.
	pub fn on_change(&mut self, key: &str, value: Value) {
		debug!(field = key, "Field value changed");
		self.state.set(key, value);
		self.errors.remove(key);
	}

	pub fn render(&self) -> Vec<RenderedControl> {
		self.renderer
			.render_with_errors(&self.fields, &self.state, &self.errors)
	}

	/// Runs the validation engine and keeps its errors for rendering.
	pub fn validate(&mut self) -> &ErrorMap {
		self.errors = self.validator.validate(&self.fields, &self.state);
		&self.errors
	}

	/// Validates the form. On success returns a snapshot of the values to
	/// persist; on failure returns the errors, which also stay on the
	/// session.
	pub fn submit(&mut self) -> Result<JsonMap, ErrorMap> {
		if !self.validate().is_empty() {
			return Err(self.errors.clone());
		}
		Ok(self.state.snapshot())
	}

	pub fn export_json(&self) -> FormResult<String> {
		self.state.export_json()
	}

	/// Starts over with the initial values and no errors.
	pub fn reset(&mut self) {
		self.state.reset(&self.fields);
		self.errors.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use vellum_settings::Section;

	#[rstest]
	fn test_every_known_type_has_a_widget() {
		for field_type in FieldType::KNOWN {
			assert!(!Widget::for_field_type(&field_type).is_unsupported(), "{field_type}");
		}
	}

	#[rstest]
	fn test_render_preserves_order_and_fills_empty_values() {
		// Arrange
		let fields = vec![
			FieldDefinition::new("1", "Price", FieldType::Number),
			FieldDefinition::new("2", "Tags", FieldType::Tags),
			FieldDefinition::new("3", "Data", FieldType::Json),
			FieldDefinition::new("4", "Break", FieldType::Divider),
		];
		let state: FormState = [("tags".to_string(), Value::Null)].into_iter().collect();

		// Act
		let controls = FormRenderer::new().render(&fields, &state);

		// Assert
		let keys: Vec<_> = controls.iter().map(|c| c.key.as_str()).collect();
		assert_eq!(keys, ["price", "tags", "data", "break"]);
		assert_eq!(controls[0].value, Value::Null);
		assert_eq!(controls[1].value, json!([]));
		assert_eq!(controls[2].value, json!({}));
		assert!(controls[3].structural);
	}

	#[rstest]
	fn test_control_carries_settings() {
		let field = FieldDefinition::new("1", "Price", FieldType::Number)
			.required()
			.with_help_text("Gross amount")
			.with_section(Section::UiOptions, json!({"placeholder": "0.00"}))
			.with_section(Section::Advanced, json!({"currency": "EUR"}))
			.with_section(
				Section::Appearance,
				json!({"uiVariant": "pill", "responsive": {"mobile": {"uiVariant": "material"}}}),
			);

		let desktop = FormRenderer::new().render_field(&field, &FormState::new(), &ErrorMap::new());
		let mobile = FormRenderer::at_breakpoint(Breakpoint::Mobile).render_field(
			&field,
			&FormState::new(),
			&ErrorMap::new(),
		);

		assert!(desktop.required);
		assert_eq!(desktop.help_text.as_deref(), Some("Gross amount"));
		assert_eq!(desktop.placeholder.as_deref(), Some("0.00"));
		assert_eq!(desktop.props["currency"], json!("EUR"));
		assert_eq!(desktop.props["mode"], json!("decimal"));
		assert_eq!(desktop.appearance.ui_variant.map(|v| v.as_str()), Some("pill"));
		assert_eq!(mobile.appearance.ui_variant.map(|v| v.as_str()), Some("material"));
	}

	#[rstest]
	fn test_on_change_clears_only_that_field() {
		// Arrange
		let fields = vec![
			FieldDefinition::new("1", "Title", FieldType::Text).required(),
			FieldDefinition::new("2", "Slug", FieldType::Slug).required(),
		];
		let mut session = FormSession::new(fields);
		assert!(session.submit().is_err());

		// Act
		session.on_change("title", json!("Hi"));

		// Assert
		assert!(!session.errors().contains_key("title"));
		assert!(session.errors().contains_key("slug"));
		let controls = session.render();
		assert!(controls[0].errors.is_empty());
		assert_eq!(controls[1].errors, vec!["This field is required".to_string()]);
	}

	#[rstest]
	fn test_submit_returns_snapshot_and_reset_restores() {
		let mut session = FormSession::new(vec![FieldDefinition::new("1", "Count", FieldType::Number)]);
		session.on_change("count", json!(0));

		let snapshot = session.submit().unwrap();
		session.reset();

		assert_eq!(snapshot["count"], json!(0));
		assert_eq!(session.state().get("count"), Some(&Value::Null));
	}

	#[rstest]
	fn test_controls_serialize_for_clients() {
		let field = FieldDefinition::new("1", "Mood", FieldType::from_tag("emoji"));

		let control = FormRenderer::new().render_field(&field, &FormState::new(), &ErrorMap::new());
		let json = serde_json::to_value(&control).unwrap();

		assert_eq!(json["widget"], json!({"kind": "unsupported", "tag": "emoji"}));
		assert_eq!(json["fieldType"], json!("emoji"));
	}
}
