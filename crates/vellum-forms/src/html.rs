//! HTML preview of a rendered form

use crate::renderer::{RenderedControl, Widget};
use serde_json::Value;

/// HTML escape utility
pub fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

fn value_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn input_type(widget: &Widget) -> &'static str {
	match widget {
		Widget::NumberInput | Widget::Rating => "number",
		Widget::PasswordInput => "password",
		Widget::DatePicker => "date",
		Widget::ColorPicker => "color",
		Widget::Slider => "range",
		Widget::Toggle => "checkbox",
		Widget::FileUpload | Widget::MultiFileUpload => "file",
		_ => "text",
	}
}

fn render_input(control: &RenderedControl, html: &mut String) {
	let id = html_escape(&control.key);
	let required = if control.required { " required" } else { "" };
	let placeholder = control
		.placeholder
		.as_deref()
		.map(|p| format!(r#" placeholder="{}""#, html_escape(p)))
		.unwrap_or_default();

	match &control.widget {
		Widget::TextArea
		| Widget::RichTextEditor
		| Widget::BlockEditor
		| Widget::MarkdownEditor
		| Widget::JsonEditor => {
			html.push_str(&format!(
				r#"<textarea id="{id}" name="{id}" data-widget="{}"{placeholder}{required}>{}</textarea>"#,
				control.widget.as_str(),
				html_escape(&value_text(&control.value)),
			));
		}
		Widget::Toggle => {
			let checked = if control.value == Value::Bool(true) { " checked" } else { "" };
			html.push_str(&format!(
				r#"<input type="checkbox" id="{id}" name="{id}" data-widget="toggle"{checked}{required} />"#
			));
		}
		widget => {
			html.push_str(&format!(
				r#"<input type="{}" id="{id}" name="{id}" data-widget="{}" value="{}"{placeholder}{required} />"#,
				input_type(widget),
				widget.as_str(),
				html_escape(&value_text(&control.value)),
			));
		}
	}
}

fn render_control(control: &RenderedControl, html: &mut String) {
	let hidden = if control.visible { "" } else { " hidden" };
	match &control.widget {
		Widget::Divider => {
			html.push_str(&format!("\t<hr class=\"form-divider\"{hidden} />\n"));
			return;
		}
		Widget::Heading => {
			html.push_str(&format!(
				"\t<h3 class=\"form-heading\"{hidden}>{}</h3>\n",
				html_escape(&control.label)
			));
			return;
		}
		Widget::DetailGroup | Widget::RawGroup => {
			html.push_str(&format!(
				"\t<fieldset class=\"form-group-{}\"{hidden}><legend>{}</legend></fieldset>\n",
				control.widget.as_str(),
				html_escape(&control.label)
			));
			return;
		}
		_ => {}
	}

	html.push_str(&format!(
		"\t<div class=\"form-group\" data-field=\"{}\"{hidden}>\n",
		html_escape(&control.key)
	));
	let marker = if control.required { " <span class=\"required\">*</span>" } else { "" };
	html.push_str(&format!(
		"\t\t<label for=\"{}\">{}{marker}</label>\n\t\t",
		html_escape(&control.key),
		html_escape(&control.label)
	));
	if let Widget::Unsupported { tag } = &control.widget {
		html.push_str(&format!(
			"<div class=\"unsupported-field\">Unsupported field type: {}</div>",
			html_escape(tag)
		));
	} else {
		render_input(control, html);
	}
	html.push('\n');
	if let Some(help) = &control.help_text {
		html.push_str(&format!(
			"\t\t<small class=\"help-text\">{}</small>\n",
			html_escape(help)
		));
	}
	for error in &control.errors {
		html.push_str(&format!(
			"\t\t<div class=\"field-error\">{}</div>\n",
			html_escape(error)
		));
	}
	html.push_str("\t</div>\n");
}

/// Renders controls as an HTML form preview.
///
/// Every label, value and message is escaped.
///
/// # Examples
///
/// ```
/// use vellum_forms::{FormRenderer, FormState, render_html};
/// use vellum_settings::{FieldDefinition, FieldType};
///
/// let fields = vec![FieldDefinition::new("1", "<b>Title</b>", FieldType::Text)];
/// let controls = FormRenderer::new().render(&fields, &FormState::initialize(&fields));
/// let html = render_html(&controls);
///
/// assert!(html.starts_with("<form class=\"vellum-form\">"));
/// assert!(html.contains("&lt;b&gt;Title&lt;/b&gt;"));
/// ```
pub fn render_html(controls: &[RenderedControl]) -> String {
	let mut html = String::from("<form class=\"vellum-form\">\n");
	for control in controls {
		render_control(control, &mut html);
	}
	html.push_str("</form>");
	html
}
