//! Field settings editor
//!
//! Edits one field's settings sections. A save merges the patch into the
//! local copy first, then sends only the section payload to the store. A
//! failed or timed-out save leaves the local copy in place and reports the
//! failure through the notifier.

use crate::error::AdminResult;
use crate::notify::{Level, Notifier};
use crate::options::AdminOptions;
use crate::store::{FieldStore, bounded};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use vellum_settings::{
	FieldDefinition, JsonMap, Section, build_update_payload, merge_section,
};

/// Outcome of the most recent save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveState {
	#[default]
	Idle,
	Saving,
	Saved,
	Failed(String),
}

pub struct FieldSettingsEditor {
	field: FieldDefinition,
	store: Arc<dyn FieldStore>,
	notifier: Arc<dyn Notifier>,
	timeout: Option<Duration>,
	state: SaveState,
}

impl FieldSettingsEditor {
	pub fn new(
		field: FieldDefinition,
		store: Arc<dyn FieldStore>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self {
			field,
			store,
			notifier,
			timeout: None,
			state: SaveState::Idle,
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	pub fn with_options(mut self, options: &AdminOptions) -> Self {
		self.timeout = options.persistence_timeout;
		self
	}

	/// Local copy, including merges whose save failed.
	pub fn field(&self) -> &FieldDefinition {
		&self.field
	}

	pub fn state(&self) -> &SaveState {
		&self.state
	}

	/// Current value of one section.
	pub fn section(&self, section: Section) -> JsonMap {
		self.field.settings.section_map(section)
	}

	/// Merges `patch` into `section` and persists it.
	///
	/// # Examples
	///
	/// ```
	/// # #[tokio::main(flavor = "current_thread")]
	/// # async fn main() -> vellum_admin::error::AdminResult<()> {
	/// use std::sync::Arc;
	/// use serde_json::json;
	/// use vellum_admin::{FieldSettingsEditor, FieldStore, MemoryNotifier, MemoryStore, NewField, SaveState};
	/// use vellum_settings::{FieldType, Section};
	///
	/// let store = Arc::new(MemoryStore::new());
	/// let field = store.create_field("posts", NewField::new("Title", FieldType::Text)).await?;
	/// let mut editor = FieldSettingsEditor::new(field, store.clone(), Arc::new(MemoryNotifier::new()));
	///
	/// let patch = json!({"uiVariant": "pill"}).as_object().unwrap().clone();
	/// editor.save_section(Section::Appearance, patch).await?;
	///
	/// assert_eq!(editor.state(), &SaveState::Saved);
	/// assert_eq!(editor.field().settings.appearance.variant().as_str(), "pill");
	/// # Ok(())
	/// # }
	/// ```
	pub async fn save_section(&mut self, section: Section, patch: JsonMap) -> AdminResult<()> {
		self.field = merge_section(&self.field, section, &patch);
		let payload = build_update_payload(section, &patch);
		self.persist(payload, section.as_str()).await
	}

	/// Sets or clears the field's help text.
	pub async fn save_help_text(&mut self, help_text: Option<String>) -> AdminResult<()> {
		let help_text = help_text.filter(|t| !t.trim().is_empty());
		self.field.settings.help_text = help_text.clone();
		let mut settings = JsonMap::new();
		settings.insert(
			"helpText".to_string(),
			help_text.map(Value::String).unwrap_or(Value::Null),
		);
		let mut payload = JsonMap::new();
		payload.insert("settings".to_string(), Value::Object(settings));
		self.persist(Value::Object(payload), "helpText").await
	}

	async fn persist(&mut self, payload: Value, what: &str) -> AdminResult<()> {
		self.state = SaveState::Saving;
		debug!(field = %self.field.id, section = what, "Saving field settings");
		let result = bounded(
			self.timeout,
			self.store.update_field(&self.field.id, payload),
		)
		.await;

		match result {
			Ok(_) => {
				self.state = SaveState::Saved;
				self.notifier
					.notify(Level::Success, &format!("Saved {} settings", self.field.name));
				Ok(())
			}
			Err(e) => {
				error!(field = %self.field.id, section = what, error = %e, "Failed to save field settings");
				self.state = SaveState::Failed(e.to_string());
				self.notifier.notify(
					Level::Error,
					&format!("Could not save {} settings: {e}", self.field.name),
				);
				Err(e)
			}
		}
	}
}

impl std::fmt::Debug for FieldSettingsEditor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FieldSettingsEditor")
			.field("field", &self.field.id)
			.field("timeout", &self.timeout)
			.field("state", &self.state)
			.finish()
	}
}
