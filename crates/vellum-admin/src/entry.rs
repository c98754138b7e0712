//! Content entry
//!
//! A live form over a collection's fields. Submitting validates locally and
//! only reaches the entry store when the form is valid.

use crate::error::AdminResult;
use crate::models::Entry;
use crate::notify::{Level, Notifier};
use crate::options::AdminOptions;
use crate::store::{EntryStore, FieldStore, bounded};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use vellum_forms::{ErrorMap, FormResult, FormSession, RenderedControl, Validator};
use vellum_settings::FieldDefinition;

/// Result of a submit that reached a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
	/// Stored; the form was reset to its initial values
	Saved(Entry),
	/// Rejected by validation; nothing was sent
	Invalid(ErrorMap),
}

pub struct ContentEntrySession {
	collection_id: String,
	session: FormSession,
	entries: Arc<dyn EntryStore>,
	notifier: Arc<dyn Notifier>,
	timeout: Option<Duration>,
}

impl ContentEntrySession {
	pub fn from_fields(
		collection_id: impl Into<String>,
		fields: Vec<FieldDefinition>,
		entries: Arc<dyn EntryStore>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self {
			collection_id: collection_id.into(),
			session: FormSession::new(fields),
			entries,
			notifier,
			timeout: None,
		}
	}

	/// Fetches the collection's fields and opens a form over them.
	pub async fn load(
		collection_id: impl Into<String>,
		fields: &dyn FieldStore,
		entries: Arc<dyn EntryStore>,
		notifier: Arc<dyn Notifier>,
		options: &AdminOptions,
	) -> AdminResult<Self> {
		let collection_id = collection_id.into();
		let loaded = bounded(options.persistence_timeout, fields.list_fields(&collection_id)).await?;
		Ok(Self {
			session: FormSession::with_validator(loaded, options.validator()),
			collection_id,
			entries,
			notifier,
			timeout: options.persistence_timeout,
		})
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	pub fn with_validator(mut self, validator: Validator) -> Self {
		self.session = FormSession::with_validator(self.session.fields().to_vec(), validator);
		self
	}

	pub fn collection_id(&self) -> &str {
		&self.collection_id
	}

	pub fn form(&self) -> &FormSession {
		&self.session
	}

	pub fn errors(&self) -> &ErrorMap {
		self.session.errors()
	}

	pub fn on_change(&mut self, key: &str, value: Value) {
		self.session.on_change(key, value);
	}

	pub fn render(&self) -> Vec<RenderedControl> {
		self.session.render()
	}

	pub fn export_json(&self) -> FormResult<String> {
		self.session.export_json()
	}

	/// Validates and, when valid, stores the entry.
	///
	/// A store failure is returned as an error and keeps every value the
	/// user typed.
	pub async fn submit(&mut self) -> AdminResult<SubmitOutcome> {
		let data = match self.session.submit() {
			Ok(data) => data,
			Err(errors) => {
				let count: usize = errors.values().map(Vec::len).sum();
				self.notifier.notify(
					Level::Warning,
					&format!("Please fix {count} validation error(s) before saving"),
				);
				return Ok(SubmitOutcome::Invalid(errors));
			}
		};

		match bounded(
			self.timeout,
			self.entries.save_entry(&self.collection_id, data),
		)
		.await
		{
			Ok(entry) => {
				info!(collection = %self.collection_id, entry = %entry.id, "Entry saved");
				self.notifier.notify(Level::Success, "Entry saved");
				self.session.reset();
				Ok(SubmitOutcome::Saved(entry))
			}
			Err(e) => {
				error!(collection = %self.collection_id, error = %e, "Failed to save entry");
				self.notifier
					.notify(Level::Error, &format!("Could not save entry: {e}"));
				Err(e)
			}
		}
	}
}

impl std::fmt::Debug for ContentEntrySession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContentEntrySession")
			.field("collection_id", &self.collection_id)
			.field("session", &self.session)
			.field("timeout", &self.timeout)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemoryStore;
	use crate::notify::MemoryNotifier;
	use rstest::rstest;
	use serde_json::json;
	use vellum_settings::FieldType;

	fn title_field() -> FieldDefinition {
		FieldDefinition::new("f1", "Title", FieldType::Text)
			.with_collection("posts")
			.required()
	}

	#[rstest]
	#[tokio::test]
	async fn test_invalid_submit_does_not_store() {
		// Arrange
		let store = Arc::new(MemoryStore::new());
		let notifier = Arc::new(MemoryNotifier::new());
		let mut session =
			ContentEntrySession::from_fields("posts", vec![title_field()], store.clone(), notifier.clone());

		// Act
		let outcome = session.submit().await.unwrap();

		// Assert
		assert!(matches!(outcome, SubmitOutcome::Invalid(ref errors) if errors.contains_key("title")));
		assert!(store.list_entries("posts").await.unwrap().is_empty());
		assert_eq!(notifier.last().unwrap().level, Level::Warning);
	}

	#[rstest]
	#[tokio::test]
	async fn test_valid_submit_stores_and_resets() {
		let store = Arc::new(MemoryStore::new());
		let notifier = Arc::new(MemoryNotifier::new());
		let mut session =
			ContentEntrySession::from_fields("posts", vec![title_field()], store.clone(), notifier.clone());
		session.on_change("title", json!("Hello"));

		let outcome = session.submit().await.unwrap();

		let SubmitOutcome::Saved(entry) = outcome else {
			panic!("expected a saved entry");
		};
		assert_eq!(entry.data["title"], json!("Hello"));
		assert_eq!(store.list_entries("posts").await.unwrap().len(), 1);
		assert_eq!(session.form().state().get("title"), Some(&json!("")));
	}
}
