//! Schema and content editing services for Vellum
//!
//! This crate connects the field settings and form engines to their outside
//! collaborators:
//!
//! - **Stores**: async persistence traits for fields, collections,
//!   components and content entries, plus an in-memory implementation
//! - **Notifier**: fire-and-forget user notifications
//! - **Schema editor**: add, remove and reorder the fields of a collection
//! - **Settings editor**: optimistic, section-by-section saves of one field
//! - **Content entry**: a live form over a collection's fields, submitted to
//!   the entry store
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use vellum_admin::{MemoryNotifier, MemoryStore, NewField, SchemaEditor};
//! use vellum_settings::FieldType;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let notifier = Arc::new(MemoryNotifier::new());
//! let mut editor = SchemaEditor::new("posts", store.clone(), notifier.clone());
//!
//! editor.add_field(NewField::new("Hero Title", FieldType::Text)).await?;
//! assert_eq!(editor.fields()[0].api_id, "hero_title");
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod memory;
pub mod models;
pub mod notify;
pub mod options;
pub mod schema_editor;
pub mod settings_editor;
pub mod store;

pub use entry::{ContentEntrySession, SubmitOutcome};
pub use memory::MemoryStore;
pub use models::{Collection, Component, Entry, NewField};
pub use notify::{Level, MemoryNotifier, Notification, Notifier, TracingNotifier};
pub use options::AdminOptions;
pub use schema_editor::SchemaEditor;
pub use settings_editor::{FieldSettingsEditor, SaveState};
pub use store::{CollectionStore, ComponentStore, EntryStore, FieldStore};

/// Admin error types
pub mod error {
	use std::time::Duration;
	use thiserror::Error;

	#[derive(Debug, Error)]
	pub enum AdminError {
		/// The store rejected or failed the operation
		#[error("Persistence error: {0}")]
		Persistence(String),

		/// The store did not answer in time
		#[error("Persistence call timed out after {0:?}")]
		Timeout(Duration),

		/// Input rejected before reaching the store
		#[error("Validation error: {0}")]
		Validation(String),

		#[error("{kind} '{id}' not found")]
		NotFound { kind: &'static str, id: String },

		/// Api id already taken within its scope
		#[error("{kind} with api id '{api_id}' already exists")]
		Duplicate { kind: &'static str, api_id: String },

		#[error(transparent)]
		Settings(#[from] vellum_settings::SettingsError),
	}

	/// Result type for admin operations
	pub type AdminResult<T> = Result<T, AdminError>;
}

pub use error::{AdminError, AdminResult};
