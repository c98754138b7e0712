//! Collection schema editor
//!
//! Keeps the ordered field list of one collection and applies add, remove
//! and reorder operations through a [`FieldStore`].

use crate::error::{AdminError, AdminResult};
use crate::models::NewField;
use crate::notify::{Level, Notifier};
use crate::options::AdminOptions;
use crate::store::{FieldStore, bounded};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use vellum_settings::{FieldDefinition, is_valid_api_id};

pub struct SchemaEditor {
	collection_id: String,
	fields: Vec<FieldDefinition>,
	store: Arc<dyn FieldStore>,
	notifier: Arc<dyn Notifier>,
	timeout: Option<Duration>,
}

impl SchemaEditor {
	/// Editor for `collection_id` with an empty field list; call
	/// [`SchemaEditor::load`] to fetch the stored fields.
	pub fn new(
		collection_id: impl Into<String>,
		store: Arc<dyn FieldStore>,
		notifier: Arc<dyn Notifier>,
	) -> Self {
		Self {
			collection_id: collection_id.into(),
			fields: Vec::new(),
			store,
			notifier,
			timeout: None,
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

	pub fn collection_id(&self) -> &str {
		&self.collection_id
	}

	/// Fields ordered by `sort_order`.
	pub fn fields(&self) -> &[FieldDefinition] {
		&self.fields
	}

	pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
		self.fields.iter().find(|f| f.id == id)
	}

	/// Replaces the local list with the stored fields.
	pub async fn load(&mut self) -> AdminResult<&[FieldDefinition]> {
		let mut fields = self
			.guard("load fields", self.store.list_fields(&self.collection_id))
			.await?;
		fields.sort_by_key(|f| f.sort_order);
		self.fields = fields;
		Ok(&self.fields)
	}

	/// Adds a field at the end of the list.
	///
	/// The api id is checked locally before the store is called, so a
	/// malformed or taken id never produces a request.
	pub async fn add_field(&mut self, field: NewField) -> AdminResult<FieldDefinition> {
		let api_id = field.resolved_api_id();
		if !is_valid_api_id(&api_id) {
			let err = AdminError::Validation(format!("'{api_id}' is not a valid api id"));
			self.notifier.notify(Level::Warning, &err.to_string());
			return Err(err);
		}
		if self.fields.iter().any(|f| f.api_id == api_id) {
			let err = AdminError::Duplicate {
				kind: "Field",
				api_id,
			};
			self.notifier.notify(Level::Warning, &err.to_string());
			return Err(err);
		}

		let created = self
			.guard(
				"add field",
				self.store.create_field(&self.collection_id, field),
			)
			.await?;
		info!(collection = %self.collection_id, field = %created.api_id, "Field added");
		self.notifier
			.notify(Level::Success, &format!("Added field {}", created.name));
		self.fields.push(created.clone());
		Ok(created)
	}

	pub async fn remove_field(&mut self, id: &str) -> AdminResult<()> {
		let Some(position) = self.fields.iter().position(|f| f.id == id) else {
			return Err(AdminError::NotFound {
				kind: "Field",
				id: id.to_string(),
			});
		};
		self.guard("remove field", self.store.delete_field(id)).await?;
		let removed = self.fields.remove(position);
		self.notifier
			.notify(Level::Success, &format!("Removed field {}", removed.name));
		Ok(())
	}

	/// Applies a new order. `ordered_ids` must name every field once.
	///
	/// The local order only changes after the store accepted it.
	pub async fn reorder(&mut self, ordered_ids: &[String]) -> AdminResult<()> {
		let known: HashSet<&str> = self.fields.iter().map(|f| f.id.as_str()).collect();
		let requested: HashSet<&str> = ordered_ids.iter().map(String::as_str).collect();
		if ordered_ids.len() != self.fields.len() || requested != known {
			return Err(AdminError::Validation(
				"reorder must list every field of the collection exactly once".to_string(),
			));
		}

		self.guard(
			"reorder fields",
			self.store.reorder_fields(&self.collection_id, ordered_ids),
		)
		.await?;

		let mut reordered = Vec::with_capacity(self.fields.len());
		for (position, id) in ordered_ids.iter().enumerate() {
			if let Some(index) = self.fields.iter().position(|f| &f.id == id) {
				let mut field = self.fields.swap_remove(index);
				field.sort_order = position as i64;
				reordered.push(field);
			}
		}
		self.fields = reordered;
		self.notifier.notify(Level::Success, "Field order saved");
		Ok(())
	}

	/// Moves one field to `to`, shifting the others.
	pub async fn move_field(&mut self, id: &str, to: usize) -> AdminResult<()> {
		let mut ids: Vec<String> = self.fields.iter().map(|f| f.id.clone()).collect();
		let Some(from) = ids.iter().position(|f| f == id) else {
			return Err(AdminError::NotFound {
				kind: "Field",
				id: id.to_string(),
			});
		};
		let moved = ids.remove(from);
		ids.insert(to.min(ids.len()), moved);
		self.reorder(&ids).await
	}

	/// Runs a store call under the configured timeout and reports failures.
	async fn guard<T>(
		&self,
		action: &str,
		call: impl Future<Output = AdminResult<T>>,
	) -> AdminResult<T> {
		bounded(self.timeout, call).await.inspect_err(|e| {
			error!(collection = %self.collection_id, action, error = %e, "Schema change failed");
			self.notifier
				.notify(Level::Error, &format!("Could not {action}: {e}"));
		})
	}
}

impl std::fmt::Debug for SchemaEditor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SchemaEditor")
			.field("collection_id", &self.collection_id)
			.field("fields", &self.fields.len())
			.field("timeout", &self.timeout)
			.finish()
	}
}
