//! In-memory store
//!
//! Implements every store trait over shared tables. Field records are kept
//! in their raw wire shape, so legacy flat records can be seeded and are
//! migrated on every read.

use crate::error::{AdminError, AdminResult};
use crate::models::{Collection, Component, Entry, NewField};
use crate::options::AdminOptions;
use crate::store::{CollectionStore, ComponentStore, EntryStore, FieldStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;
use vellum_settings::{
	FieldDefinition, JsonMap, Section, deep_merge, is_valid_api_id, merge_record_section,
	migrate_record,
};

#[derive(Debug, Default)]
struct Tables {
	fields: Vec<Value>,
	collections: Vec<Collection>,
	components: Vec<Component>,
	entries: Vec<Entry>,
}

/// Record keys an update may not rewrite.
const IMMUTABLE_KEYS: [&str; 5] = ["id", "api_id", "apiId", "collection_id", "collectionId"];

fn record_id(record: &Value) -> Option<&str> {
	record.get("id").and_then(Value::as_str)
}

fn new_id() -> String {
	Uuid::new_v4().to_string()
}

/// In-memory implementation of all stores
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	tables: Arc<RwLock<Tables>>,
	dual_write: bool,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_options(options: &AdminOptions) -> Self {
		Self::new().with_dual_write(options.legacy_dual_write)
	}

	/// Keep top-level section copies of legacy records updated alongside the
	/// nested ones.
	pub fn with_dual_write(mut self, dual_write: bool) -> Self {
		self.dual_write = dual_write;
		self
	}

	/// Stores a raw field record as-is, e.g. one imported from an older
	/// deployment. A record without an id gets one.
	pub fn insert_field_record(&self, mut record: Value) -> String {
		let id = record_id(&record).map(str::to_string).unwrap_or_else(new_id);
		if let Value::Object(map) = &mut record {
			map.insert("id".to_string(), Value::String(id.clone()));
		}
		self.tables.write().fields.push(record);
		id
	}

	/// Raw stored record of a field.
	pub fn field_record(&self, field_id: &str) -> Option<Value> {
		self.tables
			.read()
			.fields
			.iter()
			.find(|r| record_id(r) == Some(field_id))
			.cloned()
	}

	fn fields_of(tables: &Tables, collection_id: &str) -> Vec<FieldDefinition> {
		let mut fields: Vec<_> = tables
			.fields
			.iter()
			.map(migrate_record)
			.filter(|f| f.collection_id.as_deref() == Some(collection_id))
			.collect();
		fields.sort_by_key(|f| f.sort_order);
		fields
	}

	/// Applies a partial record to a stored one.
	///
	/// Known settings sections go through the section merge, so flat legacy
	/// copies are folded, or patched alongside the nested copy when dual
	/// writes are on. Anything else is deep-merged. The id, api id and owning collection never
	/// change; payload keys naming them are dropped.
	fn apply_update(&self, record: &Value, payload: Value) -> AdminResult<Value> {
		let Value::Object(mut patch) = payload else {
			return Err(AdminError::Validation(
				"update payload must be a JSON object".to_string(),
			));
		};
		for key in IMMUTABLE_KEYS {
			patch.remove(key);
		}
		let settings_patch = match patch.remove("settings") {
			Some(Value::Object(settings)) => settings,
			Some(_) => {
				return Err(AdminError::Validation(
					"settings in an update payload must be a JSON object".to_string(),
				));
			}
			None => JsonMap::new(),
		};

		let mut sections = Vec::new();
		let mut other_settings = JsonMap::new();
		for (key, value) in settings_patch {
			match (key.parse::<Section>(), value) {
				(Ok(section), Value::Object(section_patch)) => sections.push((section, section_patch)),
				(_, value) => {
					other_settings.insert(key, value);
				}
			}
		}
		if !other_settings.is_empty() {
			let mut nested = JsonMap::new();
			nested.insert("settings".to_string(), Value::Object(other_settings));
			deep_merge(&mut patch, &nested);
		}

		let mut next = record.as_object().cloned().unwrap_or_default();
		deep_merge(&mut next, &patch);
		let mut next = Value::Object(next);
		for (section, section_patch) in sections {
			next = merge_record_section(&next, section, &section_patch, self.dual_write);
		}
		Ok(next)
	}
}

#[async_trait]
impl FieldStore for MemoryStore {
	async fn create_field(&self, collection_id: &str, field: NewField) -> AdminResult<FieldDefinition> {
		let api_id = field.resolved_api_id();
		if !is_valid_api_id(&api_id) {
			return Err(AdminError::Validation(format!(
				"'{api_id}' is not a valid api id"
			)));
		}

		let mut tables = self.tables.write();
		let siblings = Self::fields_of(&tables, collection_id);
		if siblings.iter().any(|f| f.api_id == api_id) {
			return Err(AdminError::Duplicate {
				kind: "Field",
				api_id,
			});
		}

		let created = FieldDefinition {
			id: new_id(),
			name: field.name,
			api_id,
			field_type: field.field_type,
			collection_id: Some(collection_id.to_string()),
			description: field.description,
			required: field.required,
			sort_order: siblings
				.iter()
				.map(|f| f.sort_order)
				.max()
				.map_or(0, |last| last + 1),
			settings: field.settings,
		};
		tables.fields.push(created.to_record());
		Ok(created)
	}

	async fn update_field(&self, field_id: &str, payload: Value) -> AdminResult<FieldDefinition> {
		let mut tables = self.tables.write();
		let record = tables
			.fields
			.iter_mut()
			.find(|r| record_id(r) == Some(field_id))
			.ok_or_else(|| AdminError::NotFound {
				kind: "Field",
				id: field_id.to_string(),
			})?;
		let next = self.apply_update(record, payload)?;
		*record = next;
		Ok(migrate_record(record))
	}

	async fn delete_field(&self, field_id: &str) -> AdminResult<()> {
		let mut tables = self.tables.write();
		let before = tables.fields.len();
		tables.fields.retain(|r| record_id(r) != Some(field_id));
		if tables.fields.len() == before {
			return Err(AdminError::NotFound {
				kind: "Field",
				id: field_id.to_string(),
			});
		}
		Ok(())
	}

	async fn reorder_fields(&self, collection_id: &str, ordered_ids: &[String]) -> AdminResult<()> {
		let mut tables = self.tables.write();
		let mut current: Vec<String> = Self::fields_of(&tables, collection_id)
			.into_iter()
			.map(|f| f.id)
			.collect();
		let mut requested = ordered_ids.to_vec();
		current.sort();
		requested.sort();
		if current != requested {
			return Err(AdminError::Validation(
				"reorder must list every field of the collection exactly once".to_string(),
			));
		}

		for (position, id) in ordered_ids.iter().enumerate() {
			if let Some(Value::Object(record)) = tables
				.fields
				.iter_mut()
				.find(|r| record_id(r) == Some(id.as_str()))
			{
				record.insert("sort_order".to_string(), Value::from(position as i64));
				record.remove("sortOrder");
			}
		}
		Ok(())
	}

	async fn list_fields(&self, collection_id: &str) -> AdminResult<Vec<FieldDefinition>> {
		Ok(Self::fields_of(&self.tables.read(), collection_id))
	}
}

#[async_trait]
impl CollectionStore for MemoryStore {
	async fn create_collection(&self, mut collection: Collection) -> AdminResult<Collection> {
		let mut tables = self.tables.write();
		if tables
			.collections
			.iter()
			.any(|c| c.api_id == collection.api_id)
		{
			return Err(AdminError::Duplicate {
				kind: "Collection",
				api_id: collection.api_id,
			});
		}
		if collection.id.is_empty() {
			collection.id = new_id();
		}
		tables.collections.push(collection.clone());
		Ok(collection)
	}

	async fn update_collection(&self, collection: Collection) -> AdminResult<Collection> {
		let mut tables = self.tables.write();
		let slot = tables
			.collections
			.iter_mut()
			.find(|c| c.id == collection.id)
			.ok_or_else(|| AdminError::NotFound {
				kind: "Collection",
				id: collection.id.clone(),
			})?;
		*slot = collection.clone();
		Ok(collection)
	}

	/// Deletes a collection together with its fields and entries.
	async fn delete_collection(&self, id: &str) -> AdminResult<()> {
		let mut tables = self.tables.write();
		let before = tables.collections.len();
		tables.collections.retain(|c| c.id != id);
		if tables.collections.len() == before {
			return Err(AdminError::NotFound {
				kind: "Collection",
				id: id.to_string(),
			});
		}
		tables
			.fields
			.retain(|r| migrate_record(r).collection_id.as_deref() != Some(id));
		tables.entries.retain(|e| e.collection_id != id);
		Ok(())
	}

	async fn get_collection(&self, id: &str) -> AdminResult<Option<Collection>> {
		Ok(self
			.tables
			.read()
			.collections
			.iter()
			.find(|c| c.id == id)
			.cloned())
	}

	async fn list_collections(&self) -> AdminResult<Vec<Collection>> {
		Ok(self.tables.read().collections.clone())
	}
}

#[async_trait]
impl ComponentStore for MemoryStore {
	async fn create_component(&self, mut component: Component) -> AdminResult<Component> {
		let mut tables = self.tables.write();
		if tables
			.components
			.iter()
			.any(|c| c.api_id == component.api_id)
		{
			return Err(AdminError::Duplicate {
				kind: "Component",
				api_id: component.api_id,
			});
		}
		if component.id.is_empty() {
			component.id = new_id();
		}
		tables.components.push(component.clone());
		Ok(component)
	}

	async fn update_component(&self, component: Component) -> AdminResult<Component> {
		let mut tables = self.tables.write();
		let slot = tables
			.components
			.iter_mut()
			.find(|c| c.id == component.id)
			.ok_or_else(|| AdminError::NotFound {
				kind: "Component",
				id: component.id.clone(),
			})?;
		*slot = component.clone();
		Ok(component)
	}

	async fn delete_component(&self, id: &str) -> AdminResult<()> {
		let mut tables = self.tables.write();
		let before = tables.components.len();
		tables.components.retain(|c| c.id != id);
		if tables.components.len() == before {
			return Err(AdminError::NotFound {
				kind: "Component",
				id: id.to_string(),
			});
		}
		Ok(())
	}

	async fn get_component(&self, id: &str) -> AdminResult<Option<Component>> {
		Ok(self
			.tables
			.read()
			.components
			.iter()
			.find(|c| c.id == id)
			.cloned())
	}

	async fn list_components(&self) -> AdminResult<Vec<Component>> {
		Ok(self.tables.read().components.clone())
	}
}

#[async_trait]
impl EntryStore for MemoryStore {
	async fn save_entry(&self, collection_id: &str, data: JsonMap) -> AdminResult<Entry> {
		let entry = Entry {
			id: new_id(),
			collection_id: collection_id.to_string(),
			data,
		};
		self.tables.write().entries.push(entry.clone());
		Ok(entry)
	}

	async fn list_entries(&self, collection_id: &str) -> AdminResult<Vec<Entry>> {
		Ok(self
			.tables
			.read()
			.entries
			.iter()
			.filter(|e| e.collection_id == collection_id)
			.cloned()
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use vellum_settings::FieldType;

	#[rstest]
	#[tokio::test]
	async fn test_create_field_assigns_id_and_order() {
		// Arrange
		let store = MemoryStore::new();

		// Act
		let first = store
			.create_field("posts", NewField::new("Title", FieldType::Text))
			.await
			.unwrap();
		let second = store
			.create_field("posts", NewField::new("Body", FieldType::RichText))
			.await
			.unwrap();

		// Assert
		assert!(Uuid::parse_str(&first.id).is_ok());
		assert_eq!((first.sort_order, second.sort_order), (0, 1));
		assert_eq!(store.list_fields("posts").await.unwrap().len(), 2);
		assert!(store.list_fields("pages").await.unwrap().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_duplicate_api_id_is_rejected() {
		let store = MemoryStore::new();
		store
			.create_field("posts", NewField::new("Title", FieldType::Text))
			.await
			.unwrap();

		let result = store
			.create_field("posts", NewField::new("title", FieldType::Textarea))
			.await;

		assert!(matches!(result, Err(AdminError::Duplicate { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_invalid_explicit_api_id_is_rejected() {
		let store = MemoryStore::new();

		let result = store
			.create_field("posts", NewField::new("Title", FieldType::Text).with_api_id("Not Valid"))
			.await;

		assert!(matches!(result, Err(AdminError::Validation(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_update_field_deep_merges_sections() {
		// Arrange
		let store = MemoryStore::new();
		let field = store
			.create_field(
				"posts",
				NewField::new("Title", FieldType::Text)
					.with_section(Section::Appearance, json!({"colors": {"border": "#111"}})),
			)
			.await
			.unwrap();

		// Act
		let updated = store
			.update_field(
				&field.id,
				json!({"settings": {"appearance": {"uiVariant": "pill", "colors": {"text": "#222"}}}}),
			)
			.await
			.unwrap();

		// Assert
		let appearance = updated.settings.appearance.to_map();
		assert_eq!(
			Value::Object(appearance),
			json!({"uiVariant": "pill", "colors": {"border": "#111", "text": "#222"}})
		);
		assert_eq!(updated.id, field.id);
	}

	#[rstest]
	#[tokio::test]
	async fn test_update_legacy_record_with_and_without_dual_write() {
		let legacy = json!({
			"id": "legacy-1",
			"name": "Title",
			"collection_id": "posts",
			"type": "text",
			"validation": {"required": true}
		});
		let payload = json!({"settings": {"validation": {"minLength": 2}}});

		let folding = MemoryStore::new();
		folding.insert_field_record(legacy.clone());
		folding.update_field("legacy-1", payload.clone()).await.unwrap();
		let folded = folding.field_record("legacy-1").unwrap();

		let syncing = MemoryStore::new().with_dual_write(true);
		syncing.insert_field_record(legacy);
		syncing.update_field("legacy-1", payload).await.unwrap();
		let synced = syncing.field_record("legacy-1").unwrap();

		let expected = json!({"required": true, "minLength": 2});
		assert!(folded.get("validation").is_none());
		assert_eq!(folded["settings"]["validation"], expected);
		assert_eq!(synced["validation"], expected);
		assert_eq!(synced["settings"]["validation"], json!({"minLength": 2}));
		let field = syncing.list_fields("posts").await.unwrap().remove(0);
		assert_eq!(Value::Object(field.settings.validation.to_map()), expected);
	}

	#[rstest]
	#[tokio::test]
	async fn test_update_cannot_rename_or_move_field() {
		// Arrange
		let store = MemoryStore::new();
		let field = store
			.create_field("posts", NewField::new("Title", FieldType::Text))
			.await
			.unwrap();

		// Act
		let updated = store
			.update_field(
				&field.id,
				json!({
					"id": "other",
					"api_id": "headline",
					"apiId": "headline",
					"collection_id": "pages",
					"collectionId": "pages",
					"name": "Headline"
				}),
			)
			.await
			.unwrap();

		// Assert
		assert_eq!(updated.id, field.id);
		assert_eq!(updated.api_id, "title");
		assert_eq!(updated.collection_id.as_deref(), Some("posts"));
		assert_eq!(updated.name, "Headline");
		assert!(store.list_fields("pages").await.unwrap().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_after_delete_takes_next_free_order() {
		// Arrange
		let store = MemoryStore::new();
		let mut created = Vec::new();
		for name in ["Alpha", "Beta", "Gamma"] {
			created.push(
				store
					.create_field("posts", NewField::new(name, FieldType::Text))
					.await
					.unwrap(),
			);
		}
		store.delete_field(&created[1].id).await.unwrap();

		// Act
		let delta = store
			.create_field("posts", NewField::new("Delta", FieldType::Text))
			.await
			.unwrap();

		// Assert
		assert_eq!(delta.sort_order, 3);
		let orders: Vec<_> = store
			.list_fields("posts")
			.await
			.unwrap()
			.iter()
			.map(|f| f.sort_order)
			.collect();
		assert_eq!(orders, [0, 2, 3]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_update_help_text_and_top_level_keys() {
		let store = MemoryStore::new();
		let field = store
			.create_field("posts", NewField::new("Title", FieldType::Text))
			.await
			.unwrap();

		let updated = store
			.update_field(
				&field.id,
				json!({"id": "hijack", "required": true, "settings": {"helpText": "Hint"}}),
			)
			.await
			.unwrap();

		assert_eq!(updated.id, field.id);
		assert!(updated.required);
		assert_eq!(updated.help_text(), Some("Hint"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_reorder_requires_full_permutation() {
		// Arrange
		let store = MemoryStore::new();
		let mut ids = Vec::new();
		for name in ["A", "B", "C"] {
			let field = store
				.create_field("posts", NewField::new(name, FieldType::Text))
				.await
				.unwrap();
			ids.push(field.id);
		}

		// Act
		let partial = store.reorder_fields("posts", &ids[..2]).await;
		ids.reverse();
		store.reorder_fields("posts", &ids).await.unwrap();

		// Assert
		assert!(matches!(partial, Err(AdminError::Validation(_))));
		let names: Vec<_> = store
			.list_fields("posts")
			.await
			.unwrap()
			.into_iter()
			.map(|f| f.name)
			.collect();
		assert_eq!(names, ["C", "B", "A"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_field_is_not_found() {
		let store = MemoryStore::new();

		assert!(matches!(
			store.update_field("nope", json!({})).await,
			Err(AdminError::NotFound { kind: "Field", .. })
		));
		assert!(matches!(
			store.delete_field("nope").await,
			Err(AdminError::NotFound { .. })
		));
	}

	#[rstest]
	#[tokio::test]
	async fn test_delete_collection_cascades() {
		let store = MemoryStore::new();
		let collection = store
			.create_collection(Collection::new("Posts"))
			.await
			.unwrap();
		store
			.create_field(&collection.id, NewField::new("Title", FieldType::Text))
			.await
			.unwrap();
		store
			.save_entry(&collection.id, JsonMap::new())
			.await
			.unwrap();

		store.delete_collection(&collection.id).await.unwrap();

		assert!(store.get_collection(&collection.id).await.unwrap().is_none());
		assert!(store.list_fields(&collection.id).await.unwrap().is_empty());
		assert!(store.list_entries(&collection.id).await.unwrap().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_component_crud() {
		let store = MemoryStore::new();
		let mut component = store
			.create_component(Component::new("Call To Action").with_category("marketing"))
			.await
			.unwrap();

		component.name = "CTA".to_string();
		store.update_component(component.clone()).await.unwrap();
		let duplicate = store.create_component(Component::new("Call To Action")).await;

		assert_eq!(store.list_components().await.unwrap(), vec![component.clone()]);
		assert!(matches!(duplicate, Err(AdminError::Duplicate { .. })));
		store.delete_component(&component.id).await.unwrap();
		assert!(store.get_component(&component.id).await.unwrap().is_none());
	}
}
