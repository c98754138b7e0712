//! Persistence collaborators
//!
//! The hosted data store sits behind these traits. Every call may fail with
//! [`AdminError::Persistence`]; callers keep their local state when it does.

use crate::error::{AdminError, AdminResult};
use crate::models::{Collection, Component, Entry, NewField};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use vellum_settings::{FieldDefinition, JsonMap};

/// Storage of field definitions.
#[async_trait]
pub trait FieldStore: Send + Sync {
	/// Creates a field in a collection and returns it with its id assigned.
	async fn create_field(&self, collection_id: &str, field: NewField) -> AdminResult<FieldDefinition>;

	/// Deep-merges `payload` into the stored record of a field.
	///
	/// Payloads are partial records such as
	/// `{"settings": {"appearance": {"uiVariant": "pill"}}}`; the store is
	/// the side that merges. The id, api id and collection of a field are
	/// fixed at creation and are not changed by an update.
	async fn update_field(&self, field_id: &str, payload: Value) -> AdminResult<FieldDefinition>;

	async fn delete_field(&self, field_id: &str) -> AdminResult<()>;

	/// Persists a new field order; `ordered_ids` lists every field of the
	/// collection.
	async fn reorder_fields(&self, collection_id: &str, ordered_ids: &[String]) -> AdminResult<()>;

	/// Fields of a collection, ordered by `sort_order`.
	async fn list_fields(&self, collection_id: &str) -> AdminResult<Vec<FieldDefinition>>;
}

/// Storage of collections.
#[async_trait]
pub trait CollectionStore: Send + Sync {
	async fn create_collection(&self, collection: Collection) -> AdminResult<Collection>;
	async fn update_collection(&self, collection: Collection) -> AdminResult<Collection>;
	async fn delete_collection(&self, id: &str) -> AdminResult<()>;
	async fn get_collection(&self, id: &str) -> AdminResult<Option<Collection>>;
	async fn list_collections(&self) -> AdminResult<Vec<Collection>>;
}

/// Storage of components.
#[async_trait]
pub trait ComponentStore: Send + Sync {
	async fn create_component(&self, component: Component) -> AdminResult<Component>;
	async fn update_component(&self, component: Component) -> AdminResult<Component>;
	async fn delete_component(&self, id: &str) -> AdminResult<()>;
	async fn get_component(&self, id: &str) -> AdminResult<Option<Component>>;
	async fn list_components(&self) -> AdminResult<Vec<Component>>;
}

/// Storage of submitted content.
#[async_trait]
pub trait EntryStore: Send + Sync {
	async fn save_entry(&self, collection_id: &str, data: JsonMap) -> AdminResult<Entry>;
	async fn list_entries(&self, collection_id: &str) -> AdminResult<Vec<Entry>>;
}

/// Awaits a store call, giving up after `limit` when one is set.
///
/// Without a limit the call is awaited for as long as it takes.
pub async fn bounded<T, F>(limit: Option<Duration>, call: F) -> AdminResult<T>
where
	F: Future<Output = AdminResult<T>>,
{
	match limit {
		Some(limit) => tokio::time::timeout(limit, call)
			.await
			.map_err(|_| AdminError::Timeout(limit))?,
		None => call.await,
	}
}
