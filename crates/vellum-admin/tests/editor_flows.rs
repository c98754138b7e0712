//! Editor flows against failing, stalled and legacy stores

use async_trait::async_trait;
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use vellum_admin::{
	AdminError, AdminOptions, AdminResult, ContentEntrySession, Entry, EntryStore,
	FieldSettingsEditor, FieldStore, Level, MemoryNotifier, MemoryStore, NewField, SaveState,
	SchemaEditor, SubmitOutcome,
};
use vellum_conf::VellumSettings;
use vellum_settings::{FieldDefinition, FieldType, JsonMap, Section};

fn obj(value: Value) -> JsonMap {
	value.as_object().cloned().unwrap()
}

/// Store whose every call fails, counting the attempts.
#[derive(Default)]
struct FailingStore {
	calls: AtomicUsize,
}

impl FailingStore {
	fn fail<T>(&self) -> AdminResult<T> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Err(AdminError::Persistence("connection reset".to_string()))
	}
}

#[async_trait]
impl FieldStore for FailingStore {
	async fn create_field(&self, _: &str, _: NewField) -> AdminResult<FieldDefinition> {
		self.fail()
	}
	async fn update_field(&self, _: &str, _: Value) -> AdminResult<FieldDefinition> {
		self.fail()
	}
	async fn delete_field(&self, _: &str) -> AdminResult<()> {
		self.fail()
	}
	async fn reorder_fields(&self, _: &str, _: &[String]) -> AdminResult<()> {
		self.fail()
	}
	async fn list_fields(&self, _: &str) -> AdminResult<Vec<FieldDefinition>> {
		self.fail()
	}
}

#[async_trait]
impl EntryStore for FailingStore {
	async fn save_entry(&self, _: &str, _: JsonMap) -> AdminResult<Entry> {
		self.fail()
	}
	async fn list_entries(&self, _: &str) -> AdminResult<Vec<Entry>> {
		self.fail()
	}
}

/// Store that never answers.
struct StalledStore;

#[async_trait]
impl FieldStore for StalledStore {
	async fn create_field(&self, _: &str, _: NewField) -> AdminResult<FieldDefinition> {
		std::future::pending().await
	}
	async fn update_field(&self, _: &str, _: Value) -> AdminResult<FieldDefinition> {
		std::future::pending().await
	}
	async fn delete_field(&self, _: &str) -> AdminResult<()> {
		std::future::pending().await
	}
	async fn reorder_fields(&self, _: &str, _: &[String]) -> AdminResult<()> {
		std::future::pending().await
	}
	async fn list_fields(&self, _: &str) -> AdminResult<Vec<FieldDefinition>> {
		std::future::pending().await
	}
}

#[fixture]
fn title_field() -> FieldDefinition {
	FieldDefinition::new("f1", "Title", FieldType::Text).with_collection("posts")
}

#[rstest]
#[tokio::test]
async fn test_failed_save_keeps_local_merge(title_field: FieldDefinition) {
	// Arrange
	let store = Arc::new(FailingStore::default());
	let notifier = Arc::new(MemoryNotifier::new());
	let mut editor = FieldSettingsEditor::new(title_field, store.clone(), notifier.clone());

	// Act
	let result = editor
		.save_section(Section::Appearance, obj(json!({"uiVariant": "material"})))
		.await;

	// Assert
	assert!(matches!(result, Err(AdminError::Persistence(_))));
	assert!(matches!(editor.state(), SaveState::Failed(_)));
	assert_eq!(
		editor.section(Section::Appearance),
		obj(json!({"uiVariant": "material"}))
	);
	let last = notifier.last().unwrap();
	assert_eq!(last.level, Level::Error);
	assert!(last.message.contains("connection reset"));
	assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_stalled_save_times_out(title_field: FieldDefinition) {
	// Arrange
	let notifier = Arc::new(MemoryNotifier::new());
	let mut editor = FieldSettingsEditor::new(title_field, Arc::new(StalledStore), notifier.clone())
		.with_timeout(Duration::from_secs(5));

	// Act
	let result = editor
		.save_section(Section::Validation, obj(json!({"maxLength": 80})))
		.await;

	// Assert
	assert!(matches!(result, Err(AdminError::Timeout(d)) if d == Duration::from_secs(5)));
	assert_eq!(editor.field().settings.validation.max_length_bound(), Some(80));
	assert_eq!(notifier.last().unwrap().level, Level::Error);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_schema_editor_times_out_from_options() {
	let mut settings = VellumSettings::default();
	settings.persistence.timeout_ms = Some(250);
	let options = AdminOptions::from_settings(&settings);
	let notifier = Arc::new(MemoryNotifier::new());
	let mut editor =
		SchemaEditor::new("posts", Arc::new(StalledStore), notifier.clone()).with_options(&options);

	let result = editor.add_field(NewField::new("Title", FieldType::Text)).await;

	assert!(matches!(result, Err(AdminError::Timeout(_))));
	assert!(editor.fields().is_empty());
	assert_eq!(notifier.last().unwrap().level, Level::Error);
}

#[rstest]
#[tokio::test]
async fn test_failed_entry_submit_keeps_values() {
	// Arrange
	let store = Arc::new(FailingStore::default());
	let notifier = Arc::new(MemoryNotifier::new());
	let fields = vec![FieldDefinition::new("f1", "Title", FieldType::Text).required()];
	let mut session = ContentEntrySession::from_fields("posts", fields, store.clone(), notifier.clone());
	session.on_change("title", json!("Draft"));

	// Act
	let result = session.submit().await;

	// Assert
	assert!(matches!(result, Err(AdminError::Persistence(_))));
	assert_eq!(session.form().state().get("title"), Some(&json!("Draft")));
	assert_eq!(notifier.last().unwrap().level, Level::Error);
}

#[rstest]
#[tokio::test]
async fn test_entry_session_loads_legacy_fields() {
	// Arrange
	let store = Arc::new(MemoryStore::new());
	store.insert_field_record(json!({
		"id": "legacy-slug",
		"name": "Slug",
		"collection_id": "posts",
		"type": "slug",
		"sort_order": 1,
		"validation": {"required": true, "pattern": "^[a-z-]+$"}
	}));
	store.insert_field_record(json!({
		"id": "legacy-title",
		"name": "Title",
		"collectionId": "posts",
		"type": "text",
		"sortOrder": 0,
		"required": true
	}));
	let notifier = Arc::new(MemoryNotifier::new());

	// Act
	let mut session = ContentEntrySession::load(
		"posts",
		&*store,
		store.clone(),
		notifier.clone(),
		&AdminOptions::default(),
	)
	.await
	.unwrap();
	session.on_change("title", json!("Hello"));
	session.on_change("slug", json!("Not A Slug"));
	let invalid = session.submit().await.unwrap();
	session.on_change("slug", json!("hello-world"));
	let saved = session.submit().await.unwrap();

	// Assert
	let keys: Vec<_> = session.form().fields().iter().map(|f| f.api_id.as_str()).collect();
	assert_eq!(keys, ["title", "slug"]);
	assert!(matches!(invalid, SubmitOutcome::Invalid(ref e) if e.contains_key("slug") && !e.contains_key("title")));
	assert!(matches!(saved, SubmitOutcome::Saved(_)));
	assert_eq!(store.list_entries("posts").await.unwrap().len(), 1);
}

#[rstest]
#[case(false)]
#[case(true)]
#[tokio::test]
async fn test_settings_editor_on_legacy_record(#[case] dual_write: bool) {
	// Arrange
	let mut options = AdminOptions::default();
	options.legacy_dual_write = dual_write;
	let store = Arc::new(MemoryStore::from_options(&options));
	store.insert_field_record(json!({
		"id": "legacy-1",
		"name": "Title",
		"collection_id": "posts",
		"type": "text",
		"appearance": {"colors": {"border": "#000"}}
	}));
	let field = store.list_fields("posts").await.unwrap().remove(0);
	let mut editor = FieldSettingsEditor::new(field, store.clone(), Arc::new(MemoryNotifier::new()))
		.with_options(&options);

	// Act
	editor
		.save_section(Section::Appearance, obj(json!({"colors": {"text": "#fff"}})))
		.await
		.unwrap();

	// Assert
	let expected = json!({"colors": {"border": "#000", "text": "#fff"}});
	let record = store.field_record("legacy-1").unwrap();
	let reloaded = store.list_fields("posts").await.unwrap().remove(0);
	if dual_write {
		assert_eq!(record["appearance"], expected);
		assert_eq!(record["settings"]["appearance"], json!({"colors": {"text": "#fff"}}));
	} else {
		assert!(record.get("appearance").is_none());
		assert_eq!(record["settings"]["appearance"], expected);
	}
	assert_eq!(Value::Object(reloaded.settings.appearance.to_map()), expected);
	assert_eq!(Value::Object(editor.section(Section::Appearance)), expected);
}

#[rstest]
#[tokio::test]
async fn test_settings_editor_keeps_keys_only_in_nested_copy() {
	// Arrange
	let store = Arc::new(MemoryStore::new().with_dual_write(true));
	store.insert_field_record(json!({
		"id": "legacy-2",
		"name": "Price",
		"collection_id": "products",
		"type": "number",
		"advanced": {"prefix": "$"},
		"settings": {"advanced": {"suffix": "USD"}}
	}));
	let field = store.list_fields("products").await.unwrap().remove(0);
	let mut editor = FieldSettingsEditor::new(field, store.clone(), Arc::new(MemoryNotifier::new()));

	// Act
	editor
		.save_section(Section::Advanced, obj(json!({"locale": "en"})))
		.await
		.unwrap();

	// Assert
	let record = store.field_record("legacy-2").unwrap();
	assert_eq!(record["settings"]["advanced"], json!({"suffix": "USD", "locale": "en"}));
	assert_eq!(record["advanced"], json!({"prefix": "$", "locale": "en"}));
	let reloaded = store.list_fields("products").await.unwrap().remove(0);
	assert_eq!(reloaded.settings.advanced.suffix.as_deref(), Some("USD"));
	assert_eq!(reloaded.settings.advanced.prefix.as_deref(), Some("$"));
}
