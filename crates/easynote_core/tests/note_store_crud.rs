use easynote_core::{
    KeyValueStore, MemoryKv, Note, NoteStore, StoreError, NOTES_KEY, PLACEHOLDER_TITLE,
};
use std::time::Duration;
use uuid::Uuid;

async fn fresh_store() -> NoteStore {
    let mut store = NoteStore::new(Box::new(MemoryKv::new()));
    store.load().await;
    store
}

#[tokio::test]
async fn create_assigns_identity_and_equal_timestamps() {
    let mut store = fresh_store().await;

    let note = store.create("A", "B").await.unwrap();
    assert!(!note.id.is_nil());
    assert_eq!(note.title, "A");
    assert_eq!(note.content, "B");
    assert_eq!(note.created_at, note.updated_at);
    assert_eq!(store.notes().len(), 1);
}

#[tokio::test]
async fn create_assigns_unique_ids() {
    let mut store = fresh_store().await;

    let first = store.create("a", "").await.unwrap();
    let second = store.create("b", "").await.unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn empty_title_gets_the_placeholder_on_create_and_update() {
    let mut store = fresh_store().await;

    let note = store.create("", "body").await.unwrap();
    assert_eq!(note.title, PLACEHOLDER_TITLE);

    let titled = store.create("Kept", "body").await.unwrap();
    let updated = store.update(titled.id, "", "body").await.unwrap();
    assert_eq!(updated.title, PLACEHOLDER_TITLE);
}

#[tokio::test]
async fn update_replaces_fields_and_refreshes_updated_at_only() {
    let mut store = fresh_store().await;
    let note = store.create("Draft", "v1").await.unwrap();

    // The clock is sub-millisecond; keep the two stamps clearly apart.
    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = store.update(note.id, "Final", "v2").await.unwrap();

    assert_eq!(updated.id, note.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "v2");
    assert_eq!(updated.created_at, note.created_at);
    assert!(updated.updated_at > note.updated_at);
}

#[tokio::test]
async fn update_missing_note_returns_not_found() {
    let mut store = fresh_store().await;
    store.create("present", "x").await.unwrap();

    let missing = Uuid::new_v4();
    let err = store.update(missing, "t", "c").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    assert_eq!(store.notes().len(), 1);
}

#[tokio::test]
async fn delete_removes_note_and_missing_delete_is_a_noop() {
    let mut store = fresh_store().await;
    let keep = store.create("keep", "").await.unwrap();
    let gone = store.create("gone", "").await.unwrap();

    store.delete(gone.id).await.unwrap();
    assert_eq!(store.notes().len(), 1);
    assert!(store.get(gone.id).is_none());
    assert!(store.get(keep.id).is_some());

    store.delete(gone.id).await.unwrap();
    assert_eq!(store.notes().len(), 1);
}

#[tokio::test]
async fn list_filters_case_insensitively_over_title_and_content() {
    let mut store = fresh_store().await;
    let groceries = store.create("Groceries", "milk, eggs").await.unwrap();
    store.create("Work", "standup at 10").await.unwrap();

    let by_title = store.list(Some("GROC"));
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, groceries.id);

    let by_content = store.list(Some("Eggs"));
    assert_eq!(by_content.len(), 1);
    assert_eq!(by_content[0].id, groceries.id);

    assert!(store.list(Some("meeting")).is_empty());
    assert_eq!(store.list(None).len(), 2);
    assert_eq!(store.list(Some("")).len(), 2);
}

#[tokio::test]
async fn notes_keep_creation_order() {
    let mut store = fresh_store().await;
    let a = store.create("a", "").await.unwrap();
    let b = store.create("b", "").await.unwrap();
    let c = store.create("c", "").await.unwrap();

    let ids: Vec<_> = store.notes().iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn load_of_empty_backend_yields_empty_list_and_clears_loading() {
    let mut store = NoteStore::new(Box::new(MemoryKv::new()));
    assert!(store.is_loading());

    store.load().await;
    assert!(!store.is_loading());
    assert!(store.notes().is_empty());
    assert!(store.last_fault().is_none());
}

#[tokio::test]
async fn grocery_note_lifecycle_leaves_a_clean_empty_store() {
    let backend = MemoryKv::new();
    let mut store = NoteStore::new(Box::new(backend.clone()));
    store.load().await;
    assert!(store.list(None).is_empty());

    let created = store.create("Groceries", "Milk, eggs").await.unwrap();
    let listed = store.list(None);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Groceries");
    assert_eq!(listed[0].content, "Milk, eggs");

    // The clock is sub-millisecond; keep the two stamps clearly apart.
    tokio::time::sleep(Duration::from_millis(5)).await;
    store
        .update(created.id, "Groceries", "Milk, eggs, bread")
        .await
        .unwrap();
    let listed = store.list(None);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "Milk, eggs, bread");
    assert!(listed[0].updated_at > created.updated_at);

    store.delete(created.id).await.unwrap();
    assert!(store.list(None).is_empty());

    let raw = backend.get(NOTES_KEY).await.unwrap().unwrap();
    let document: Vec<Note> = serde_json::from_slice(&raw).unwrap();
    assert!(document.is_empty());

    let mut reloaded = NoteStore::new(Box::new(backend));
    reloaded.load().await;
    assert!(reloaded.notes().is_empty());
    assert!(reloaded.last_fault().is_none());
}
