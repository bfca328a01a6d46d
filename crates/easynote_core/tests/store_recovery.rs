use async_trait::async_trait;
use easynote_core::{
    FaultKind, KeyValueStore, KvError, KvResult, MemoryKv, Note, NoteStore, StoreError, NOTES_KEY,
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Backend fake whose read/write paths can be failed at will.
#[derive(Clone, Default)]
struct FlakyKv {
    inner: MemoryKv,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyKv {
    fn failing_reads() -> Self {
        let kv = Self::default();
        kv.fail_reads.store(true, Ordering::SeqCst);
        kv
    }

    fn failing_writes() -> Self {
        let kv = Self::default();
        kv.fail_writes.store(true, Ordering::SeqCst);
        kv
    }

    fn recover(&self) {
        self.fail_reads.store(false, Ordering::SeqCst);
        self.fail_writes.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyKv {
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::Io(io::Error::new(
                io::ErrorKind::Other,
                "injected read failure",
            )));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> KvResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Io(io::Error::new(
                io::ErrorKind::Other,
                "injected write failure",
            )));
        }
        self.inner.set(key, value).await
    }
}

#[tokio::test]
async fn corrupt_document_degrades_to_empty_list_with_load_fault() {
    let kv = MemoryKv::new();
    kv.set(NOTES_KEY, b"not json at all".to_vec()).await.unwrap();

    let mut store = NoteStore::new(Box::new(kv));
    store.load().await;

    assert!(!store.is_loading());
    assert!(store.notes().is_empty());
    let fault = store.last_fault().expect("load fault should be recorded");
    assert_eq!(fault.kind, FaultKind::Load);
}

#[tokio::test]
async fn unreadable_backend_degrades_to_empty_list_with_load_fault() {
    let mut store = NoteStore::new(Box::new(FlakyKv::failing_reads()));
    store.load().await;

    assert!(!store.is_loading());
    assert!(store.notes().is_empty());
    assert_eq!(store.last_fault().unwrap().kind, FaultKind::Load);
}

#[tokio::test]
async fn missing_document_is_not_a_fault() {
    let mut store = NoteStore::new(Box::new(MemoryKv::new()));
    store.load().await;

    assert!(store.notes().is_empty());
    assert!(store.last_fault().is_none());
}

#[tokio::test]
async fn failed_write_keeps_memory_state_and_records_save_fault() {
    let kv = FlakyKv::failing_writes();
    let mut store = NoteStore::new(Box::new(kv.clone()));
    store.load().await;

    let err = store.create("unsaved", "body").await.unwrap_err();
    assert!(matches!(err, StoreError::Write(_)));

    assert_eq!(store.notes().len(), 1);
    assert_eq!(store.notes()[0].title, "unsaved");
    assert_eq!(store.last_fault().unwrap().kind, FaultKind::Save);
    assert_eq!(kv.inner.get(NOTES_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn failed_update_keeps_the_edit_in_memory() {
    let kv = FlakyKv::default();
    let mut store = NoteStore::new(Box::new(kv.clone()));
    store.load().await;
    let note = store.create("before", "v1").await.unwrap();

    kv.fail_writes.store(true, Ordering::SeqCst);
    let err = store.update(note.id, "after", "v2").await.unwrap_err();
    assert!(matches!(err, StoreError::Write(_)));
    assert_eq!(store.get(note.id).unwrap().title, "after");

    // Storage still holds the pre-edit document.
    let bytes = kv.inner.get(NOTES_KEY).await.unwrap().unwrap();
    let persisted: Vec<Note> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(persisted[0].title, "before");
}

#[tokio::test]
async fn missing_delete_does_not_touch_storage_or_the_pending_fault() {
    let kv = FlakyKv::default();
    let mut store = NoteStore::new(Box::new(kv.clone()));
    store.load().await;
    let note = store.create("kept", "v1").await.unwrap();

    kv.fail_writes.store(true, Ordering::SeqCst);
    store
        .update(note.id, "kept", "v2")
        .await
        .expect_err("write should fail");
    assert_eq!(store.last_fault().unwrap().kind, FaultKind::Save);

    // A missing id skips the write entirely, so the stale document and the
    // fault both stay until the explicit retry path runs.
    kv.recover();
    store.delete(uuid::Uuid::new_v4()).await.unwrap();
    assert_eq!(store.last_fault().unwrap().kind, FaultKind::Save);
    let bytes = kv.inner.get(NOTES_KEY).await.unwrap().unwrap();
    let persisted: Vec<Note> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(persisted[0].content, "v1");

    store.flush().await.unwrap();
    assert!(store.last_fault().is_none());
    let bytes = kv.inner.get(NOTES_KEY).await.unwrap().unwrap();
    let persisted: Vec<Note> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(persisted[0].content, "v2");
}

#[tokio::test]
async fn flush_after_recovery_completes_the_commit_and_clears_the_fault() {
    let kv = FlakyKv::failing_writes();
    let mut store = NoteStore::new(Box::new(kv.clone()));
    store.load().await;

    store
        .create("pending", "body")
        .await
        .expect_err("write should fail");
    assert!(store.last_fault().is_some());

    kv.recover();
    store.flush().await.unwrap();
    assert!(store.last_fault().is_none());

    let bytes = kv.inner.get(NOTES_KEY).await.unwrap().unwrap();
    let persisted: Vec<Note> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].title, "pending");
}

#[tokio::test]
async fn any_successful_persist_clears_an_earlier_fault() {
    let kv = FlakyKv::failing_writes();
    let mut store = NoteStore::new(Box::new(kv.clone()));
    store.load().await;

    store
        .create("first", "x")
        .await
        .expect_err("write should fail");
    assert!(store.last_fault().is_some());

    kv.recover();
    store.create("second", "y").await.unwrap();
    assert!(store.last_fault().is_none());

    // The pending first note went along with the successful write.
    let bytes = kv.inner.get(NOTES_KEY).await.unwrap().unwrap();
    let persisted: Vec<Note> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(persisted.len(), 2);
}

#[tokio::test]
async fn take_fault_acknowledges_the_fault() {
    let kv = MemoryKv::new();
    kv.set(NOTES_KEY, b"{broken".to_vec()).await.unwrap();

    let mut store = NoteStore::new(Box::new(kv));
    store.load().await;

    let fault = store.take_fault().expect("fault should be present");
    assert_eq!(fault.kind, FaultKind::Load);
    assert!(store.last_fault().is_none());
}
