//! DocumentStore - named collections of JSON documents
//!
//! Thread-safe: each collection sits behind its own RwLock. Every write
//! publishes a fresh snapshot of the collection to its subscribers.

use super::file_backend::FileBackend;
use crate::subscription::{Snapshot, Subscription};
use opsdesk_domain::{Document, DocumentId, Repository, RepositoryError, Stored};
use serde_json::Value;
use shared::{Collection, OpsError};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collection file {} is not valid JSON: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to acquire {0} lock")]
    Lock(&'static str),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        RepositoryError::PersistenceError {
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for OpsError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io(err) => OpsError::Io(err),
            other => OpsError::Store(other.to_string()),
        }
    }
}

#[derive(Debug)]
struct CollectionState {
    documents: BTreeMap<String, Value>,
    version: u64,
    tx: watch::Sender<Snapshot>,
}

impl CollectionState {
    fn new(collection: Collection, documents: BTreeMap<String, Value>) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::empty(collection));
        let state = Self {
            documents,
            version: 0,
            tx,
        };
        state.tx.send_replace(state.snapshot(collection));
        state
    }

    fn snapshot(&self, collection: Collection) -> Snapshot {
        Snapshot {
            collection,
            version: self.version,
            documents: Arc::new(
                self.documents
                    .iter()
                    .map(|(id, value)| (DocumentId::new(id.clone()), value.clone()))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug)]
struct StoreInner {
    collections: HashMap<Collection, RwLock<CollectionState>>,
    backend: Option<FileBackend>,
    /// Bumped on every write to any collection
    revision: watch::Sender<u64>,
}

/// Document store shared by every page
///
/// Cloning is cheap; clones share the same collections.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    inner: Arc<StoreInner>,
}

impl DocumentStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        let collections = Collection::all()
            .iter()
            .map(|c| (*c, RwLock::new(CollectionState::new(*c, BTreeMap::new()))))
            .collect();
        Self::from_parts(collections, None)
    }

    /// Store backed by one JSON file per collection under `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let backend = FileBackend::new(dir)?;
        let mut collections = HashMap::new();
        let mut total = 0;
        for collection in Collection::all() {
            let documents = backend.load(*collection)?;
            total += documents.len();
            collections.insert(
                *collection,
                RwLock::new(CollectionState::new(*collection, documents)),
            );
        }
        info!(dir = %backend.dir().display(), documents = total, "Opened document store");
        Ok(Self::from_parts(collections, Some(backend)))
    }

    fn from_parts(
        collections: HashMap<Collection, RwLock<CollectionState>>,
        backend: Option<FileBackend>,
    ) -> Self {
        let (revision, _rx) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                collections,
                backend,
                revision,
            }),
        }
    }

    /// Directory the store persists to, if any
    pub fn data_dir(&self) -> Option<&Path> {
        self.inner.backend.as_ref().map(|b| b.dir())
    }

    // Every collection is registered at construction.
    fn slot(&self, collection: Collection) -> &RwLock<CollectionState> {
        &self.inner.collections[&collection]
    }

    fn read(&self, collection: Collection) -> Result<RwLockReadGuard<'_, CollectionState>, StoreError> {
        self.slot(collection).read().map_err(|_| StoreError::Lock("read"))
    }

    fn write(&self, collection: Collection) -> Result<RwLockWriteGuard<'_, CollectionState>, StoreError> {
        self.slot(collection).write().map_err(|_| StoreError::Lock("write"))
    }

    /// Create or replace a document; returns the collection's new version
    ///
    /// With file backing, the collection file is re-read under the write lock
    /// and this one document merged into it, so documents written by other
    /// processes sharing the directory are kept.
    pub fn put(&self, collection: Collection, id: &DocumentId, value: Value) -> Result<u64, StoreError> {
        let key = id.as_str().to_string();
        let mut state = self.write(collection)?;

        match &self.inner.backend {
            Some(backend) => {
                let mut documents = backend.load(collection)?;
                documents.insert(key, value);
                if let Err(err) = backend.write(collection, &documents) {
                    warn!(collection = %collection, id = %id, error = %err, "Write failed");
                    return Err(err);
                }
                state.documents = documents;
            }
            None => {
                state.documents.insert(key, value);
            }
        }

        state.version += 1;
        let version = state.version;
        let snapshot = state.snapshot(collection);
        state.tx.send_replace(snapshot);
        drop(state);

        self.inner.revision.send_modify(|r| *r += 1);
        debug!(collection = %collection, id = %id, version, "Document written");
        Ok(version)
    }

    pub fn get(&self, collection: Collection, id: &DocumentId) -> Result<Option<Value>, StoreError> {
        Ok(self.read(collection)?.documents.get(id.as_str()).cloned())
    }

    /// All documents of a collection, ordered by id
    pub fn list(&self, collection: Collection) -> Result<Vec<(DocumentId, Value)>, StoreError> {
        let state = self.read(collection)?;
        Ok(state
            .documents
            .iter()
            .map(|(id, value)| (DocumentId::new(id.clone()), value.clone()))
            .collect())
    }

    pub fn count(&self, collection: Collection) -> Result<usize, StoreError> {
        Ok(self.read(collection)?.documents.len())
    }

    /// Current version of a collection (0 until the first write)
    pub fn version(&self, collection: Collection) -> Result<u64, StoreError> {
        Ok(self.read(collection)?.version)
    }

    /// Subscribe to a collection's snapshots
    ///
    /// The current snapshot counts as unseen, so the first
    /// `take_if_changed` delivers it.
    pub fn subscribe(&self, collection: Collection) -> Subscription {
        let state = self.slot(collection).read().unwrap_or_else(|p| p.into_inner());
        let mut rx = state.tx.subscribe();
        rx.mark_changed();
        Subscription::new(collection, rx)
    }

    /// Re-read every collection file and publish the ones that changed
    ///
    /// Picks up writes made by other processes sharing the data directory.
    /// Returns how many collections changed; always 0 for an in-memory store.
    pub fn refresh(&self) -> Result<usize, StoreError> {
        let Some(backend) = &self.inner.backend else {
            return Ok(0);
        };
        let mut changed = 0;
        for collection in Collection::all() {
            let documents = backend.load(*collection)?;
            let mut state = self.write(*collection)?;
            if state.documents == documents {
                continue;
            }
            state.documents = documents;
            state.version += 1;
            let snapshot = state.snapshot(*collection);
            state.tx.send_replace(snapshot);
            changed += 1;
            debug!(collection = %collection, version = state.version, "Collection reloaded");
        }
        if changed > 0 {
            self.inner.revision.send_modify(|r| *r += 1);
        }
        Ok(changed)
    }

    /// Receiver that ticks on every write to any collection
    pub fn revisions(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }
}

/// Decode raw documents into records, skipping any that don't fit the shape
pub fn decode_documents<T: Document>(documents: &[(DocumentId, Value)]) -> Vec<Stored<T>> {
    documents
        .iter()
        .filter_map(|(id, value)| match serde_json::from_value::<T>(value.clone()) {
            Ok(record) => Some(Stored::new(id.clone(), record)),
            Err(err) => {
                warn!(collection = %T::COLLECTION, id = %id, error = %err, "Skipping undecodable document");
                None
            }
        })
        .collect()
}

impl<T: Document> Repository<T> for DocumentStore {
    fn save(&self, id: &DocumentId, record: &T) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(record).map_err(|e| RepositoryError::PersistenceError {
            message: e.to_string(),
        })?;
        self.put(T::COLLECTION, id, value)?;
        Ok(())
    }

    fn find_by_id(&self, id: &DocumentId) -> Result<Option<T>, RepositoryError> {
        match self.get(T::COLLECTION, id)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| RepositoryError::DecodeError {
                    collection: T::COLLECTION.to_string(),
                    id: id.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn list_all(&self) -> Result<Vec<Stored<T>>, RepositoryError> {
        Ok(decode_documents(&self.list(T::COLLECTION)?))
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(DocumentStore::count(self, T::COLLECTION)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use opsdesk_domain::{Client, ClientStatus, Order};
    use serde_json::json;

    fn client(shop: &str) -> Client {
        Client::new(shop, "Corner Store", "Ravi")
            .with_kyc_date(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap())
    }

    #[test]
    fn test_put_get_list() {
        let store = DocumentStore::in_memory();
        store
            .put(Collection::Agents, &DocumentId::new("b"), json!({ "n": 2 }))
            .unwrap();
        store
            .put(Collection::Agents, &DocumentId::new("a"), json!({ "n": 1 }))
            .unwrap();

        let listed = store.list(Collection::Agents).unwrap();
        let ids: Vec<_> = listed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.count(Collection::Agents).unwrap(), 2);
        assert_eq!(store.count(Collection::Clients).unwrap(), 0);
        assert_eq!(
            store.get(Collection::Agents, &DocumentId::new("a")).unwrap(),
            Some(json!({ "n": 1 }))
        );
    }

    #[test]
    fn test_typed_repository() {
        let store = DocumentStore::in_memory();
        let id = DocumentId::new("c-1");

        let mut record = client("SH-1");
        store.save(&id, &record).unwrap();

        record.status = ClientStatus::Active;
        store.save(&id, &record).unwrap();

        let found = Repository::<Client>::get(&store, &id).unwrap();
        assert_eq!(found.status, ClientStatus::Active);
        assert_eq!(Repository::<Client>::count(&store).unwrap(), 1);
        assert_eq!(store.version(Collection::Clients).unwrap(), 2);
    }

    #[test]
    fn test_undecodable_documents_are_skipped() {
        let store = DocumentStore::in_memory();
        store.save(&DocumentId::new("good"), &client("SH-1")).unwrap();
        store
            .put(Collection::Clients, &DocumentId::new("bad"), json!({ "shopId": 7 }))
            .unwrap();

        let clients: Vec<Stored<Client>> = store.list_all().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].id.as_str(), "good");

        let err = Repository::<Client>::find_by_id(&store, &DocumentId::new("bad")).unwrap_err();
        assert!(matches!(err, RepositoryError::DecodeError { .. }));
    }

    #[test]
    fn test_subscription_keeps_only_latest_snapshot() {
        let store = DocumentStore::in_memory();
        let mut sub = store.subscribe(Collection::Orders);

        // Initial state is delivered once
        let initial = sub.take_if_changed().unwrap();
        assert_eq!(initial.version, 0);
        assert!(initial.is_empty());
        assert!(sub.take_if_changed().is_none());

        for n in 0..3 {
            let order = Order::new("Ravi", format!("SH-{}", n), "Pune", 100.0);
            store.save(&DocumentId::new(format!("o-{}", n)), &order).unwrap();
        }

        let latest = sub.take_if_changed().unwrap();
        assert_eq!(latest.version, 3);
        assert_eq!(latest.len(), 3);
        assert!(sub.take_if_changed().is_none());
    }

    #[test]
    fn test_writes_to_other_collections_do_not_notify() {
        let store = DocumentStore::in_memory();
        let mut sub = store.subscribe(Collection::Orders);
        sub.latest();

        store.save(&DocumentId::new("c-1"), &client("SH-1")).unwrap();
        assert!(sub.take_if_changed().is_none());
    }

    #[test]
    fn test_revision_ticks_on_any_write() {
        let store = DocumentStore::in_memory();
        let rx = store.revisions();
        store.save(&DocumentId::new("c-1"), &client("SH-1")).unwrap();
        store
            .save(&DocumentId::new("o-1"), &Order::new("Ravi", "SH-1", "Pune", 10.0))
            .unwrap();
        assert_eq!(*rx.borrow(), 2);
    }

    #[tokio::test]
    async fn test_changed_wakes_on_write() {
        let store = DocumentStore::in_memory();
        let mut sub = store.subscribe(Collection::Clients);
        sub.latest();

        let writer = store.clone();
        let handle = tokio::spawn(async move {
            writer
                .save(&DocumentId::new("c-1"), &client("SH-1"))
                .unwrap();
        });

        let snapshot = sub.changed().await.unwrap();
        handle.await.unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.documents[0].0.as_str(), "c-1");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = DocumentStore::open(dir.path()).unwrap();
            store.save(&DocumentId::new("c-1"), &client("SH-1")).unwrap();
            assert_eq!(store.data_dir(), Some(dir.path()));
        }

        assert!(dir.path().join("clients.json").exists());

        let reopened = DocumentStore::open(dir.path()).unwrap();
        let found: Option<Client> = reopened.find_by_id(&DocumentId::new("c-1")).unwrap();
        assert_eq!(found.unwrap().shop_id, "SH-1");

        // Loaded documents are visible to new subscribers
        let mut sub = reopened.subscribe(Collection::Clients);
        assert_eq!(sub.latest().len(), 1);
    }

    #[test]
    fn test_refresh_picks_up_foreign_writes() {
        let dir = tempfile::tempdir().unwrap();
        let reader = DocumentStore::open(dir.path()).unwrap();
        let writer = DocumentStore::open(dir.path()).unwrap();
        let mut sub = reader.subscribe(Collection::Clients);
        sub.take_if_changed();

        assert_eq!(reader.refresh().unwrap(), 0);
        assert!(sub.take_if_changed().is_none());

        writer
            .put(Collection::Clients, &DocumentId::new("c1"), serde_json::to_value(client("S-1")).unwrap())
            .unwrap();

        assert_eq!(reader.refresh().unwrap(), 1);
        assert_eq!(reader.count(Collection::Clients).unwrap(), 1);
        assert_eq!(sub.take_if_changed().unwrap().len(), 1);
        assert_eq!(DocumentStore::in_memory().refresh().unwrap(), 0);
    }

    #[test]
    fn test_write_keeps_documents_from_another_process() {
        let dir = tempfile::tempdir().unwrap();
        let shell = DocumentStore::open(dir.path()).unwrap();
        let one_shot = DocumentStore::open(dir.path()).unwrap();

        one_shot.save(&DocumentId::new("from-cli"), &client("S-1")).unwrap();
        shell.save(&DocumentId::new("from-shell"), &client("S-2")).unwrap();

        let reopened = DocumentStore::open(dir.path()).unwrap();
        let ids: Vec<_> = reopened
            .list(Collection::Clients)
            .unwrap()
            .into_iter()
            .map(|(id, _)| id.to_string())
            .collect();
        assert_eq!(ids, vec!["from-cli", "from-shell"]);

        // The writer's own view picks up the merged document too
        assert_eq!(shell.count(Collection::Clients).unwrap(), 2);
    }

    #[test]
    fn test_failed_write_leaves_collection_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).unwrap();
        store.save(&DocumentId::new("c1"), &client("S-1")).unwrap();
        std::fs::create_dir(dir.path().join("clients.json.tmp")).unwrap();

        assert!(store.save(&DocumentId::new("c2"), &client("S-2")).is_err());
        assert_eq!(store.count(Collection::Clients).unwrap(), 1);
        assert_eq!(store.version(Collection::Clients).unwrap(), 1);
    }

    #[test]
    fn test_corrupt_collection_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orders.json"), "{ not json").unwrap();

        let err = DocumentStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
