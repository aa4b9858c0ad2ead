//! Subscription - a stream of whole-collection snapshots
//!
//! Built on `tokio::sync::watch`: a slow reader never sees intermediate
//! states, only the latest snapshot published for its collection.

use opsdesk_domain::DocumentId;
use serde_json::Value;
use shared::Collection;
use std::sync::Arc;
use tokio::sync::watch;

/// Every document of one collection at one version
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub collection: Collection,
    /// Bumped on every write to the collection
    pub version: u64,
    /// Documents ordered by id
    pub documents: Arc<Vec<(DocumentId, Value)>>,
}

impl Snapshot {
    pub(crate) fn empty(collection: Collection) -> Self {
        Self {
            collection,
            version: 0,
            documents: Arc::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Receiving end of one collection's snapshot stream
#[derive(Debug, Clone)]
pub struct Subscription {
    collection: Collection,
    rx: watch::Receiver<Snapshot>,
}

impl Subscription {
    pub(crate) fn new(collection: Collection, rx: watch::Receiver<Snapshot>) -> Self {
        Self { collection, rx }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Latest snapshot, marking it as seen
    pub fn latest(&mut self) -> Snapshot {
        self.rx.borrow_and_update().clone()
    }

    /// Latest snapshot if one arrived since the last call, else `None`
    pub fn take_if_changed(&mut self) -> Option<Snapshot> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.latest()),
            _ => None,
        }
    }

    /// Wait for the next snapshot
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.latest())
    }
}
