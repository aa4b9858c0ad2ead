//! # OpsDesk Store
//!
//! The document database adapter behind the dashboard.
//!
//! ## Structure
//!
//! - `repository/` - Collections, typed repository impls, JSON file backing
//! - `subscription` - Per-collection snapshot streams (last snapshot wins)

pub mod repository;
pub mod subscription;

pub use repository::document_store::{decode_documents, DocumentStore, StoreError};
pub use subscription::{Snapshot, Subscription};
