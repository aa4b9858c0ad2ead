//! Persistence Adapters - Repository implementations
//!
//! These implement the repository port from opsdesk-domain.

pub mod document_store;
mod file_backend;
