//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! These traits define HOW the domain wants to persist records,
//! but NOT how it's actually done. That's the store adapter's job.
//!
//! ```text
//! Domain Layer            │  Adapter Layer
//! ────────────────────────┼────────────────────────
//! trait Repository<T>     │  DocumentStore (memory)
//!   fn save()             │  DocumentStore (JSON files)
//!   fn list_all()         │
//! ```

pub mod document_repository;
