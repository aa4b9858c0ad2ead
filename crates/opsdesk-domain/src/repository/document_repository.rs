//! Document Repository - Abstract persistence for records
//!
//! One trait serves every record type; the collection comes from
//! `Document::COLLECTION`.

use crate::model::document::{Document, DocumentId, Stored};

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Document not found
    NotFound { collection: String, id: String },
    /// Failed to persist
    PersistenceError { message: String },
    /// Stored document does not match the record shape
    DecodeError {
        collection: String,
        id: String,
        message: String,
    },
}

impl core::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RepositoryError::NotFound { collection, id } => {
                write!(f, "Document not found: {}/{}", collection, id)
            }
            RepositoryError::PersistenceError { message } => {
                write!(f, "Persistence error: {}", message)
            }
            RepositoryError::DecodeError {
                collection,
                id,
                message,
            } => write!(f, "Could not decode {}/{}: {}", collection, id, message),
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<RepositoryError> for shared::OpsError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { collection, id } => {
                shared::RecordNotFoundError { collection, id }.into()
            }
            other => shared::OpsError::Store(other.to_string()),
        }
    }
}

/// Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// Records are only ever written whole: `save` creates or replaces.
pub trait Repository<T: Document> {
    /// Save a record under `id` (create or full replace)
    fn save(&self, id: &DocumentId, record: &T) -> Result<(), RepositoryError>;

    /// Find a record by ID
    fn find_by_id(&self, id: &DocumentId) -> Result<Option<T>, RepositoryError>;

    /// All records in the collection, ordered by id
    fn list_all(&self) -> Result<Vec<Stored<T>>, RepositoryError>;

    /// Load a record or fail with NotFound
    fn get(&self, id: &DocumentId) -> Result<T, RepositoryError> {
        self.find_by_id(id)?.ok_or_else(|| RepositoryError::NotFound {
            collection: T::COLLECTION.to_string(),
            id: id.to_string(),
        })
    }

    /// Check if a record exists
    fn exists(&self, id: &DocumentId) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Count all records
    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.list_all()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::order::{Order, OrderStatus};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// In-memory implementation for testing
    struct InMemoryOrderRepo {
        orders: RefCell<BTreeMap<DocumentId, Order>>,
    }

    impl InMemoryOrderRepo {
        fn new() -> Self {
            Self {
                orders: RefCell::new(BTreeMap::new()),
            }
        }
    }

    impl Repository<Order> for InMemoryOrderRepo {
        fn save(&self, id: &DocumentId, record: &Order) -> Result<(), RepositoryError> {
            self.orders.borrow_mut().insert(id.clone(), record.clone());
            Ok(())
        }

        fn find_by_id(&self, id: &DocumentId) -> Result<Option<Order>, RepositoryError> {
            Ok(self.orders.borrow().get(id).cloned())
        }

        fn list_all(&self) -> Result<Vec<Stored<Order>>, RepositoryError> {
            Ok(self
                .orders
                .borrow()
                .iter()
                .map(|(id, order)| Stored::new(id.clone(), order.clone()))
                .collect())
        }
    }

    #[test]
    fn test_save_replaces_whole_record() {
        let repo = InMemoryOrderRepo::new();
        let id = DocumentId::new("o-001");

        let mut order = Order::new("Ravi", "SH-1", "Pune", 500.0);
        repo.save(&id, &order).unwrap();

        order.approve().unwrap();
        repo.save(&id, &order).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get(&id).unwrap().status, OrderStatus::Approved);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let repo = InMemoryOrderRepo::new();
        let err = repo.get(&DocumentId::new("nope")).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::NotFound {
                collection: "orders".to_string(),
                id: "nope".to_string(),
            }
        );
        assert!(!repo.exists(&DocumentId::new("nope")).unwrap());
    }
}
