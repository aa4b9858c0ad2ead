//! # OpsDesk Domain Layer
//!
//! The business records of the operations dashboard and the rules around them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Records, statuses, form validation            ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  │  service/   - Per-agent performance aggregation             ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here reads a clock or touches storage. Callers pass `today`
//! in, and persistence goes through the [`Repository`] port.

pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use model::{
    agent::Agent,
    client::{Client, ClientStatus},
    daily_client::DailyAddedClient,
    date::{parse_date, same_month},
    document::{Document, DocumentId, Stored, ValidationError},
    inventory::InventoryItem,
    order::{Order, OrderStatus},
    performance::TeamPerformance,
    role::UserRole,
    staff::{Absence, Penalty, Reward},
    transaction::{Deposit, PaymentMode, Transaction, TransactionKind, Withdrawal},
    user::UserProfile,
};

pub use repository::document_repository::{Repository, RepositoryError};

pub use service::performance::{agent_performance, team_overview, AgentPerformance, PerformanceSummary};
