//! # OpsDesk RBAC
//!
//! Role-Based Access Control for the dashboard pages.
//!
//! ## Components
//!
//! - `Page` - Every page of the dashboard
//! - `PageGuard` - Which roles may open which page
//! - `RecordScope` / `Capability` - What a role may see and change inside a page

pub mod page;
pub mod page_guard;
pub mod scope;

pub use page::Page;
pub use page_guard::PageGuard;
pub use scope::{Capability, RecordScope};
