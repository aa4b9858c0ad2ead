//! # OpsDesk Dashboard
//!
//! Ties the store, identity provider, page guard and audit trail together.
//!
//! - [`Dashboard`]: sign-in wrapper plus every page operation
//! - [`DataProvider`]: live view over the collections the overview page
//!   reads, re-deriving the selected agent's figures on each snapshot

mod dashboard;
mod pages;
pub mod provider;

pub use dashboard::{Dashboard, PageSummary};
pub use provider::{DataProvider, ProviderView};
