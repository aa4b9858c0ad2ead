//! # OpsDesk Shared
//!
//! Common types used across all OpsDesk crates.

pub mod collection;
pub mod config;
pub mod email;
pub mod error;

// Re-exports
pub use collection::*;
pub use config::*;
pub use email::is_valid_email;
pub use error::*;
