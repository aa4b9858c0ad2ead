//! Domain Models - The records the dashboard pages manage
//!
//! Every record is a flat document. Records reference each other only by
//! matching an agent name or shop id string.

pub mod agent;
pub mod client;
pub mod daily_client;
pub mod date;
pub mod document;
pub mod inventory;
pub mod order;
pub mod performance;
pub mod role;
pub mod staff;
pub mod transaction;
pub mod user;
