//! Domain Services - derived figures computed from records

pub mod performance;
