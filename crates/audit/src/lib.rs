//! # OpsDesk Audit
//!
//! Bounded audit trail of sign-ins, page denials and writes, plus the
//! notification queue that surfaces write results to the user.

mod audit_logger;
mod notifications;

pub use audit_logger::{AuditEntry, AUDIT_FILE, AuditEventType, AuditLogger, AuditStats};
pub use notifications::{Notification, NotificationCenter, NotificationLevel};
