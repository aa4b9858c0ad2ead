//! AuditLogger - Audit trail for OpsDesk

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the persisted trail under the data directory
pub const AUDIT_FILE: &str = "audit.jsonl";

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: String,
    pub event_type: AuditEventType,
    /// Email of the acting user
    pub actor: String,
    pub role: Option<String>,
    pub page: Option<String>,
    pub collection: Option<String>,
    pub record_id: Option<String>,
    pub success: bool,
    pub reason: Option<String>,
}

/// Types of audit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    SignIn,
    SignInFailed,
    SignOut,
    PageDenied,
    RecordCreated,
    RecordUpdated,
    WriteFailed,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::SignIn => "sign_in",
            AuditEventType::SignInFailed => "sign_in_failed",
            AuditEventType::SignOut => "sign_out",
            AuditEventType::PageDenied => "page_denied",
            AuditEventType::RecordCreated => "record_created",
            AuditEventType::RecordUpdated => "record_updated",
            AuditEventType::WriteFailed => "write_failed",
        }
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The trail file is rewritten to the retained entries once it holds
/// this many times `max_entries` lines
const COMPACT_FACTOR: usize = 2;

/// Audit logger
///
/// Optionally mirrors every entry to a JSON-lines file so the trail
/// survives across CLI invocations.
#[derive(Debug)]
pub struct AuditLogger {
    entries: VecDeque<AuditEntry>,
    max_entries: usize,
    sink: Option<PathBuf>,
    /// Lines currently in the sink file
    sink_lines: usize,
}

impl AuditLogger {
    /// Create a new AuditLogger
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
            sink: None,
            sink_lines: 0,
        }
    }

    /// Logger backed by a JSON-lines file, preloaded with its newest entries
    ///
    /// The file is streamed and only the newest `max_entries` entries are
    /// held; lines that fail to parse are skipped. An oversized file is
    /// compacted.
    pub fn open(path: impl AsRef<Path>, max_entries: usize) -> std::io::Result<Self> {
        let path = path.as_ref();
        let mut logger = Self::new(max_entries);
        if path.exists() {
            for line in BufReader::new(File::open(path)?).lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                logger.sink_lines += 1;
                match serde_json::from_str::<AuditEntry>(&line) {
                    Ok(entry) => logger.push(entry),
                    Err(err) => warn!(path = %path.display(), error = %err, "Skipping audit line"),
                }
            }
        }
        logger.sink = Some(path.to_path_buf());
        if logger.sink_lines >= logger.compact_threshold() {
            logger.compact()?;
        }
        Ok(logger)
    }

    fn compact_threshold(&self) -> usize {
        self.max_entries.saturating_mul(COMPACT_FACTOR)
    }

    /// Rewrite the sink file to hold only the retained entries
    fn compact(&mut self) -> std::io::Result<()> {
        let Some(path) = &self.sink else {
            return Ok(());
        };
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(&serde_json::to_string(entry)?);
            content.push('\n');
        }
        let tmp = path.with_extension("jsonl.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        debug!(path = %path.display(), from = self.sink_lines, to = self.entries.len(), "Compacted audit trail");
        self.sink_lines = self.entries.len();
        Ok(())
    }

    fn push(&mut self, entry: AuditEntry) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    fn append(path: &Path, entry: &AuditEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: AuditEntry) {
        if let Some(path) = &self.sink {
            match Self::append(path, &entry) {
                Ok(()) => self.sink_lines += 1,
                Err(err) => warn!(path = %path.display(), error = %err, "Audit entry not persisted"),
            }
        }
        self.push(entry);
        if self.sink.is_some() && self.sink_lines >= self.compact_threshold() {
            if let Err(err) = self.compact() {
                warn!(error = %err, "Audit trail not compacted");
            }
        }
    }

    fn entry(event_type: AuditEventType, actor: &str, success: bool) -> AuditEntry {
        AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type,
            actor: actor.to_string(),
            role: None,
            page: None,
            collection: None,
            record_id: None,
            success,
            reason: None,
        }
    }

    /// Log a sign-in attempt
    pub fn log_sign_in(&mut self, email: &str, role: Option<&str>, success: bool, reason: Option<&str>) {
        let event_type = if success {
            AuditEventType::SignIn
        } else {
            AuditEventType::SignInFailed
        };
        self.log(AuditEntry {
            role: role.map(str::to_string),
            reason: reason.map(str::to_string),
            ..Self::entry(event_type, email, success)
        });
    }

    pub fn log_sign_out(&mut self, email: &str, role: &str) {
        self.log(AuditEntry {
            role: Some(role.to_string()),
            ..Self::entry(AuditEventType::SignOut, email, true)
        });
    }

    /// Log a page the user was not allowed to open
    pub fn log_page_denied(&mut self, email: &str, role: &str, page: &str, reason: &str) {
        self.log(AuditEntry {
            role: Some(role.to_string()),
            page: Some(page.to_string()),
            reason: Some(reason.to_string()),
            ..Self::entry(AuditEventType::PageDenied, email, false)
        });
    }

    /// Log a successful create or update
    pub fn log_write(&mut self, email: &str, role: &str, collection: &str, record_id: &str, created: bool) {
        let event_type = if created {
            AuditEventType::RecordCreated
        } else {
            AuditEventType::RecordUpdated
        };
        self.log(AuditEntry {
            role: Some(role.to_string()),
            collection: Some(collection.to_string()),
            record_id: Some(record_id.to_string()),
            ..Self::entry(event_type, email, true)
        });
    }

    /// Log a rejected or failed write
    pub fn log_write_failed(&mut self, email: &str, role: &str, collection: &str, reason: &str) {
        self.log(AuditEntry {
            role: Some(role.to_string()),
            collection: Some(collection.to_string()),
            reason: Some(reason.to_string()),
            ..Self::entry(AuditEventType::WriteFailed, email, false)
        });
    }

    /// Get recent entries
    pub fn get_recent(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Get recent denials and failures
    pub fn get_recent_denials(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| !e.success)
            .take(limit)
            .collect()
    }

    /// Get recent entries by one actor
    pub fn get_recent_by_actor(&self, actor: &str, limit: usize) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.actor.eq_ignore_ascii_case(actor))
            .take(limit)
            .collect()
    }

    /// Get statistics
    pub fn get_stats(&self) -> AuditStats {
        let count = |t: AuditEventType| self.entries.iter().filter(|e| e.event_type == t).count();

        AuditStats {
            total_entries: self.entries.len(),
            denial_count: self.entries.iter().filter(|e| !e.success).count(),
            sign_ins: count(AuditEventType::SignIn),
            writes: count(AuditEventType::RecordCreated) + count(AuditEventType::RecordUpdated),
        }
    }

    /// Export as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries.iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

/// Audit statistics
#[derive(Debug, Clone)]
pub struct AuditStats {
    pub total_entries: usize,
    pub denial_count: usize,
    pub sign_ins: usize,
    pub writes: usize,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new(10000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_write() {
        let mut logger = AuditLogger::new(100);

        logger.log_write("lead@shop.example", "manager", "orders", "o1", true);

        let stats = logger.get_stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.denial_count, 0);
    }

    #[test]
    fn test_log_sign_in_outcomes() {
        let mut logger = AuditLogger::new(100);

        logger.log_sign_in("a@shop.example", Some("agent"), true, None);
        logger.log_sign_in("a@shop.example", None, false, Some("Invalid email or password"));

        let recent = logger.get_recent(2);
        assert_eq!(recent[0].event_type, AuditEventType::SignInFailed);
        assert_eq!(recent[1].event_type, AuditEventType::SignIn);
        assert_eq!(logger.get_stats().sign_ins, 1);
    }

    #[test]
    fn test_log_page_denied() {
        let mut logger = AuditLogger::new(100);

        logger.log_page_denied("a@shop.example", "agent", "inventory", "Access denied");

        let denials = logger.get_recent_denials(10);
        assert_eq!(denials.len(), 1);
        assert_eq!(denials[0].page, Some("inventory".to_string()));
        assert_eq!(denials[0].role, Some("agent".to_string()));
    }

    #[test]
    fn test_max_entries_limit() {
        let mut logger = AuditLogger::new(3);

        for id in ["r1", "r2", "r3", "r4"] {
            logger.log_write("lead@shop.example", "manager", "clients", id, true);
        }

        assert_eq!(logger.get_stats().total_entries, 3);

        // Oldest entry should be removed
        let ids: Vec<_> = logger
            .get_recent(10)
            .iter()
            .filter_map(|e| e.record_id.clone())
            .collect();
        assert_eq!(ids, vec!["r4", "r3", "r2"]);
    }

    #[test]
    fn test_recent_by_actor() {
        let mut logger = AuditLogger::new(100);

        logger.log_write("a@shop.example", "agent", "clients", "c1", true);
        logger.log_write("b@shop.example", "agent", "clients", "c2", true);
        logger.log_write_failed("A@shop.example", "agent", "orders", "Price must be positive");

        let mine = logger.get_recent_by_actor("a@shop.example", 10);
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].event_type, AuditEventType::WriteFailed);
    }

    #[test]
    fn test_export_json() {
        let mut logger = AuditLogger::new(100);

        logger.log_sign_out("a@shop.example", "agent");
        logger.log_write("a@shop.example", "agent", "clients", "c1", false);

        let json = logger.export_json();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["eventType"], AuditEventType::RecordUpdated.as_str());
        assert_eq!(entries[1]["recordId"], "c1");
    }

    #[test]
    fn test_file_backed_trail_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        {
            let mut logger = AuditLogger::open(&path, 100).unwrap();
            logger.log_sign_in("a@shop.example", Some("agent"), true, None);
            logger.log_write("a@shop.example", "agent", "clients", "c1", true);
        }
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut f| writeln!(f, "not json"))
            .unwrap();

        let reopened = AuditLogger::open(&path, 1).unwrap();
        let recent = reopened.get_recent(10);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].record_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_trail_file_stays_bounded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        let line_count = |p: &Path| std::fs::read_to_string(p).unwrap().lines().count();

        {
            let mut logger = AuditLogger::open(&path, 3).unwrap();
            for i in 0..10 {
                logger.log_write("a@shop.example", "agent", "clients", &format!("c{}", i), true);
                assert!(line_count(&path) < 6);
            }
        }

        let reopened = AuditLogger::open(&path, 3).unwrap();
        let ids: Vec<_> = reopened
            .get_recent(10)
            .iter()
            .filter_map(|e| e.record_id.clone())
            .collect();
        assert_eq!(ids, vec!["c9", "c8", "c7"]);
    }

    #[test]
    fn test_oversized_file_is_compacted_on_open() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        {
            let mut logger = AuditLogger::open(&path, 100).unwrap();
            for i in 0..50 {
                logger.log_write("a@shop.example", "agent", "clients", &format!("c{}", i), true);
            }
        }

        let reopened = AuditLogger::open(&path, 5).unwrap();
        assert_eq!(reopened.get_stats().total_entries, 5);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 5);
    }

    #[test]
    fn test_default_max_entries() {
        let logger = AuditLogger::default();
        assert_eq!(logger.max_entries, 10000);
    }
}
