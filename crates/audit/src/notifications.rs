//! NotificationCenter - toast-style messages for the signed-in user

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: String,
}

/// Bounded queue; the oldest message is dropped when full
#[derive(Debug)]
pub struct NotificationCenter {
    queue: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) {
        if self.queue.len() >= self.capacity {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification {
            level,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message);
    }

    /// Take every pending notification, oldest first
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_order() {
        let mut center = NotificationCenter::default();
        center.success("Client added");
        center.error("Price must be positive");

        let drained = center.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NotificationLevel::Success);
        assert_eq!(drained[1].message, "Price must be positive");
        assert!(center.is_empty());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut center = NotificationCenter::new(2);
        center.info("one");
        center.info("two");
        center.info("three");

        let messages: Vec<_> = center.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }
}
