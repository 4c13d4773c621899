//! Session status: the bounded activity log and the snapshot shown to users.

use scout_core::Timestamp;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Default number of log lines kept.
pub const DEFAULT_LOG_CAPACITY: usize = 5;

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// When the entry was recorded
    pub at: Timestamp,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.time_of_day(), self.message)
    }
}

/// Newest-first log that evicts the oldest entry when full.
#[derive(Debug, Clone)]
pub struct LogRing {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogRing {
    /// Create an empty ring. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a message at the current time.
    pub fn push(&mut self, message: impl Into<String>) {
        self.push_entry(LogEntry {
            at: Timestamp::now(),
            message: message.into(),
        });
    }

    fn push_entry(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ring holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LogRing {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

/// Point-in-time view of the controller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutStatus {
    /// A provider call is in flight
    pub is_searching: bool,
    /// The auto-loop is enabled
    pub is_looping: bool,
    /// Quota was exhausted this session
    pub is_quota_halted: bool,
    /// Size of the lead collection
    pub total_found: usize,
    /// When the last successful search finished
    pub last_search_time: Option<Timestamp>,
    /// Activity log, newest first
    pub logs: Vec<LogEntry>,
}
