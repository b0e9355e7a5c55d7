// Error Statistics
// "Counting failures so the dashboard does not have to"

use crate::error::{ClassifiedError, ErrorKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;

/// Per-kind failure counters for monitoring
#[derive(Debug)]
pub struct ErrorStats {
    total: AtomicU64,
    by_kind: HashMap<ErrorKind, AtomicU64>,
    last_error_at: Mutex<Option<SystemTime>>,
}

impl ErrorStats {
    pub fn new() -> Self {
        let by_kind = ErrorKind::ALL
            .iter()
            .map(|kind| (*kind, AtomicU64::new(0)))
            .collect();

        Self {
            total: AtomicU64::new(0),
            by_kind,
            last_error_at: Mutex::new(None),
        }
    }

    /// Track a classified failure
    pub fn track(&self, classified: &ClassifiedError) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if let Some(counter) = self.by_kind.get(&classified.kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        if let Ok(mut last) = self.last_error_at.lock() {
            *last = Some(SystemTime::now());
        }
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn count(&self, kind: ErrorKind) -> u64 {
        self.by_kind
            .get(&kind)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn last_error_at(&self) -> Option<SystemTime> {
        self.last_error_at.lock().ok().and_then(|last| *last)
    }

    /// Snapshot for logging or export, keyed by kind plus a total
    pub fn snapshot(&self) -> HashMap<String, u64> {
        let mut stats: HashMap<String, u64> = self
            .by_kind
            .iter()
            .map(|(kind, counter)| (kind.as_str().to_string(), counter.load(Ordering::Relaxed)))
            .collect();
        stats.insert("total".to_string(), self.total());
        stats
    }
}

impl Default for ErrorStats {
    fn default() -> Self {
        Self::new()
    }
}
