//! Per-PID memoization of the last captured snapshot.
//!
//! The store is an explicitly owned object, not a process-wide singleton, so
//! independent monitors can sample the same PID without cross-contaminating
//! each other's incremental windows.

use std::sync::RwLock as StdRwLock;
use std::time::SystemTime;

use ahash::AHashMap as HashMap;

use crate::stat::ProcessStat;

/// What a history-enabled lookup left behind for the next sample to diff
/// against.
#[derive(Debug, Clone, Copy)]
pub struct HistorySnapshot {
    /// Wall-clock moment of capture (informational; calculations use uptime).
    pub timestamp: SystemTime,
    /// Accounting snapshot at capture time.
    pub stat: ProcessStat,
    /// Seconds since boot at capture time.
    pub uptime: f64,
}

/// Thread-safe map of PID to last-seen snapshot; at most one entry per PID.
///
/// Each get/put is atomic with respect to map integrity. Two concurrent
/// lookups for the same PID may race, in which case the last write wins; a
/// transiently stale window is tolerable, a corrupted entry is not.
#[derive(Default)]
pub struct HistoryStore {
    inner: StdRwLock<HashMap<u32, HistorySnapshot>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last snapshot recorded for a PID, if any.
    pub fn get(&self, pid: u32) -> Option<HistorySnapshot> {
        let map = self.inner.read().expect("history read lock poisoned");
        map.get(&pid).copied()
    }

    /// Unconditionally overwrites the snapshot for a PID.
    pub fn put(&self, pid: u32, snapshot: HistorySnapshot) {
        let mut map = self.inner.write().expect("history write lock poisoned");
        map.insert(pid, snapshot);
    }

    /// Removes one PID's entry; the next history-enabled lookup for it
    /// behaves as a first sample again.
    pub fn remove(&self, pid: u32) {
        let mut map = self.inner.write().expect("history write lock poisoned");
        map.remove(&pid);
    }

    /// Resets the entire store.
    pub fn clear(&self) {
        let mut map = self.inner.write().expect("history write lock poisoned");
        map.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.read().expect("history read lock poisoned").len()
    }
}
