//! Optimistic local state with a pending-write queue.
//!
//! Edits land in the cache at once and queue a write. A write becomes due
//! once it has been quiet for the debounce window; later edits to the same
//! key replace the queued write and restart the window. Due writes move to
//! an in-flight set until the caller confirms, retries or rejects them.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// A write waiting for, or on its way to, the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite<T> {
    /// Unique per cache.
    pub write_id: u64,
    /// Row key.
    pub key: String,
    /// Value to write.
    pub value: T,
    /// Last local edit.
    pub queued_at: DateTime<Utc>,
}

/// Confirmed rows plus local edits not yet written back.
#[derive(Debug, Clone)]
pub struct LocalCache<T> {
    debounce: TimeDelta,
    confirmed: HashMap<String, T>,
    pending: BTreeMap<String, PendingWrite<T>>,
    in_flight: BTreeMap<u64, PendingWrite<T>>,
    next_write: u64,
}

impl<T: Clone> LocalCache<T> {
    /// An empty cache with the given debounce window.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce: TimeDelta::from_std(debounce).unwrap_or(TimeDelta::MAX),
            confirmed: HashMap::new(),
            pending: BTreeMap::new(),
            in_flight: BTreeMap::new(),
            next_write: 1,
        }
    }

    /// The value the UI should show: the newest local edit, else the last
    /// confirmed value.
    pub fn get(&self, key: &str) -> Option<&T> {
        if let Some(write) = self.pending.get(key) {
            return Some(&write.value);
        }
        self.in_flight
            .values()
            .rev()
            .find(|w| w.key == key)
            .map(|w| &w.value)
            .or_else(|| self.confirmed.get(key))
    }

    /// The last value the store acknowledged.
    pub fn confirmed(&self, key: &str) -> Option<&T> {
        self.confirmed.get(key)
    }

    /// Returns true if `key` has edits the store has not acknowledged.
    pub fn is_dirty(&self, key: &str) -> bool {
        self.pending.contains_key(key) || self.in_flight.values().any(|w| w.key == key)
    }

    /// Number of queued and in-flight writes.
    pub fn outstanding(&self) -> usize {
        self.pending.len() + self.in_flight.len()
    }

    /// Record a local edit. Replaces any queued write for the same key.
    pub fn apply_local(&mut self, key: impl Into<String>, value: T, now: DateTime<Utc>) -> u64 {
        let key = key.into();
        let write_id = self.next_write;
        self.next_write += 1;
        self.pending.insert(
            key.clone(),
            PendingWrite {
                write_id,
                key,
                value,
                queued_at: now,
            },
        );
        write_id
    }

    /// Take every write that has been quiet for the debounce window and
    /// mark it in flight.
    pub fn due(&mut self, now: DateTime<Utc>) -> Vec<PendingWrite<T>> {
        let ready: Vec<String> = self
            .pending
            .values()
            .filter(|w| now.signed_duration_since(w.queued_at) >= self.debounce)
            .map(|w| w.key.clone())
            .collect();
        let mut writes = Vec::with_capacity(ready.len());
        for key in ready {
            if let Some(write) = self.pending.remove(&key) {
                self.in_flight.insert(write.write_id, write.clone());
                writes.push(write);
            }
        }
        writes
    }

    /// The store accepted a write; its value becomes the confirmed value.
    pub fn confirm(&mut self, write_id: u64) -> bool {
        match self.in_flight.remove(&write_id) {
            Some(write) => {
                self.confirmed.insert(write.key, write.value);
                true
            }
            None => false,
        }
    }

    /// The write failed transiently; queue it again unless a newer edit
    /// has replaced it.
    pub fn retry(&mut self, write_id: u64) -> bool {
        let Some(write) = self.in_flight.remove(&write_id) else {
            return false;
        };
        if self.pending.contains_key(&write.key) {
            return false;
        }
        self.pending.insert(write.key.clone(), write);
        true
    }

    /// The store refused a write; drop the local edit and fall back to the
    /// last confirmed value (or a newer edit, if one is queued).
    pub fn reject(&mut self, write_id: u64) -> Option<&T> {
        let write = self.in_flight.remove(&write_id)?;
        self.get(&write.key)
    }

    /// Replace confirmed state with a remote snapshot. Local edits stay on
    /// top of it.
    pub fn reconcile(&mut self, remote: impl IntoIterator<Item = (String, T)>) {
        self.confirmed = remote.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> LocalCache<i32> {
        let mut c = LocalCache::new(Duration::from_millis(500));
        c.reconcile([("hp".to_string(), 10)]);
        c
    }

    fn ms(n: i64) -> TimeDelta {
        TimeDelta::milliseconds(n)
    }

    #[test]
    fn local_edits_show_at_once() {
        let mut c = cache();
        let t0 = Utc::now();
        c.apply_local("hp", 7, t0);
        assert_eq!(c.get("hp"), Some(&7));
        assert_eq!(c.confirmed("hp"), Some(&10));
        assert!(c.is_dirty("hp"));
    }

    #[test]
    fn debounce_restarts_on_each_edit() {
        let mut c = cache();
        let t0 = Utc::now();
        c.apply_local("hp", 9, t0);
        c.apply_local("hp", 8, t0 + ms(400));
        assert!(c.due(t0 + ms(600)).is_empty());
        let due = c.due(t0 + ms(900));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].value, 8);
        assert!(c.due(t0 + ms(2000)).is_empty());
    }

    #[test]
    fn confirm_promotes() {
        let mut c = cache();
        let t0 = Utc::now();
        let id = c.apply_local("hp", 6, t0);
        c.due(t0 + ms(500));
        assert!(c.confirm(id));
        assert_eq!(c.confirmed("hp"), Some(&6));
        assert!(!c.is_dirty("hp"));
        assert!(!c.confirm(id));
    }

    #[test]
    fn reject_rolls_back_to_confirmed() {
        let mut c = cache();
        let t0 = Utc::now();
        let id = c.apply_local("hp", 3, t0);
        c.due(t0 + ms(500));
        assert_eq!(c.get("hp"), Some(&3));
        assert_eq!(c.reject(id), Some(&10));
        assert_eq!(c.get("hp"), Some(&10));
        assert_eq!(c.outstanding(), 0);
    }

    #[test]
    fn reject_keeps_newer_edit() {
        let mut c = cache();
        let t0 = Utc::now();
        let first = c.apply_local("hp", 3, t0);
        c.due(t0 + ms(500));
        c.apply_local("hp", 4, t0 + ms(600));
        assert_eq!(c.reject(first), Some(&4));
    }

    #[test]
    fn retry_requeues() {
        let mut c = cache();
        let t0 = Utc::now();
        let id = c.apply_local("hp", 5, t0);
        c.due(t0 + ms(500));
        assert!(c.retry(id));
        assert_eq!(c.due(t0 + ms(500)).len(), 1);
    }

    #[test]
    fn reconcile_keeps_local_edits_on_top() {
        let mut c = cache();
        let t0 = Utc::now();
        c.apply_local("hp", 2, t0);
        c.reconcile([("hp".to_string(), 11), ("san".to_string(), 40)]);
        assert_eq!(c.get("hp"), Some(&2));
        assert_eq!(c.confirmed("hp"), Some(&11));
        assert_eq!(c.get("san"), Some(&40));
    }
}
