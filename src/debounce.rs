// ABOUTME: Single-slot debouncer for the slidecraft application
// ABOUTME: Holds at most one pending write and replaces it on newer input

use std::time::{Duration, Instant};

/// A write waiting for input to go quiet.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending<K, V> {
    pub key: K,
    pub value: V,
    pub due: Instant,
}

/// Coalesces rapid writes into one.
///
/// There is a single slot: scheduling replaces whatever is pending, so only
/// the latest value is ever released. When the new write targets a different
/// key the displaced write is handed back so the caller can commit it.
#[derive(Debug)]
pub struct Debouncer<K, V> {
    delay: Duration,
    slot: Option<Pending<K, V>>,
}

impl<K: PartialEq, V> Debouncer<K, V> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, slot: None }
    }

    /// Schedule `value` for `key`, restarting the timer.
    ///
    /// Returns the displaced write if it was for another key.
    pub fn schedule(&mut self, key: K, value: V, now: Instant) -> Option<Pending<K, V>> {
        let displaced = self.slot.take().filter(|pending| pending.key != key);
        self.slot = Some(Pending {
            key,
            value,
            due: now + self.delay,
        });
        displaced
    }

    /// Release the pending write if its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Pending<K, V>> {
        match &self.slot {
            Some(pending) if pending.due <= now => self.slot.take(),
            _ => None,
        }
    }

    /// Release the pending write regardless of its deadline.
    pub fn flush(&mut self) -> Option<Pending<K, V>> {
        self.slot.take()
    }

    /// Drop the pending write without releasing it.
    pub fn cancel(&mut self) {
        self.slot = None;
    }

    pub fn pending(&self) -> Option<&Pending<K, V>> {
        self.slot.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.slot.is_none()
    }
}
