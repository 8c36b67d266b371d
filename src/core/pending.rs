//! Completion detection for queues whose total item count is unknown
//!
//! The tree shape is discovered on the fly, so neither queue can be closed
//! on a fixed item count. Instead each queue gets an outstanding-work
//! counter: incremented once per item before it is handed off, decremented
//! once the item is fully processed. A coordinator waits for zero and then
//! closes the queue. The producer-side protocol guarantees the zero-wait
//! only starts after all seed increments are issued, so a transient zero
//! cannot be observed before any work exists.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Atomic count of not-yet-finished items for one queue.
///
/// Never goes negative and reaches zero exactly once per run; after that the
/// producer protocol forbids further increments.
#[derive(Debug, Default)]
pub struct WorkCounter {
    count: AtomicUsize,
    zero: Notify,
}

impl WorkCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `n` outstanding items. Must happen before the items are
    /// handed off for processing.
    pub fn add(&self, n: usize) {
        self.count.fetch_add(n, Ordering::AcqRel);
    }

    /// Marks one item as fully processed.
    pub fn done(&self) {
        let previous = self.count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous != 0, "outstanding-work counter went negative");
        if previous == 1 {
            self.zero.notify_waiters();
        }
    }

    /// Current outstanding count.
    pub fn outstanding(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Waits until the counter reaches zero.
    pub async fn wait_zero(&self) {
        loop {
            // Register interest before reading the count so a concurrent
            // final done() cannot slip between the check and the wait.
            let notified = self.zero.notified();
            if self.count.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Single-fire gate opened on first project discovery.
///
/// The project coordinator blocks on this before starting its worker pool
/// and its zero-wait, so it cannot observe zero outstanding projects while
/// the traversal has not yet had a chance to discover any. A test-and-set
/// latch rather than a plain flag: the first discovery and the start of the
/// zero-wait may race.
#[derive(Debug, Default)]
pub struct DiscoveryGate {
    fired: AtomicBool,
    open: Notify,
}

impl DiscoveryGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the gate. Only the first call has any effect; returns whether
    /// this call was the one that opened it.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            false
        } else {
            self.open.notify_waiters();
            true
        }
    }

    pub fn is_open(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Waits until the gate has opened.
    pub async fn opened(&self) {
        loop {
            let notified = self.open.notified();
            if self.fired.load(Ordering::Acquire) {
                return;
            }
            notified.await;
        }
    }
}
