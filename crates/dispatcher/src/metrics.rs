//! Dispatcher counters for the health endpoint

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Lock-free per-outcome counters
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Submissions seen
    received: AtomicU64,
    /// Submissions the channel accepted
    delivered: AtomicU64,
    /// Submissions refused by validation
    rejected: AtomicU64,
    /// Configuration, delivery or unconfigured failures
    failed: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn inc_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn inc_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            received: self.received(),
            delivered: self.delivered(),
            rejected: self.rejected(),
            failed: self.failed(),
        }
    }
}

/// Snapshot of dispatcher counters (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub received: u64,
    pub delivered: u64,
    pub rejected: u64,
    pub failed: u64,
}
