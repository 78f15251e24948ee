//! Metrics collection module
//!
//! Tracks how searches flow through the provider: gate rejections, remote
//! fetches, superseded results, failures and fetch latency.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of latency samples kept
const LATENCY_WINDOW: usize = 100;

/// Provider metrics collector
#[derive(Default)]
pub struct ProviderMetrics {
    searches: AtomicU64,
    gate_rejections: AtomicU64,
    fetches: AtomicU64,
    discarded: AtomicU64,
    fetch_errors: AtomicU64,
    empty_results: AtomicU64,
    /// Last fetch latencies in ms
    latencies: Mutex<VecDeque<u64>>,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub gate_rejections: u64,
    pub fetches: u64,
    pub discarded: u64,
    pub fetch_errors: u64,
    pub empty_results: u64,
    pub avg_latency_ms: Option<u64>,
}

impl ProviderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// An initial result set was requested
    pub fn inc_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_gate_rejection(&self) {
        self.gate_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// A remote call was issued
    pub fn inc_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// A fetch or timer was superseded or cancelled
    pub fn inc_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_fetch_error(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_result(&self) {
        self.empty_results.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a settled fetch's latency
    pub fn record_latency(&self, time_ms: u64) {
        let mut latencies = self.latencies.lock();
        if latencies.len() >= LATENCY_WINDOW {
            latencies.pop_front();
        }
        latencies.push_back(time_ms);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let latencies = self.latencies.lock();
        let avg_latency_ms = if latencies.is_empty() {
            None
        } else {
            Some(latencies.iter().sum::<u64>() / latencies.len() as u64)
        };

        MetricsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            gate_rejections: self.gate_rejections.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            empty_results: self.empty_results.load(Ordering::Relaxed),
            avg_latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = ProviderMetrics::new();
        metrics.inc_search();
        metrics.inc_search();
        metrics.inc_fetch();
        metrics.inc_discarded();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.searches, 2);
        assert_eq!(snapshot.fetches, 1);
        assert_eq!(snapshot.discarded, 1);
        assert_eq!(snapshot.avg_latency_ms, None);
    }

    #[test]
    fn test_latency_window() {
        let metrics = ProviderMetrics::new();
        for _ in 0..LATENCY_WINDOW {
            metrics.record_latency(10);
        }
        metrics.record_latency(1010);

        assert_eq!(metrics.latencies.lock().len(), LATENCY_WINDOW);
        assert_eq!(metrics.snapshot().avg_latency_ms, Some(20));
    }
}
