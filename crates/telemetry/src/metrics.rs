//! In-process run metrics.
//!
//! Counters accumulate across report runs in one process. The most recent
//! run is kept whole so it can be logged or embedded in output.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s
    buckets: [AtomicU64; 8],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 8] = [1, 5, 10, 50, 100, 500, 1000, 5000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds. Values past the last bound land in
    /// the last bucket.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns `(upper bound, count)` per bucket.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Outcome of one report run, as recorded by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub timeframe: String,
    pub snapshots_received: u64,
    pub snapshots_superseded: u64,
    pub snapshots_out_of_scope: u64,
    pub transactions_matched: u64,
    pub transactions_skipped: u64,
    pub records_rejected: u64,
    pub clamped_days: u64,
    pub used_fallback: bool,
    pub elapsed_ms: u64,
}

/// Collected metrics for report runs.
#[derive(Debug, Default)]
pub struct Metrics {
    // Input metrics
    pub snapshots_received: Counter,
    pub snapshots_superseded: Counter,
    pub snapshots_out_of_scope: Counter,
    pub records_rejected: Counter,

    // Ledger metrics
    pub transactions_matched: Counter,
    pub transactions_skipped: Counter,

    // Report metrics
    pub reports_built: Counter,
    pub reports_failed: Counter,
    pub fallback_series: Counter,
    pub clamped_days: Counter,
    pub report_latency_ms: Histogram,

    last_run: RwLock<Option<(DateTime<Utc>, RunRecord)>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finished run to the counters and remembers it as the latest.
    pub fn record_run(&self, run: RunRecord) {
        self.snapshots_received.inc_by(run.snapshots_received);
        self.snapshots_superseded.inc_by(run.snapshots_superseded);
        self.snapshots_out_of_scope.inc_by(run.snapshots_out_of_scope);
        self.records_rejected.inc_by(run.records_rejected);
        self.transactions_matched.inc_by(run.transactions_matched);
        self.transactions_skipped.inc_by(run.transactions_skipped);
        self.clamped_days.inc_by(run.clamped_days);
        if run.used_fallback {
            self.fallback_series.inc();
        }
        self.reports_built.inc();
        self.report_latency_ms.observe(run.elapsed_ms);

        *self.last_run.write() = Some((Utc::now(), run));
    }

    pub fn record_failure(&self) {
        self.reports_failed.inc();
    }

    /// The most recently recorded run and when it was recorded.
    pub fn last_run(&self) -> Option<(DateTime<Utc>, RunRecord)> {
        self.last_run.read().clone()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub snapshots_received: u64,
    pub snapshots_superseded: u64,
    pub snapshots_out_of_scope: u64,
    pub records_rejected: u64,
    pub transactions_matched: u64,
    pub transactions_skipped: u64,
    pub reports_built: u64,
    pub reports_failed: u64,
    pub fallback_series: u64,
    pub clamped_days: u64,
    pub report_latency_mean_ms: f64,
    pub last_run: Option<RunRecord>,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            snapshots_received: self.snapshots_received.get(),
            snapshots_superseded: self.snapshots_superseded.get(),
            snapshots_out_of_scope: self.snapshots_out_of_scope.get(),
            records_rejected: self.records_rejected.get(),
            transactions_matched: self.transactions_matched.get(),
            transactions_skipped: self.transactions_skipped.get(),
            reports_built: self.reports_built.get(),
            reports_failed: self.reports_failed.get(),
            fallback_series: self.fallback_series.get(),
            clamped_days: self.clamped_days.get(),
            report_latency_mean_ms: self.report_latency_ms.mean(),
            last_run: self.last_run().map(|(_, run)| run),
        }
    }

    /// Logs the current counters at `info` and returns what was logged.
    ///
    /// Called once before the process exits; nothing else persists them.
    pub fn log_summary(&self) -> MetricsSnapshot {
        let snap = self.snapshot();
        info!(
            reports_built = snap.reports_built,
            reports_failed = snap.reports_failed,
            snapshots_received = snap.snapshots_received,
            snapshots_superseded = snap.snapshots_superseded,
            snapshots_out_of_scope = snap.snapshots_out_of_scope,
            records_rejected = snap.records_rejected,
            transactions_matched = snap.transactions_matched,
            transactions_skipped = snap.transactions_skipped,
            fallback_series = snap.fallback_series,
            clamped_days = snap.clamped_days,
            latency_mean_ms = snap.report_latency_mean_ms,
            latency_buckets = ?self.report_latency_ms.buckets(),
            "Run metrics"
        );
        snap
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
