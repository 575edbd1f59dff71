// Dialog metrics module
//
// Lightweight counters for the UI thread and the dialog pipeline, logged on shutdown

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters shared by the UI thread manager and the dialog invoker
///
/// Uses atomic operations so any thread (caller or UI thread) can record without locks.
#[derive(Debug)]
pub struct Metrics {
    /// Number of UI threads spawned by the manager
    pub ui_threads_started: AtomicUsize,

    /// Dialogs whose pipeline was started
    pub dialogs_opened: AtomicUsize,

    /// Dialogs that closed with a typed result
    pub dialogs_completed: AtomicUsize,

    /// Dialogs that closed without a usable result
    pub dialogs_without_result: AtomicUsize,

    /// Dialogs whose pipeline failed (construction, arguments, display, panic, dispatch)
    pub dialogs_failed: AtomicUsize,

    /// Times the host window was re-enabled after a modal dialog
    pub host_reenabled: AtomicUsize,

    /// Total time spent inside dialog pipelines in milliseconds
    pub total_dialog_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            ui_threads_started: AtomicUsize::new(0),
            dialogs_opened: AtomicUsize::new(0),
            dialogs_completed: AtomicUsize::new(0),
            dialogs_without_result: AtomicUsize::new(0),
            dialogs_failed: AtomicUsize::new(0),
            host_reenabled: AtomicUsize::new(0),
            total_dialog_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_ui_thread_started(&self) {
        self.ui_threads_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dialog_opened(&self) {
        self.dialogs_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dialog_completed(&self) {
        self.dialogs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dialog_without_result(&self) {
        self.dialogs_without_result.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dialog_failed(&self) {
        self.dialogs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_host_reenabled(&self) {
        self.host_reenabled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dialog_time(&self, duration: Duration) {
        self.total_dialog_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average time per finished dialog in milliseconds
    pub fn avg_dialog_time_ms(&self) -> f64 {
        let total = self.total_dialog_time_ms.load(Ordering::Relaxed);
        let count = self.dialogs_completed.load(Ordering::Relaxed)
            + self.dialogs_without_result.load(Ordering::Relaxed)
            + self.dialogs_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Dialog Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "UI threads started: {}",
            self.ui_threads_started.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Dialogs: {} opened, {} completed, {} without result, {} failed",
            self.dialogs_opened.load(Ordering::Relaxed),
            self.dialogs_completed.load(Ordering::Relaxed),
            self.dialogs_without_result.load(Ordering::Relaxed),
            self.dialogs_failed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Dialog time: {:.2}s total (avg: {:.2}ms), host re-enabled {} times",
            self.total_dialog_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_dialog_time_ms(),
            self.host_reenabled.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.dialogs_opened.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.ui_threads_started.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_dialog_outcomes() {
        let metrics = Metrics::new();

        metrics.record_dialog_opened();
        metrics.record_dialog_opened();
        metrics.record_dialog_opened();
        metrics.record_dialog_completed();
        metrics.record_dialog_without_result();
        metrics.record_dialog_failed();

        assert_eq!(metrics.dialogs_opened.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.dialogs_completed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.dialogs_without_result.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.dialogs_failed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_avg_dialog_time() {
        let metrics = Metrics::new();

        metrics.record_dialog_completed();
        metrics.record_dialog_time(Duration::from_millis(100));
        metrics.record_dialog_failed();
        metrics.record_dialog_time(Duration::from_millis(300));

        assert_eq!(metrics.total_dialog_time_ms.load(Ordering::Relaxed), 400);
        assert_eq!(metrics.avg_dialog_time_ms(), 200.0);
    }

    #[test]
    fn test_avg_dialog_time_no_dialogs() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_dialog_time_ms(), 0.0);
    }
}
