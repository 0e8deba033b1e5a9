// ── Central reactive dashboard store ──
//
// Every piece of dashboard state lives here, one slot per panel.
// Mutations are broadcast to subscribers via `watch` channels, so
// writes are atomic per slot and the latest write always wins.

use std::sync::Arc;

use tokio::sync::watch;

use netpulse_api::{RecentLogs, ScanResponse, SystemSample};

/// Maximum number of samples retained for the trend chart.
pub const HISTORY_CAPACITY: usize = 20;

/// Central reactive store for all dashboard state.
///
/// Owned by the [`Monitor`](crate::Monitor); consumers subscribe to
/// individual slots and never mutate directly.
pub struct DashboardStore {
    latest: watch::Sender<Option<SystemSample>>,
    history: watch::Sender<Arc<Vec<SystemSample>>>,
    scan: watch::Sender<Option<ScanResponse>>,
    advice: watch::Sender<Arc<Vec<String>>>,
    logs: watch::Sender<Option<RecentLogs>>,
    scan_loading: watch::Sender<bool>,
    advice_loading: watch::Sender<bool>,
}

impl DashboardStore {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(None);
        let (history, _) = watch::channel(Arc::new(Vec::new()));
        let (scan, _) = watch::channel(None);
        let (advice, _) = watch::channel(Arc::new(Vec::new()));
        let (logs, _) = watch::channel(None);
        let (scan_loading, _) = watch::channel(false);
        let (advice_loading, _) = watch::channel(false);

        Self {
            latest,
            history,
            scan,
            advice,
            logs,
            scan_loading,
            advice_loading,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Record a successful metrics fetch: replace the latest sample and
    /// append a copy to the bounded history, evicting the oldest entry
    /// once [`HISTORY_CAPACITY`] is reached.
    pub fn push_sample(&self, sample: SystemSample) {
        self.history.send_modify(|h| {
            let mut next: Vec<SystemSample> = h.as_ref().clone();
            if next.len() == HISTORY_CAPACITY {
                next.remove(0);
            }
            next.push(sample.clone());
            *h = Arc::new(next);
        });
        let _ = self.latest.send(Some(sample));
    }

    /// Replace the scan result wholesale.
    pub fn set_scan(&self, scan: ScanResponse) {
        let _ = self.scan.send(Some(scan));
    }

    /// Replace the advice lines wholesale.
    pub fn set_advice(&self, lines: Vec<String>) {
        let _ = self.advice.send(Arc::new(lines));
    }

    /// Replace the recent-logs snapshot wholesale.
    pub fn set_logs(&self, logs: RecentLogs) {
        let _ = self.logs.send(Some(logs));
    }

    pub fn set_scan_loading(&self, loading: bool) {
        let _ = self.scan_loading.send(loading);
    }

    pub fn set_advice_loading(&self, loading: bool) {
        let _ = self.advice_loading.send(loading);
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_latest(&self) -> watch::Receiver<Option<SystemSample>> {
        self.latest.subscribe()
    }

    pub fn subscribe_history(&self) -> watch::Receiver<Arc<Vec<SystemSample>>> {
        self.history.subscribe()
    }

    pub fn subscribe_scan(&self) -> watch::Receiver<Option<ScanResponse>> {
        self.scan.subscribe()
    }

    pub fn subscribe_advice(&self) -> watch::Receiver<Arc<Vec<String>>> {
        self.advice.subscribe()
    }

    pub fn subscribe_logs(&self) -> watch::Receiver<Option<RecentLogs>> {
        self.logs.subscribe()
    }

    pub fn subscribe_scan_loading(&self) -> watch::Receiver<bool> {
        self.scan_loading.subscribe()
    }

    pub fn subscribe_advice_loading(&self) -> watch::Receiver<bool> {
        self.advice_loading.subscribe()
    }

    // ── Snapshots ────────────────────────────────────────────────────

    pub fn latest_snapshot(&self) -> Option<SystemSample> {
        self.latest.borrow().clone()
    }

    pub fn history_snapshot(&self) -> Arc<Vec<SystemSample>> {
        self.history.borrow().clone()
    }

    pub fn scan_snapshot(&self) -> Option<ScanResponse> {
        self.scan.borrow().clone()
    }

    pub fn advice_snapshot(&self) -> Arc<Vec<String>> {
        self.advice.borrow().clone()
    }

    pub fn logs_snapshot(&self) -> Option<RecentLogs> {
        self.logs.borrow().clone()
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}
