// ── Monitor abstraction ──
//
// Full lifecycle management for one backend connection: the periodic
// metrics poller, the three on-demand fetch operations, and reactive
// state streaming through the DashboardStore.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use netpulse_api::BackendClient;

use crate::advice::{ADVICE_PENDING, advice_error_line, parse_advice};
use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::store::DashboardStore;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. [`start()`](Self::start)
/// spawns the metrics poller; the on-demand operations (`trigger_scan`,
/// `request_advice`, `load_logs`) spawn one task each and are gated by
/// per-operation in-flight guards, so a re-entrant trigger while the same
/// operation is still running is rejected rather than racing two
/// responses against one store slot.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: BackendClient,
    store: DashboardStore,
    cancel: CancellationToken,
    poll_handle: Mutex<Option<JoinHandle<()>>>,
    scan_in_flight: AtomicBool,
    advice_in_flight: AtomicBool,
    logs_in_flight: AtomicBool,
}

impl Monitor {
    /// Create a new Monitor. Does NOT start polling — call
    /// [`start()`](Self::start) to spawn the background poller.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let client = BackendClient::new(config.base_url.clone(), config.timeout)?;
        Ok(Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                store: DashboardStore::new(),
                cancel: CancellationToken::new(),
                poll_handle: Mutex::new(None),
                scan_in_flight: AtomicBool::new(false),
                advice_in_flight: AtomicBool::new(false),
                logs_in_flight: AtomicBool::new(false),
            }),
        })
    }

    /// Access the monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    /// Access the underlying store (subscriptions and snapshots).
    pub fn store(&self) -> &DashboardStore {
        &self.inner.store
    }

    // ── Poller lifecycle ─────────────────────────────────────────────

    /// Spawn the metrics poll task: one immediate fetch, then one every
    /// `poll_interval` until [`shutdown()`](Self::shutdown).
    pub async fn start(&self) {
        let mut guard = self.inner.poll_handle.lock().await;
        if guard.is_some() {
            debug!("poller already running");
            return;
        }

        let client = self.inner.client.clone();
        let store = self.clone();
        let interval = self.inner.config.poll_interval;
        let cancel = self.inner.cancel.child_token();

        *guard = Some(tokio::spawn(async move {
            poll_task(client, store, interval, cancel).await;
        }));
        info!(url = %self.inner.config.base_url, "monitor started");
    }

    /// Cancel the poll timer and wait for the task to finish.
    ///
    /// In-flight on-demand requests are NOT cancelled; they resolve
    /// against a store nobody observes anymore.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.poll_handle.lock().await.take() {
            let _ = handle.await;
        }
        debug!("monitor shut down");
    }

    // ── On-demand operations ─────────────────────────────────────────

    /// Trigger a network scan. Returns `false` if a scan is already in
    /// flight (the trigger is rejected, not queued).
    ///
    /// On success the scan result is replaced wholesale; on failure the
    /// prior result is left unchanged and the error is logged. The
    /// loading flag is cleared in all cases.
    pub fn trigger_scan(&self) -> bool {
        if !self.acquire(&self.inner.scan_in_flight, "scan") {
            return false;
        }

        self.inner.store.set_scan_loading(true);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.client.scan().await {
                Ok(scan) => {
                    debug!(devices = scan.devices.len(), "scan complete");
                    inner.store.set_scan(scan);
                }
                Err(e) => warn!(error = %e, "scan failed"),
            }
            inner.store.set_scan_loading(false);
            inner.scan_in_flight.store(false, Ordering::Release);
        });
        true
    }

    /// Request advice from the backend advisor. Returns `false` if a
    /// request is already in flight.
    ///
    /// Seeds the advice slot with a single placeholder line while the
    /// request runs. On failure the slot is replaced with one
    /// human-readable error line.
    pub fn request_advice(&self) -> bool {
        if !self.acquire(&self.inner.advice_in_flight, "advice") {
            return false;
        }

        self.inner.store.set_advice_loading(true);
        self.inner.store.set_advice(vec![ADVICE_PENDING.to_owned()]);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.client.request_advice().await {
                Ok(resp) => inner.store.set_advice(parse_advice(resp)),
                Err(e) => {
                    warn!(error = %e, "advice request failed");
                    inner.store.set_advice(vec![advice_error_line(&e.into())]);
                }
            }
            inner.store.set_advice_loading(false);
            inner.advice_in_flight.store(false, Ordering::Release);
        });
        true
    }

    /// Load recent logs. Returns `false` if a load is already in flight.
    ///
    /// Replaces the log snapshot wholesale on success; leaves it
    /// unchanged and logs on failure.
    pub fn load_logs(&self) -> bool {
        if !self.acquire(&self.inner.logs_in_flight, "logs") {
            return false;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.client.recent_logs().await {
                Ok(logs) => {
                    debug!(
                        scans = logs.scans.len(),
                        reports = logs.system_reports.len(),
                        "logs loaded"
                    );
                    inner.store.set_logs(logs);
                }
                Err(e) => warn!(error = %e, "log load failed"),
            }
            inner.logs_in_flight.store(false, Ordering::Release);
        });
        true
    }

    /// Claim an operation's in-flight flag. Rejects re-entrant triggers.
    fn acquire(&self, flag: &AtomicBool, op: &'static str) -> bool {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(operation = op, "re-entrant trigger rejected");
            return false;
        }
        true
    }
}

/// The metrics poll loop. Ticks immediately, then every `interval`.
///
/// A failed fetch is logged and otherwise ignored — the prior sample and
/// history are left unchanged; the next tick tries again. No retry or
/// backoff beyond the schedule.
async fn poll_task(
    client: BackendClient,
    monitor: Monitor,
    interval: std::time::Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            _ = ticker.tick() => {
                match client.get_system().await {
                    Ok(sample) => monitor.inner.store.push_sample(sample),
                    Err(e) => warn!(error = %e, "metrics poll failed"),
                }
            }
        }
    }

    debug!("poll task stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::timeout;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::advice::NO_ADVICE;
    use crate::store::HISTORY_CAPACITY;

    const WAIT: Duration = Duration::from_secs(5);

    async fn monitor_for(server: &MockServer, poll_interval: Duration) -> Monitor {
        let config = MonitorConfig {
            base_url: server.uri().parse().expect("mock URI is a URL"),
            poll_interval,
            timeout: Duration::from_secs(2),
        };
        Monitor::new(config).expect("monitor builds")
    }

    fn sample_body(n: u32) -> serde_json::Value {
        json!({
            "cpu_percent": 42.0,
            "memory": 55.0,
            "disk": 10.0,
            "timestamp": format!("t{n}")
        })
    }

    #[tokio::test]
    async fn poller_fetches_immediately_and_appends_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/system"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body(1)))
            .mount(&server)
            .await;

        let monitor = monitor_for(&server, Duration::from_millis(20)).await;
        let mut history = monitor.store().subscribe_history();
        monitor.start().await;

        // First fetch happens without waiting a full interval.
        timeout(WAIT, history.changed()).await.expect("no timeout").expect("sender alive");
        assert_eq!(history.borrow_and_update().len(), 1);

        // Subsequent ticks keep appending.
        timeout(WAIT, history.changed()).await.expect("no timeout").expect("sender alive");
        let len = history.borrow_and_update().len();
        assert!(len >= 2);
        assert!(len <= HISTORY_CAPACITY);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn poll_failure_leaves_state_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/system"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body(1)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/system"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let monitor = monitor_for(&server, Duration::from_millis(10)).await;
        let mut history = monitor.store().subscribe_history();
        monitor.start().await;

        timeout(WAIT, history.changed()).await.expect("no timeout").expect("sender alive");
        // Give several failing ticks a chance to run.
        tokio::time::sleep(Duration::from_millis(60)).await;
        monitor.shutdown().await;

        let history = monitor.store().history_snapshot();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].timestamp, "t1");
        assert_eq!(
            monitor.store().latest_snapshot().map(|s| s.timestamp),
            Some("t1".into())
        );
    }

    #[tokio::test]
    async fn failed_scan_preserves_prior_result_and_clears_loading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/scan"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "devices": [{ "ip": "10.0.0.7", "status": "alive" }]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/scan"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let monitor = monitor_for(&server, Duration::from_secs(60)).await;
        let mut scan_rx = monitor.store().subscribe_scan();
        let mut loading_rx = monitor.store().subscribe_scan_loading();

        assert!(monitor.trigger_scan());
        timeout(WAIT, scan_rx.changed()).await.expect("no timeout").expect("sender alive");
        // Wait until the loading flag settles back to false.
        while *loading_rx.borrow_and_update() {
            timeout(WAIT, loading_rx.changed()).await.expect("no timeout").expect("sender alive");
        }

        // Second scan fails: prior result must survive.
        assert!(monitor.trigger_scan());
        loop {
            timeout(WAIT, loading_rx.changed()).await.expect("no timeout").expect("sender alive");
            if !*loading_rx.borrow_and_update() {
                break;
            }
        }

        let scan = monitor.store().scan_snapshot().expect("first scan kept");
        assert_eq!(scan.devices.len(), 1);
        assert_eq!(scan.devices[0].ip, "10.0.0.7");
        assert!(!*monitor.store().subscribe_scan_loading().borrow());
    }

    #[tokio::test]
    async fn reentrant_scan_trigger_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/scan"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "devices": [] }))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let monitor = monitor_for(&server, Duration::from_secs(60)).await;

        assert!(monitor.trigger_scan());
        assert!(!monitor.trigger_scan(), "second trigger while in flight");

        // Different operations are independent of the scan guard.
        assert!(monitor.load_logs());
    }

    #[tokio::test]
    async fn advice_seeds_placeholder_then_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-advisor"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "advice_text": "Line one\n\nLine two\n" }))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;

        let monitor = monitor_for(&server, Duration::from_secs(60)).await;
        let mut advice_rx = monitor.store().subscribe_advice();

        assert!(monitor.request_advice());

        timeout(WAIT, advice_rx.changed()).await.expect("no timeout").expect("sender alive");
        assert_eq!(*advice_rx.borrow_and_update().as_ref(), vec![ADVICE_PENDING.to_owned()]);

        timeout(WAIT, advice_rx.changed()).await.expect("no timeout").expect("sender alive");
        assert_eq!(
            *advice_rx.borrow_and_update().as_ref(),
            vec!["Line one".to_owned(), "Line two".to_owned()]
        );
    }

    #[tokio::test]
    async fn advice_failure_yields_single_error_line() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-advisor"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let monitor = monitor_for(&server, Duration::from_secs(60)).await;
        let mut loading_rx = monitor.store().subscribe_advice_loading();

        assert!(monitor.request_advice());
        loop {
            timeout(WAIT, loading_rx.changed()).await.expect("no timeout").expect("sender alive");
            if !*loading_rx.borrow_and_update() {
                break;
            }
        }

        let advice = monitor.store().advice_snapshot();
        assert_eq!(advice.len(), 1);
        assert!(advice[0].starts_with("Advice request failed:"), "got {advice:?}");
    }

    #[tokio::test]
    async fn advice_without_either_field_yields_no_advice_line() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-advisor"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let monitor = monitor_for(&server, Duration::from_secs(60)).await;
        let mut loading_rx = monitor.store().subscribe_advice_loading();

        assert!(monitor.request_advice());
        loop {
            timeout(WAIT, loading_rx.changed()).await.expect("no timeout").expect("sender alive");
            if !*loading_rx.borrow_and_update() {
                break;
            }
        }

        assert_eq!(*monitor.store().advice_snapshot(), vec![NO_ADVICE.to_owned()]);
    }

    #[tokio::test]
    async fn failed_log_load_leaves_logs_unset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/recent-logs"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let monitor = monitor_for(&server, Duration::from_secs(60)).await;
        let mut logs_rx = monitor.store().subscribe_logs();

        assert!(monitor.load_logs());
        // The logs slot never changes on failure; poll the guard instead.
        let deadline = tokio::time::Instant::now() + WAIT;
        while monitor.inner.logs_in_flight.load(Ordering::Acquire) {
            assert!(tokio::time::Instant::now() < deadline, "log task hung");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(!logs_rx.has_changed().expect("sender alive"));
        assert!(monitor.store().logs_snapshot().is_none());
    }
}
