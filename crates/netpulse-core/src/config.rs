// ── Runtime monitor configuration ──
//
// Describes *how* to reach the backend and how often to poll.
// The TUI constructs a `MonitorConfig` and hands it in; core never
// reads config files.

use std::time::Duration;

use url::Url;

/// Default backend origin — a local development backend.
pub const DEFAULT_BACKEND: &str = "http://127.0.0.1:5000";

/// How often the poller fetches `/api/system`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a single [`Monitor`](crate::Monitor).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Backend base URL (e.g. `http://127.0.0.1:5000`).
    pub base_url: Url,
    /// Interval between metric polls.
    pub poll_interval: Duration,
    /// Request timeout applied to every fetch.
    pub timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND
                .parse()
                .expect("default backend address is a valid URL"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
