//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use netpulse_core::{RecentLogs, ScanResponse, SystemSample};

/// Everything the event loop can be asked to do: user intents, timer
/// events, and data updates forwarded from the store by the data bridge.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ────────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),
    ToggleHelp,

    // ── User intents (on-demand operations) ──────────────────────────
    TriggerScan,
    RequestAdvice,
    LoadLogs,

    // ── Data updates from the bridge ─────────────────────────────────
    SampleUpdated(SystemSample),
    HistoryUpdated(Arc<Vec<SystemSample>>),
    ScanUpdated(ScanResponse),
    ScanLoading(bool),
    AdviceUpdated(Arc<Vec<String>>),
    AdviceLoading(bool),
    LogsUpdated(RecentLogs),
}
