//! Reactive data layer between `netpulse-api` and the TUI.
//!
//! This crate owns the polling and state-aggregation logic for the
//! netpulse dashboard:
//!
//! - **[`Monitor`]** — Central facade managing the connection lifecycle:
//!   [`start()`](Monitor::start) spawns the 5-second metrics poller;
//!   `trigger_scan` / `request_advice` / `load_logs` run the on-demand
//!   operations, each gated by an in-flight guard.
//!
//! - **[`DashboardStore`]** — One `tokio::sync::watch` slot per dashboard
//!   panel. Writes are atomic per slot; the latest write wins. The metrics
//!   history is a bounded rolling window of 20 samples.
//!
//! - **[`advice`]** — Parsing of the advisor's two response shapes into
//!   display lines.
//!
//! Failures never surface to the view as a distinct error state: each
//! operation logs locally and either leaves prior state untouched or, for
//! advice, substitutes a single human-readable line.

pub mod advice;
pub mod config;
pub mod error;
pub mod monitor;
pub mod store;

pub use config::MonitorConfig;
pub use error::CoreError;
pub use monitor::Monitor;
pub use store::{DashboardStore, HISTORY_CAPACITY};

// Re-export the wire types consumers render from.
pub use netpulse_api::{
    AdviceResponse, LogDetails, RecentLogs, ScanDevice, ScanLogEntry, ScanResponse, SystemSample,
};
