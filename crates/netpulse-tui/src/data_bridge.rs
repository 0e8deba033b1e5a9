//! Data bridge — connects [`Monitor`] watch channels to TUI actions.
//!
//! Runs as a background task: subscribes to every store slot and forwards
//! each change as an [`Action`] through the TUI's action channel, so the
//! render loop never touches the store directly.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use netpulse_core::Monitor;

use crate::action::Action;

/// Spawn the data bridge connecting the [`Monitor`]'s reactive slots to
/// the TUI. Sends initial snapshots so panels have data immediately, then
/// loops forwarding every change. Shuts down cleanly on cancellation.
pub async fn run_data_bridge(
    monitor: Monitor,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let store = monitor.store();

    let mut latest = store.subscribe_latest();
    let mut history = store.subscribe_history();
    let mut scan = store.subscribe_scan();
    let mut advice = store.subscribe_advice();
    let mut logs = store.subscribe_logs();
    let mut scan_loading = store.subscribe_scan_loading();
    let mut advice_loading = store.subscribe_advice_loading();

    // Push initial snapshots (a fresh monitor has empty slots, but the
    // bridge can be restarted against a warm one).
    if let Some(sample) = latest.borrow_and_update().clone() {
        let _ = action_tx.send(Action::SampleUpdated(sample));
    }
    let initial_history = history.borrow_and_update().clone();
    if !initial_history.is_empty() {
        let _ = action_tx.send(Action::HistoryUpdated(initial_history));
    }
    if let Some(snapshot) = scan.borrow_and_update().clone() {
        let _ = action_tx.send(Action::ScanUpdated(snapshot));
    }
    let initial_advice = advice.borrow_and_update().clone();
    if !initial_advice.is_empty() {
        let _ = action_tx.send(Action::AdviceUpdated(initial_advice));
    }
    if let Some(snapshot) = logs.borrow_and_update().clone() {
        let _ = action_tx.send(Action::LogsUpdated(snapshot));
    }

    // Stream loop — forward every change until cancelled
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = latest.changed() => {
                if let Some(sample) = latest.borrow_and_update().clone() {
                    let _ = action_tx.send(Action::SampleUpdated(sample));
                }
            }
            Ok(()) = history.changed() => {
                let _ = action_tx.send(Action::HistoryUpdated(history.borrow_and_update().clone()));
            }
            Ok(()) = scan.changed() => {
                if let Some(snapshot) = scan.borrow_and_update().clone() {
                    let _ = action_tx.send(Action::ScanUpdated(snapshot));
                }
            }
            Ok(()) = advice.changed() => {
                let _ = action_tx.send(Action::AdviceUpdated(advice.borrow_and_update().clone()));
            }
            Ok(()) = logs.changed() => {
                if let Some(snapshot) = logs.borrow_and_update().clone() {
                    let _ = action_tx.send(Action::LogsUpdated(snapshot));
                }
            }
            Ok(()) = scan_loading.changed() => {
                let _ = action_tx.send(Action::ScanLoading(*scan_loading.borrow_and_update()));
            }
            Ok(()) = advice_loading.changed() => {
                let _ = action_tx.send(Action::AdviceLoading(*advice_loading.borrow_and_update()));
            }
        }
    }

    debug!("data bridge shut down");
}
