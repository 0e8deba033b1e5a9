//! Terminal input source for the dashboard loop.
//!
//! A background task merges crossterm's input stream with two timers: a
//! coarse tick driving throbber animation and a faster render tick. The
//! app loop consumes the merged stream from one channel and never touches
//! crossterm directly.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Cadence of [`Event::Tick`]. Coarse on purpose — it only animates
/// loading indicators.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Cadence of [`Event::Render`].
pub const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Everything the reader can hand to the app loop.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    Render,
}

/// Merges terminal input and the two timers in a background task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the background reader.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            let mut render = tokio::time::interval(RENDER_INTERVAL);

            // Don't burst timer events if we fall behind
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            render.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    _ = task_cancel.cancelled() => break,

                    _ = ticker.tick() => Event::Tick,

                    _ = render.tick() => Event::Render,

                    Some(Ok(input_event)) = input.next() => {
                        match input_event {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Event::Key(key)
                            }
                            CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                            // The dashboard has no pointer interactions;
                            // key release/repeat and focus changes are noise.
                            _ => continue,
                        }
                    }
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// Receive the next event. `None` once the reader stops.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Signal the background reader to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Default for EventReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
