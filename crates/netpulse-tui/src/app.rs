//! Application core — event loop and action dispatch.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use netpulse_core::Monitor;

use crate::action::Action;
use crate::dashboard::Dashboard;
use crate::data_bridge;
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    running: bool,
    help_visible: bool,
    /// Action sender — the bridge and key handler feed this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — the main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    monitor: Monitor,
    /// Cancellation token for the data bridge task.
    bridge_cancel: CancellationToken,
}

impl App {
    pub fn new(monitor: Monitor) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            dashboard: Dashboard::new(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            monitor,
            bridge_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.monitor.start().await;

        let bridge_monitor = self.monitor.clone();
        let bridge_tx = self.action_tx.clone();
        let bridge_cancel = self.bridge_cancel.clone();
        tokio::spawn(async move {
            data_bridge::run_data_bridge(bridge_monitor, bridge_tx, bridge_cancel).await;
        });

        let mut events = EventReader::new();

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Tear down: bridge first, then the monitor, then the reader
        self.bridge_cancel.cancel();
        self.monitor.shutdown().await;
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                    Some(Action::Quit)
                }
                _ => None,
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('?')) => Some(Action::ToggleHelp),
            (KeyModifiers::NONE, KeyCode::Char('s')) => Some(Action::TriggerScan),
            (KeyModifiers::NONE, KeyCode::Char('a')) => Some(Action::RequestAdvice),
            (KeyModifiers::NONE, KeyCode::Char('l')) => Some(Action::LoadLogs),
            _ => None,
        }
    }

    /// Process a single action — update app state and the dashboard.
    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::TriggerScan => {
                if !self.monitor.trigger_scan() {
                    debug!("scan already in flight");
                }
            }
            Action::RequestAdvice => {
                if !self.monitor.request_advice() {
                    debug!("advice request already in flight");
                }
            }
            Action::LoadLogs => {
                if !self.monitor.load_logs() {
                    debug!("log load already in flight");
                }
            }
            _ => {}
        }

        self.dashboard.update(action);
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [dashboard] [status bar]
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        self.dashboard.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    /// Bottom status bar with the backend URL and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                format!(" {}", self.monitor.config().base_url),
                theme::dim_text(),
            ),
            Span::styled(" │ ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("scan  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("advice  ", theme::key_hint()),
            Span::styled("l ", theme::key_hint_key()),
            Span::styled("logs  ", theme::key_hint()),
            Span::styled("? ", theme::key_hint_key()),
            Span::styled("help  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Centered help overlay.
    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let width = 44u16.min(area.width.saturating_sub(4));
        let height = 12u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, width, height);

        // Clear the background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::DEEP_NAVY)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let help_text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  s         ", theme::key_hint_key()),
                Span::styled("Scan the network", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  a         ", theme::key_hint_key()),
                Span::styled("Request advice", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  l         ", theme::key_hint_key()),
                Span::styled("Load recent logs", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  ?         ", theme::key_hint_key()),
                Span::styled("This help", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  q         ", theme::key_hint_key()),
                Span::styled("Quit", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "              Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;
    use netpulse_core::MonitorConfig;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        let monitor = Monitor::new(MonitorConfig::default()).expect("default config is valid");
        App::new(monitor)
    }

    #[tokio::test]
    async fn global_keys_map_to_actions() {
        let mut app = app();

        assert!(matches!(app.handle_key_event(key(KeyCode::Char('q'))), Some(Action::Quit)));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('s'))),
            Some(Action::TriggerScan)
        ));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('a'))),
            Some(Action::RequestAdvice)
        ));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('l'))),
            Some(Action::LoadLogs)
        ));
        assert!(app.handle_key_event(key(KeyCode::Char('x'))).is_none());
    }

    #[tokio::test]
    async fn help_overlay_captures_keys_until_closed() {
        let mut app = app();
        app.process_action(&Action::ToggleHelp);

        // Only Esc / ? / Ctrl+C do anything while help is open.
        assert!(app.handle_key_event(key(KeyCode::Char('s'))).is_none());
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Esc)),
            Some(Action::ToggleHelp)
        ));

        app.process_action(&Action::ToggleHelp);
        assert!(matches!(app.handle_key_event(key(KeyCode::Char('q'))), Some(Action::Quit)));
    }

    #[tokio::test]
    async fn quit_action_stops_the_loop() {
        let mut app = app();
        assert!(app.running);
        app.process_action(&Action::Quit);
        assert!(!app.running);
    }
}
