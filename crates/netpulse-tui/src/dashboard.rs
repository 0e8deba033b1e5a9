//! Dashboard — the single screen, all five panels.
//!
//! Layout:
//! ┌─ CPU ──┐ ┌─ Memory ┐ ┌─ Disk ──┐
//! │  42%   │ │  55%    │ │  10%    │
//! └────────┘ └─────────┘ └─────────┘
//! ┌─ Trend ───────────────────────────────────────────────┐
//! │  CPU/MEM Braille lines over the last 20 samples       │
//! └───────────────────────────────────────────────────────┘
//! ┌─ Devices ─────────┐ ┌─ Advisor ────┐ ┌─ Recent Logs ──┐
//! │ IP       Status    │ │ advice lines │ │ scans, reports │
//! └───────────────────┘ └──────────────┘ └────────────────┘

use std::sync::Arc;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table,
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use netpulse_core::{RecentLogs, ScanResponse, SystemSample};

use crate::action::Action;
use crate::theme;

/// Shown in the device panel until a scan has produced at least one device.
pub const NO_SCAN_DATA: &str = "No scan data yet.";

/// Dashboard state — fed exclusively through [`update`](Dashboard::update).
pub struct Dashboard {
    latest: Option<SystemSample>,
    history: Arc<Vec<SystemSample>>,
    scan: Option<ScanResponse>,
    scan_loading: bool,
    advice: Arc<Vec<String>>,
    advice_loading: bool,
    logs: Option<RecentLogs>,
    last_update: Option<Instant>,
    scan_throbber: ThrobberState,
    advice_throbber: ThrobberState,
}

/// Render a whole-number percentage, e.g. `42.0` → `"42%"`.
fn fmt_pct(value: f64) -> String {
    format!("{value:.0}%")
}

/// Flatten a recent-logs snapshot into display lines: scans first, then
/// system reports. Structured scan details render as their JSON text.
fn log_lines(logs: &RecentLogs) -> Vec<String> {
    let mut lines = Vec::with_capacity(logs.scans.len() + logs.system_reports.len() + 2);

    if !logs.scans.is_empty() {
        lines.push("Scans".to_owned());
        for entry in &logs.scans {
            lines.push(format!("  {}  {}", entry.ip, entry.details.display_text()));
        }
    }
    if !logs.system_reports.is_empty() {
        lines.push("System reports".to_owned());
        for report in &logs.system_reports {
            lines.push(format!(
                "  {}  cpu {} mem {} disk {}",
                report.timestamp,
                fmt_pct(report.cpu_percent),
                fmt_pct(report.memory),
                fmt_pct(report.disk),
            ));
        }
    }

    lines
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            latest: None,
            history: Arc::new(Vec::new()),
            scan: None,
            scan_loading: false,
            advice: Arc::new(Vec::new()),
            advice_loading: false,
            logs: None,
            last_update: None,
            scan_throbber: ThrobberState::default(),
            advice_throbber: ThrobberState::default(),
        }
    }

    /// Apply an action to the panel state.
    pub fn update(&mut self, action: &Action) {
        match action {
            Action::SampleUpdated(sample) => {
                self.latest = Some(sample.clone());
                self.last_update = Some(Instant::now());
            }
            Action::HistoryUpdated(history) => self.history = Arc::clone(history),
            Action::ScanUpdated(scan) => self.scan = Some(scan.clone()),
            Action::ScanLoading(loading) => self.scan_loading = *loading,
            Action::AdviceUpdated(lines) => self.advice = Arc::clone(lines),
            Action::AdviceLoading(loading) => self.advice_loading = *loading,
            Action::LogsUpdated(logs) => self.logs = Some(logs.clone()),
            Action::Tick => {
                if self.scan_loading {
                    self.scan_throbber.calc_next();
                }
                if self.advice_loading {
                    self.advice_throbber.calc_next();
                }
            }
            _ => {}
        }
    }

    /// Format the sample age for the title bar.
    fn refresh_age_str(&self) -> String {
        match self.last_update {
            Some(t) => {
                let secs = t.elapsed().as_secs();
                if secs < 5 {
                    "just now".into()
                } else if secs < 60 {
                    format!("{secs}s ago")
                } else {
                    format!("{}m ago", secs / 60)
                }
            }
            None => "no data".into(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let refresh = self.refresh_age_str();
        let title = Line::from(vec![
            Span::styled(" NetPulse ", theme::title_style()),
            Span::styled(format!(" [{refresh}] "), theme::dim_text()),
        ]);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 40 || inner.height < 12 {
            let summary = match &self.latest {
                Some(s) => format!(
                    "cpu {}  mem {}  disk {}",
                    fmt_pct(s.cpu_percent),
                    fmt_pct(s.memory),
                    fmt_pct(s.disk)
                ),
                None => "waiting for backend".into(),
            };
            frame.render_widget(Paragraph::new(summary).style(theme::body_text()), inner);
            return;
        }

        let rows = Layout::vertical([
            Constraint::Length(4),      // stat tiles
            Constraint::Percentage(40), // trend chart
            Constraint::Min(8),         // devices / advisor / logs
        ])
        .split(inner);

        self.render_tiles(frame, rows[0]);
        self.render_trend(frame, rows[1]);

        let bottom = Layout::horizontal([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[2]);

        self.render_devices(frame, bottom[0]);
        self.render_advisor(frame, bottom[1]);
        self.render_logs(frame, bottom[2]);
    }

    /// Three stat tiles: CPU, Memory, Disk.
    fn render_tiles(&self, frame: &mut Frame, area: Rect) {
        let tiles = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

        let values = match &self.latest {
            Some(s) => [
                fmt_pct(s.cpu_percent),
                fmt_pct(s.memory),
                fmt_pct(s.disk),
            ],
            None => ["--".into(), "--".into(), "--".into()],
        };

        for (i, label) in ["CPU", "Memory", "Disk"].iter().enumerate() {
            let block = Block::default()
                .title(format!(" {label} "))
                .title_style(theme::title_style())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default());
            let tile_inner = block.inner(tiles[i]);
            frame.render_widget(block, tiles[i]);
            frame.render_widget(
                Paragraph::new(values[i].clone())
                    .style(theme::tile_value())
                    .centered(),
                tile_inner,
            );
        }
    }

    /// CPU and memory trend over the retained history window.
    #[allow(clippy::cast_precision_loss)]
    fn render_trend(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Trend ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        if self.history.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No samples yet").style(theme::dim_text()),
                inner,
            );
            return;
        }

        let cpu: Vec<(f64, f64)> = self
            .history
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, s.cpu_percent))
            .collect();
        let mem: Vec<(f64, f64)> = self
            .history
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, s.memory))
            .collect();

        let cpu_line = Dataset::default()
            .name("CPU")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::CPU_SERIES))
            .data(&cpu);
        let mem_line = Dataset::default()
            .name("MEM")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::MEM_SERIES))
            .data(&mem);

        let x_max = (self.history.len().saturating_sub(1)).max(1) as f64;
        let y_labels = vec![
            Span::styled("0%", theme::dim_text()),
            Span::styled("50%", theme::dim_text()),
            Span::styled("100%", theme::dim_text()),
        ];

        let chart = Chart::new(vec![cpu_line, mem_line])
            .block(block)
            .x_axis(Axis::default().bounds([0.0, x_max]).style(theme::dim_text()))
            .y_axis(
                Axis::default()
                    .bounds([0.0, 100.0])
                    .labels(y_labels)
                    .style(theme::dim_text()),
            );

        frame.render_widget(chart, area);
    }

    /// Discovered-device table with the last scan's results.
    fn render_devices(&self, frame: &mut Frame, area: Rect) {
        let mut title_spans = vec![Span::styled(" Devices ", theme::title_style())];
        if let Some(local_ip) = self.scan.as_ref().and_then(|s| s.local_ip.as_deref()) {
            title_spans.push(Span::styled(format!(" {local_ip} "), theme::dim_text()));
        }

        let block = Block::default()
            .title(Line::from(title_spans))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.scan_loading {
            let throbber = Throbber::default()
                .label(" Scanning network...")
                .style(theme::body_text())
                .throbber_style(Style::default().fg(theme::SEA_TEAL));
            frame.render_stateful_widget(throbber, inner, &mut self.scan_throbber.clone());
            return;
        }

        let devices = self.scan.as_ref().map(|s| s.devices.as_slice());
        match devices {
            Some(devices) if !devices.is_empty() => {
                let rows: Vec<Row> = devices
                    .iter()
                    .map(|d| {
                        let status_style = if d.status == "alive" {
                            Style::default().fg(theme::KELP_GREEN)
                        } else {
                            theme::dim_text()
                        };
                        Row::new(vec![
                            Span::styled(d.ip.clone(), theme::body_text()),
                            Span::styled(d.status.clone(), status_style),
                        ])
                    })
                    .collect();

                let table = Table::new(rows, [Constraint::Min(15), Constraint::Min(6)])
                    .header(Row::new(vec!["IP", "Status"]).style(theme::table_header()));
                frame.render_widget(table, inner);
            }
            _ => {
                frame.render_widget(
                    Paragraph::new(format!("  {NO_SCAN_DATA}")).style(theme::dim_text()),
                    inner,
                );
            }
        }
    }

    /// Advisor panel: one paragraph line per advice line.
    fn render_advisor(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Advisor ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.advice_loading {
            let throbber = Throbber::default()
                .label(" Consulting advisor...")
                .style(theme::body_text())
                .throbber_style(Style::default().fg(theme::SEA_TEAL));
            frame.render_stateful_widget(throbber, inner, &mut self.advice_throbber.clone());
            return;
        }

        if self.advice.is_empty() {
            let hint = Line::from(vec![
                Span::styled("  Press ", theme::dim_text()),
                Span::styled("a", theme::key_hint_key()),
                Span::styled(" to request advice", theme::dim_text()),
            ]);
            frame.render_widget(Paragraph::new(hint), inner);
            return;
        }

        let lines: Vec<Line> = self
            .advice
            .iter()
            .map(|l| Line::from(Span::styled(format!("  {l}"), theme::body_text())))
            .collect();
        frame.render_widget(Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: false }), inner);
    }

    /// Recent-logs panel: scan entries, then historical system reports.
    fn render_logs(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Recent Logs ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(logs) = &self.logs else {
            let hint = Line::from(vec![
                Span::styled("  Press ", theme::dim_text()),
                Span::styled("l", theme::key_hint_key()),
                Span::styled(" to load logs", theme::dim_text()),
            ]);
            frame.render_widget(Paragraph::new(hint), inner);
            return;
        };

        let raw = log_lines(logs);
        if raw.is_empty() {
            frame.render_widget(
                Paragraph::new("  No recent logs").style(theme::dim_text()),
                inner,
            );
            return;
        }

        let max_rows = usize::from(inner.height);
        let lines: Vec<Line> = raw
            .iter()
            .take(max_rows)
            .map(|l| {
                if l.starts_with(' ') {
                    Line::from(Span::styled(l.clone(), theme::body_text()))
                } else {
                    Line::from(Span::styled(l.clone(), theme::table_header()))
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    use netpulse_core::{LogDetails, ScanDevice, ScanLogEntry};

    use super::*;

    /// Draw the dashboard into a test buffer and flatten it to text.
    fn render_to_text(dash: &Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");
        terminal
            .draw(|frame| dash.render(frame, frame.area()))
            .expect("draw succeeds");

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.cell((x, y)).expect("cell in bounds").symbol());
            }
            text.push('\n');
        }
        text
    }

    fn sample() -> SystemSample {
        SystemSample {
            cpu_percent: 42.0,
            memory: 55.0,
            disk: 10.0,
            timestamp: "2026-08-29 10:00:00".into(),
        }
    }

    #[test]
    fn tiles_render_whole_percentages() {
        let s = sample();
        assert_eq!(fmt_pct(s.cpu_percent), "42%");
        assert_eq!(fmt_pct(s.memory), "55%");
        assert_eq!(fmt_pct(s.disk), "10%");
    }

    #[test]
    fn no_scan_renders_placeholder() {
        let dash = Dashboard::new();
        assert!(render_to_text(&dash).contains(NO_SCAN_DATA));
    }

    #[test]
    fn empty_scan_renders_placeholder_like_no_scan() {
        let mut dash = Dashboard::new();
        dash.update(&Action::ScanUpdated(ScanResponse {
            devices: Vec::new(),
            local_ip: Some("192.168.1.5".into()),
            timestamp: None,
        }));

        // A scan with zero devices renders the same placeholder as no scan.
        assert!(render_to_text(&dash).contains(NO_SCAN_DATA));
    }

    #[test]
    fn scan_result_replaces_placeholder() {
        let mut dash = Dashboard::new();
        dash.update(&Action::ScanUpdated(ScanResponse {
            devices: vec![ScanDevice {
                ip: "192.168.1.1".into(),
                status: "alive".into(),
            }],
            local_ip: None,
            timestamp: None,
        }));

        let text = render_to_text(&dash);
        assert!(text.contains("192.168.1.1"));
        assert!(text.contains("alive"));
        assert!(!text.contains(NO_SCAN_DATA));
    }

    #[test]
    fn structured_log_details_render_as_json_text() {
        let logs = RecentLogs {
            scans: vec![
                ScanLogEntry {
                    ip: "192.168.1.1".into(),
                    details: LogDetails::Structured(json!({"open_ports": [22, 80]})),
                    created_at: None,
                },
                ScanLogEntry {
                    ip: "192.168.1.2".into(),
                    details: LogDetails::Text("host unreachable".into()),
                    created_at: None,
                },
            ],
            system_reports: Vec::new(),
        };

        let lines = log_lines(&logs);
        assert_eq!(lines[0], "Scans");
        assert_eq!(lines[1], r#"  192.168.1.1  {"open_ports":[22,80]}"#);
        assert_eq!(lines[2], "  192.168.1.2  host unreachable");
    }

    #[test]
    fn system_reports_render_with_percentages() {
        let logs = RecentLogs {
            scans: Vec::new(),
            system_reports: vec![sample()],
        };

        let lines = log_lines(&logs);
        assert_eq!(lines[0], "System reports");
        assert_eq!(lines[1], "  2026-08-29 10:00:00  cpu 42% mem 55% disk 10%");
    }

    #[test]
    fn tick_only_advances_throbbers_while_loading() {
        let mut dash = Dashboard::new();
        dash.update(&Action::Tick);
        // No loading flags set: state stays at its default index.
        assert_eq!(dash.scan_throbber.index(), ThrobberState::default().index());

        dash.update(&Action::ScanLoading(true));
        dash.update(&Action::Tick);
        assert_ne!(dash.scan_throbber.index(), ThrobberState::default().index());
    }
}
