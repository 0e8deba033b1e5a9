//! Deep-sea palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const SEA_TEAL: Color = Color::Rgb(64, 224, 208); // #40e0d0
pub const KELP_GREEN: Color = Color::Rgb(120, 220, 120); // #78dc78
pub const AMBER: Color = Color::Rgb(250, 200, 99); // #fac863
pub const SIGNAL_RED: Color = Color::Rgb(236, 95, 103); // #ec5f67
pub const PALE_BLUE: Color = Color::Rgb(102, 153, 204); // #6699cc

// ── Extended Palette ──────────────────────────────────────────────────

pub const FOG_WHITE: Color = Color::Rgb(205, 211, 222); // #cdd3de
pub const SLATE_GRAY: Color = Color::Rgb(101, 115, 126); // #65737e
pub const DEEP_NAVY: Color = Color::Rgb(27, 43, 52); // #1b2b34

// ── Chart series ──────────────────────────────────────────────────────

/// CPU trend line.
pub const CPU_SERIES: Color = SEA_TEAL;
/// Memory trend line.
pub const MEM_SERIES: Color = AMBER;

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(SEA_TEAL).add_modifier(Modifier::BOLD)
}

/// Panel border.
pub fn border_default() -> Style {
    Style::default().fg(SLATE_GRAY)
}

/// Border for the focused overlay.
pub fn border_focused() -> Style {
    Style::default().fg(SEA_TEAL)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(SEA_TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal body text.
pub fn body_text() -> Style {
    Style::default().fg(FOG_WHITE)
}

/// Dim empty-state / hint text.
pub fn dim_text() -> Style {
    Style::default().fg(SLATE_GRAY)
}

/// Large stat-tile value.
pub fn tile_value() -> Style {
    Style::default()
        .fg(KELP_GREEN)
        .add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(SLATE_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(SEA_TEAL).add_modifier(Modifier::BOLD)
}
