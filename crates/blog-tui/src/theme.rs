//! Colors and shared styles for blogdeck screens.

use ratatui::style::{Color, Modifier, Style};

// Palette: warm accent on a dark slate background.

pub const C_BG: Color = Color::Rgb(16, 17, 22);
pub const C_ACCENT: Color = Color::Rgb(240, 130, 90);
pub const C_LOADED: Color = Color::Rgb(110, 205, 140);
pub const C_LOADING: Color = Color::Rgb(255, 184, 80);
pub const C_ERROR: Color = Color::Rgb(255, 80, 80);
pub const C_MUTED: Color = Color::Rgb(78, 82, 98);
pub const C_SECONDARY: Color = Color::Rgb(128, 132, 150);
pub const C_PRIMARY: Color = Color::Rgb(220, 218, 210);
pub const C_PANEL_BORDER: Color = Color::Rgb(46, 48, 60);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(240, 130, 90);
pub const C_FILTER_BG: Color = Color::Rgb(26, 28, 38);
pub const C_FILTER_FG: Color = Color::Rgb(255, 200, 80);
pub const C_AVATAR: Color = Color::Rgb(80, 140, 200);
pub const C_BANNER_BG: Color = Color::Rgb(70, 20, 24);
pub const C_OVERLAY_BG: Color = Color::Rgb(18, 18, 26);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_MODE_NORMAL: Color = Color::Rgb(128, 132, 150);
pub const C_MODE_SEARCH: Color = Color::Rgb(255, 200, 80);
pub const C_MODE_FORM: Color = Color::Rgb(180, 120, 220);

// Styles

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_title() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}
