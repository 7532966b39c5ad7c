//! Status bar — title line on top, mode and keybindings at the bottom.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Screen;
use crate::app_state::ViewStatus;
use crate::theme::{
    C_ACCENT, C_ERROR, C_LOADED, C_LOADING, C_MODE_FORM, C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED,
    C_PRIMARY, C_SECONDARY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
            Self::Form => "EDIT",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
            Self::Form => C_MODE_FORM,
        }
    }
}

/// Top line: app name, current screen, load status and the API endpoint.
pub fn draw_title_bar(
    frame: &mut Frame,
    area: Rect,
    screen: &Screen,
    status: ViewStatus,
    api_url: &str,
) {
    let (dot, dot_color) = match status {
        ViewStatus::Idle => ("○", C_MUTED),
        ViewStatus::Loading => ("◌", C_LOADING),
        ViewStatus::Loaded => ("●", C_LOADED),
        ViewStatus::Failed => ("●", C_ERROR),
    };
    let line = Line::from(vec![
        Span::styled(
            " blogdeck ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(dot, Style::default().fg(dot_color)),
        Span::raw(" "),
        Span::styled(screen.title(), Style::default().fg(C_PRIMARY)),
        Span::styled(format!("  {}", api_url), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Keys for the current screen and mode.
pub fn keys_hint(mode: InputMode, screen: &Screen) -> &'static str {
    match mode {
        InputMode::Search => {
            " type to search  Esc clear/close  Enter done  Tab next pane  Ctrl+X dismiss"
        }
        InputMode::Form => {
            " type  Tab/↑↓ field  Enter next/submit  Ctrl+S submit  Ctrl+X dismiss  Esc cancel"
        }
        InputMode::Normal => match screen {
            Screen::List => {
                " ←↑↓→/hjkl select  Enter open  [ ] page  / search  n new  r reload  Tab panes  x dismiss  ? help  q quit"
            }
            Screen::Detail(_) => " ↑↓ scroll  e edit  d delete  Esc back  x dismiss  ? help  q quit",
            Screen::Create | Screen::Edit(_) => " Esc back  ? help  q quit",
        },
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, screen: &Screen) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys_hint(mode, screen), Style::default().fg(C_SECONDARY)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_proto::PostId;

    #[test]
    fn test_every_mode_names_a_dismiss_key() {
        for mode in [InputMode::Search, InputMode::Form] {
            assert!(keys_hint(mode, &Screen::Create).contains("Ctrl+X dismiss"));
        }
        for screen in [Screen::List, Screen::Detail(PostId::from(1))] {
            assert!(keys_hint(InputMode::Normal, &screen).contains("x dismiss"));
        }
    }
}
