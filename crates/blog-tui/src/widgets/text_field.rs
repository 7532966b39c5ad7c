//! TextField — a labelled tui-input field with an inline validation message.

use ratatui::crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_ERROR, C_FILTER_BG, C_MUTED, C_PANEL_BORDER_FOCUSED, C_PRIMARY, C_SECONDARY};

const LABEL_WIDTH: u16 = 10;

pub struct TextField {
    pub label: &'static str,
    input: Input,
    /// Read-only fields display a value but ignore keys.
    pub editable: bool,
    pub required: bool,
    pub error: Option<String>,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            input: Input::default(),
            editable: true,
            required: true,
            error: None,
        }
    }

    pub fn read_only(label: &'static str) -> Self {
        Self {
            editable: false,
            required: false,
            ..Self::new(label)
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
        self.error = None;
    }

    /// Returns true when the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.editable {
            return false;
        }
        let changed = self
            .input
            .handle_event(&Event::Key(key))
            .map_or(false, |c| c.value);
        if changed {
            self.error = None;
        }
        changed
    }

    /// Required fields must hold something other than whitespace.
    pub fn validate(&mut self) -> bool {
        if self.required && self.value().trim().is_empty() {
            self.error = Some(format!("{} is required", self.label));
            return false;
        }
        self.error = None;
        true
    }

    /// Two rows: the input line and the error line beneath it.
    pub fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if area.height == 0 {
            return;
        }
        let label_style = if focused {
            Style::default()
                .fg(C_PANEL_BORDER_FOCUSED)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let value_style = if self.editable {
            Style::default().fg(C_PRIMARY).bg(C_FILTER_BG)
        } else {
            Style::default().fg(C_MUTED)
        };

        let width = area.width.saturating_sub(LABEL_WIDTH + 1) as usize;
        let scroll = self.input.visual_scroll(width);
        let visible = super::skip_columns(self.value(), scroll);
        let padded = format!("{}{}", visible, " ".repeat(width.saturating_sub(visible.width())));

        let line = Line::from(vec![
            Span::styled(
                format!("{:<w$}", self.label, w = LABEL_WIDTH as usize),
                label_style,
            ),
            Span::styled(padded, value_style),
        ]);
        let row = Rect { height: 1, ..area };
        frame.render_widget(Paragraph::new(line), row);

        if focused && self.editable {
            let cursor_x = area.x + LABEL_WIDTH + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
        }

        if area.height > 1 {
            if let Some(err) = &self.error {
                let err_row = Rect {
                    y: area.y + 1,
                    height: 1,
                    ..area
                };
                frame.render_widget(
                    Paragraph::new(Line::from(vec![
                        Span::raw(" ".repeat(LABEL_WIDTH as usize)),
                        Span::styled(err.as_str(), Style::default().fg(C_ERROR)),
                    ])),
                    err_row,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_blank_required_field_fails_validation() {
        let mut f = TextField::new("Title");
        f.set_value("   ");
        assert!(!f.validate());
        assert_eq!(f.error.as_deref(), Some("Title is required"));
    }

    #[test]
    fn test_typing_clears_error() {
        let mut f = TextField::new("Title");
        f.validate();
        assert!(f.error.is_some());
        assert!(f.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)));
        assert!(f.error.is_none());
        assert!(f.validate());
    }

    #[test]
    fn test_read_only_ignores_keys() {
        let mut f = TextField::read_only("Author");
        f.set_value("Ada");
        assert!(!f.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert_eq!(f.value(), "Ada");
        assert!(f.validate());
    }
}
