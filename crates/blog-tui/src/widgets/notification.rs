//! Notification region — the error banner, transient toasts and the loading spinner.
//!
//! The banner holds the latest error until it is dismissed with `x` or a
//! later successful response clears it. Toasts expire on their own.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{
    C_BANNER_BG, C_ERROR, C_MUTED, C_PRIMARY, C_TOAST_INFO, C_TOAST_SUCCESS,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

/// A persistent spinner that animates until dismissed.
struct Spinner {
    message: String,
    frame: usize,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct NotificationCenter {
    banner: Option<String>,
    toasts: VecDeque<Toast>,
    spinner: Option<Spinner>,
    max_visible: usize,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            banner: None,
            toasts: VecDeque::new(),
            spinner: None,
            max_visible: 3,
        }
    }

    // ── Banner ───────────────────────────────────────────────────────────────

    /// Show `message` in the banner, replacing any earlier error.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn dismiss(&mut self) {
        self.banner = None;
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    // ── Toasts ───────────────────────────────────────────────────────────────

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, Duration::from_secs(3));
    }

    pub fn toast_messages(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(|t| t.message.as_str())
    }

    // ── Spinner ──────────────────────────────────────────────────────────────

    pub fn spinner(&mut self, message: impl Into<String>) {
        self.spinner = Some(Spinner {
            message: message.into(),
            frame: 0,
        });
    }

    pub fn dismiss_spinner(&mut self) {
        self.spinner = None;
    }

    #[cfg(test)]
    pub fn is_spinning(&self) -> bool {
        self.spinner.is_some()
    }

    /// Remove expired toasts and advance the spinner frame. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if let Some(ref mut s) = self.spinner {
            s.frame = (s.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    // ── Drawing ──────────────────────────────────────────────────────────────

    /// Render the banner into its reserved row. Draws nothing when empty.
    pub fn draw_banner(&self, frame: &mut Frame, area: Rect) {
        let Some(message) = &self.banner else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(
                " ✗ ",
                Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.as_str(), Style::default().fg(C_PRIMARY)),
            Span::styled("   x dismiss", Style::default().fg(C_MUTED)),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(C_BANNER_BG)),
            area,
        );
    }

    /// Render spinner and toasts in the top-right corner of `area`.
    pub fn draw_toasts(&self, frame: &mut Frame, area: Rect) {
        let max_width = (area.width / 2).clamp(20, 60);
        let mut y = area.y + 1;

        let mut rows: Vec<(String, Style)> = Vec::new();
        if let Some(ref s) = self.spinner {
            let icon = SPINNER_FRAMES[s.frame % SPINNER_FRAMES.len()];
            rows.push((
                format!(" {} {} ", icon, s.message),
                Style::default().fg(C_TOAST_INFO).add_modifier(Modifier::BOLD),
            ));
        }
        for toast in self.toasts.iter().rev().take(self.max_visible) {
            let (icon, color) = match toast.severity {
                Severity::Info => ("·", C_TOAST_INFO),
                Severity::Success => ("✓", C_TOAST_SUCCESS),
            };
            rows.push((
                format!(" {} {} ", icon, toast.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }

        for (text, style) in rows {
            if y >= area.y + area.height {
                break;
            }
            let w = (text.width() as u16).min(max_width);
            let x = area.x + area.width.saturating_sub(w + 1);
            let toast_area = Rect {
                x,
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), toast_area);
            y += 1;
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}
