//! PaginationBar — one control per page; selecting one reloads that page.

use std::ops::RangeInclusive;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use blog_proto::pagination::PageSelector;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_muted, C_ACCENT, C_BG, C_PANEL_BORDER_FOCUSED, C_SECONDARY},
};

pub struct PaginationBar {
    selector: PageSelector,
    /// Keyboard cursor; distinct from the active page until Enter.
    cursor: usize,
    /// Digits typed so far toward a multi-digit page number.
    typed: usize,
    /// First page drawn by the last frame.
    window_start: usize,
    button_areas: Vec<(Rect, usize)>,
}

impl PaginationBar {
    pub fn new() -> Self {
        Self {
            selector: PageSelector::default(),
            cursor: 1,
            typed: 0,
            window_start: 1,
            button_areas: Vec::new(),
        }
    }

    /// Rebuild controls from the listing that just landed.
    pub fn sync(&mut self, selector: &PageSelector) {
        self.selector = selector.clone();
        self.cursor = selector.active().unwrap_or(1);
        self.typed = 0;
        self.window_start = 1;
    }

    #[cfg(test)]
    pub fn selector(&self) -> &PageSelector {
        &self.selector
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Digits accumulate into a page number. The page opens as soon as no
    /// further digit could name an existing page; until then the cursor
    /// waits on it for Enter.
    fn type_digit(&mut self, digit: usize) -> Vec<Action> {
        let total = self.selector.total_pages();
        let mut page = self.typed * 10 + digit;
        if page > total {
            page = digit;
        }
        if page == 0 || page > total {
            self.typed = 0;
            return vec![];
        }
        if page * 10 > total {
            return self.select(page);
        }
        self.typed = page;
        self.cursor = page;
        vec![]
    }

    fn select(&mut self, page: usize) -> Vec<Action> {
        self.typed = 0;
        if self.selector.select(page) {
            self.cursor = page;
            vec![Action::GoToPage(page)]
        } else {
            vec![]
        }
    }
}

impl Default for PaginationBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PaginationBar {
    fn id(&self) -> ComponentId {
        ComponentId::Pagination
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let total = self.selector.total_pages();
        if let KeyCode::Char(c @ '0'..='9') = key.code {
            return self.type_digit(c as usize - '0' as usize);
        }
        self.typed = 0;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.cursor = self.cursor.saturating_sub(1).max(1),
            KeyCode::Right | KeyCode::Char('l') => {
                if self.cursor < total {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 1,
            KeyCode::End => self.cursor = total.max(1),
            KeyCode::Enter | KeyCode::Char(' ') => return self.select(self.cursor),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if !matches!(event.kind, MouseEventKind::Down(MouseButton::Left)) {
            return vec![];
        }
        let hit = self.button_areas.iter().find(|(r, _)| {
            event.column >= r.x && event.column < r.x + r.width && event.row == r.y
        });
        match hit {
            Some(&(_, page)) => self.select(page),
            None => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        self.button_areas.clear();
        if area.height == 0 {
            return;
        }
        if self.selector.total_pages() == 0 {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(" no pages", style_muted()))),
                area,
            );
            return;
        }

        let total = self.selector.total_pages();
        let pages = window(total, self.cursor, self.window_start, area.width);
        self.window_start = *pages.start();

        let mut spans = vec![Span::raw(" ")];
        let mut x = area.x + 1;
        if *pages.start() > 1 {
            spans.push(Span::styled("… ", style_muted()));
            x += 2;
        }
        for page in pages.clone() {
            let label = format!(" {} ", page);
            let width = label.len() as u16;
            let mut style = if self.selector.is_active(page) {
                Style::default()
                    .fg(C_BG)
                    .bg(C_ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            if focused && page == self.cursor {
                style = style
                    .add_modifier(Modifier::UNDERLINED)
                    .fg(if self.selector.is_active(page) {
                        C_BG
                    } else {
                        C_PANEL_BORDER_FOCUSED
                    });
            }
            self.button_areas.push((
                Rect {
                    x,
                    y: area.y,
                    width,
                    height: 1,
                },
                page,
            ));
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
            x += width + 1;
        }
        if *pages.end() < total {
            spans.push(Span::styled("…", style_muted()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Columns a page control takes, trailing gap included.
fn control_width(page: usize) -> usize {
    page.to_string().len() + 3
}

/// The run of pages that fits in `width` columns, starting as close to
/// `start_hint` as possible while keeping `cursor` on screen. Elided pages on
/// either side are marked with `…`.
fn window(total: usize, cursor: usize, start_hint: usize, width: u16) -> RangeInclusive<usize> {
    if total == 0 {
        return 1..=0;
    }
    let width = width as usize;
    let cursor = cursor.clamp(1, total);
    let last_fitting = |start: usize| -> usize {
        let mut used = 1 + if start > 1 { 2 } else { 0 };
        let mut last = start;
        for page in start..=total {
            let more = if page < total { 1 } else { 0 };
            if used + control_width(page) + more > width {
                break;
            }
            used += control_width(page);
            last = page;
        }
        last
    };
    let mut start = start_hint.clamp(1, total).min(cursor);
    while start < cursor && last_fitting(start) < cursor {
        start += 1;
    }
    start..=last_fitting(start)
}
