//! PostList — the current page of posts laid out as a grid of cards.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId, Screen},
    app_state::{AppState, ViewStatus},
    component::Component,
    theme::{
        style_focused_border, style_muted, style_secondary, style_title, style_unfocused_border,
        C_AVATAR, C_LOADED, C_MUTED, C_PANEL_BORDER_FOCUSED,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

const CARD_HEIGHT: u16 = 6;
const CARD_MIN_WIDTH: u16 = 32;
const MAX_COLUMNS: u16 = 4;

pub struct PostList {
    selected: usize,
    /// First visible grid row.
    scroll_row: usize,
    /// Columns used by the last draw; drives ↑/↓ movement.
    columns: usize,
    /// Card rectangles from the last draw, for mouse hits.
    card_areas: Vec<(Rect, usize)>,
}

impl PostList {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_row: 0,
            columns: 1,
            card_areas: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Called after a new page lands.
    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll_row = 0;
    }

    fn open_selected(&self, state: &AppState) -> Vec<Action> {
        state
            .listing
            .cards
            .get(self.selected)
            .map(|card| vec![Action::Navigate(Screen::Detail(card.id.clone()))])
            .unwrap_or_default()
    }

    fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        if (0..len as isize).contains(&target) {
            self.selected = target as usize;
        }
    }
}

impl Default for PostList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PostList {
    fn id(&self) -> ComponentId {
        ComponentId::PostList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let len = state.listing.cards.len();
        let cols = self.columns.max(1) as isize;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_by(-1, len),
            KeyCode::Right | KeyCode::Char('l') => self.move_by(1, len),
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-cols, len),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(cols, len),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected = len.saturating_sub(1),
            KeyCode::Enter => return self.open_selected(state),
            KeyCode::Char('n') => return vec![Action::Navigate(Screen::Create)],
            KeyCode::Char('r') => return vec![Action::Refresh],
            KeyCode::Char('/') => return vec![Action::FocusPane(ComponentId::SearchBar)],
            KeyCode::Char(']') | KeyCode::PageDown => {
                if let Some(page) = state.listing.selector.next_page() {
                    return vec![Action::GoToPage(page)];
                }
            }
            KeyCode::Char('[') | KeyCode::PageUp => {
                if let Some(page) = state.listing.selector.prev_page() {
                    return vec![Action::GoToPage(page)];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let len = state.listing.cards.len();
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self.card_areas.iter().find(|(r, _)| {
                    event.column >= r.x
                        && event.column < r.x + r.width
                        && event.row >= r.y
                        && event.row < r.y + r.height
                });
                if let Some(&(_, idx)) = hit {
                    self.selected = idx;
                    return self.open_selected(state);
                }
            }
            MouseEventKind::ScrollDown => self.move_by(self.columns.max(1) as isize, len),
            MouseEventKind::ScrollUp => self.move_by(-(self.columns.max(1) as isize), len),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let listing = &state.listing;
        let badge_text = match listing.selector.active() {
            Some(p) => format!("{} posts · page {}/{}", listing.total_count, p, listing.selector.total_pages()),
            None => format!("{} posts", listing.total_count),
        };
        let title = match &listing.query.query {
            Some(q) => format!("posts matching \"{}\"", q),
            None => "posts".to_string(),
        };
        let block = pane_chrome(
            &title,
            focused,
            Some(Badge {
                text: &badge_text,
                color: C_LOADED,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.card_areas.clear();

        if listing.cards.is_empty() {
            let msg = match state.status {
                ViewStatus::Loading | ViewStatus::Idle => "Loading posts…",
                ViewStatus::Failed => "Could not load posts",
                ViewStatus::Loaded => "No posts found",
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(msg, style_muted()))),
                Rect {
                    x: inner.x + 1,
                    width: inner.width.saturating_sub(1),
                    ..inner
                },
            );
            return;
        }

        self.selected = self.selected.min(listing.cards.len() - 1);
        let cols = (inner.width / CARD_MIN_WIDTH).clamp(1, MAX_COLUMNS);
        self.columns = cols as usize;
        let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = self.selected / self.columns;
        if selected_row < self.scroll_row {
            self.scroll_row = selected_row;
        } else if selected_row >= self.scroll_row + visible_rows {
            self.scroll_row = selected_row + 1 - visible_rows;
        }

        let card_width = inner.width / cols;
        for (idx, card) in listing.cards.iter().enumerate() {
            let row = idx / self.columns;
            if row < self.scroll_row || row >= self.scroll_row + visible_rows {
                continue;
            }
            let col = (idx % self.columns) as u16;
            let rect = Rect {
                x: inner.x + col * card_width,
                y: inner.y + (row - self.scroll_row) as u16 * CARD_HEIGHT,
                width: card_width,
                height: CARD_HEIGHT.min(inner.height),
            };
            self.card_areas.push((rect, idx));

            let is_sel = idx == self.selected;
            let border = if is_sel && focused {
                style_focused_border()
            } else if is_sel {
                Style::default().fg(C_PANEL_BORDER_FOCUSED).add_modifier(Modifier::DIM)
            } else {
                style_unfocused_border()
            };
            let card_block = Block::default().borders(Borders::ALL).border_style(border);
            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", card.avatar),
                        Style::default().fg(C_AVATAR).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(card.byline.as_str(), style_secondary()),
                ]),
                Line::from(Span::styled(card.title.as_str(), style_title())),
                Line::from(Span::styled(card.excerpt.as_str(), Style::default().fg(C_MUTED))),
            ];
            frame.render_widget(
                Paragraph::new(lines)
                    .block(card_block)
                    .wrap(Wrap { trim: true }),
                rect,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_proto::{ListQuery, Post, PostId, PostPage};
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::Terminal;

    fn loaded_state(n: u64, total: usize) -> AppState {
        let config = blog_proto::Config::default();
        let mut s = AppState::new(&config, Screen::List);
        let posts = (1..=n)
            .map(|i| Post {
                id: PostId::from(i),
                title: format!("t{i}"),
                author: "Grace Hopper".into(),
                date: "2024-01-16T10:00:00.000Z".into(),
                profile: String::new(),
                content: "body".into(),
            })
            .collect();
        s.listing.apply(
            ListQuery::first_page(&config.listing),
            &PostPage {
                posts,
                total_count: total,
            },
            50,
        );
        s.status = ViewStatus::Loaded;
        s
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_opens_selected_post() {
        let s = loaded_state(3, 3);
        let mut list = PostList::new();
        list.handle_key(key(KeyCode::Right), &s);
        assert_eq!(
            list.handle_key(key(KeyCode::Enter), &s),
            vec![Action::Navigate(Screen::Detail(PostId::from(2)))]
        );
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let s = loaded_state(2, 2);
        let mut list = PostList::new();
        list.handle_key(key(KeyCode::Left), &s);
        assert_eq!(list.selected(), 0);
        list.handle_key(key(KeyCode::End), &s);
        list.handle_key(key(KeyCode::Right), &s);
        assert_eq!(list.selected(), 1);
    }

    #[test]
    fn test_bracket_keys_page() {
        let s = loaded_state(12, 25);
        let mut list = PostList::new();
        assert_eq!(
            list.handle_key(key(KeyCode::Char(']')), &s),
            vec![Action::GoToPage(2)]
        );
        assert!(list.handle_key(key(KeyCode::Char('[')), &s).is_empty());
    }

    #[test]
    fn test_enter_on_empty_list_is_noop() {
        let s = loaded_state(0, 0);
        let mut list = PostList::new();
        assert!(list.handle_key(key(KeyCode::Enter), &s).is_empty());
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(list: &mut PostList, s: &AppState, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                list.draw(f, area, true, s);
            })
            .unwrap();
    }

    #[test]
    fn test_click_on_card_opens_it() {
        let s = loaded_state(3, 3);
        let mut list = PostList::new();
        // 80 columns: border, then two 39-wide columns of 6-row cards
        draw(&mut list, &s, 80, 20);
        let area = Rect::new(0, 0, 80, 20);
        assert_eq!(
            list.handle_mouse(click(45, 3), area, &s),
            vec![Action::Navigate(Screen::Detail(PostId::from(2)))]
        );
        assert_eq!(list.selected(), 1);
        assert_eq!(
            list.handle_mouse(click(5, 9), area, &s),
            vec![Action::Navigate(Screen::Detail(PostId::from(3)))]
        );
    }

    #[test]
    fn test_click_outside_cards_does_nothing() {
        let s = loaded_state(3, 3);
        let mut list = PostList::new();
        draw(&mut list, &s, 80, 20);
        let area = Rect::new(0, 0, 80, 20);
        // empty slot next to the third card, and the row below the grid
        assert!(list.handle_mouse(click(45, 9), area, &s).is_empty());
        assert!(list.handle_mouse(click(10, 15), area, &s).is_empty());
        assert_eq!(list.selected(), 0);
    }
}
