//! PostDetail — a single post with its edit and delete actions.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use blog_proto::render;

use crate::{
    action::{Action, ComponentId, Screen},
    app_state::{AppState, ViewStatus},
    component::Component,
    theme::{style_default, style_muted, style_secondary, style_title, C_ACCENT, C_AVATAR},
    widgets::pane_chrome::pane_chrome,
};

pub struct PostDetail {
    scroll: u16,
}

impl PostDetail {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

impl Default for PostDetail {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PostDetail {
    fn id(&self) -> ComponentId {
        ComponentId::PostDetail
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            KeyCode::Esc | KeyCode::Backspace => return vec![Action::Back],
            KeyCode::Char('r') => return vec![Action::Refresh],
            // Edit and delete act on a post that has actually loaded.
            KeyCode::Char('e') => {
                if let Some(post) = &state.post {
                    return vec![Action::Navigate(Screen::Edit(post.id.clone()))];
                }
            }
            KeyCode::Char('d') => {
                if let Some(post) = &state.post {
                    if !state.mutating {
                        return vec![Action::DeletePost(post.id.clone())];
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::Navigate(Screen::Detail(_)) = action {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("post", focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(post) = &state.post else {
            let msg = match state.status {
                ViewStatus::Failed => "Could not load this post",
                _ => "Loading post…",
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(format!(" {msg}"), style_muted()))),
                inner,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let date = render::format_date(&post.date);
        let header = vec![
            Line::from(Span::styled(format!(" {}", post.title), style_title())),
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", render::initials(&post.author)),
                    Style::default().fg(C_AVATAR).add_modifier(Modifier::BOLD),
                ),
                Span::styled(render::byline(&post.author, &date), style_secondary()),
            ]),
            Line::from(Span::styled(format!(" {}", post.profile), style_muted())),
            Line::from(""),
        ];
        frame.render_widget(Paragraph::new(header), chunks[0]);

        frame.render_widget(
            Paragraph::new(post.content.as_str())
                .style(style_default())
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            Rect {
                x: chunks[1].x + 1,
                width: chunks[1].width.saturating_sub(2),
                ..chunks[1]
            },
        );

        let actions = Line::from(vec![
            Span::styled(" [e]", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(" edit   ", style_secondary()),
            Span::styled("[d]", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled(" delete", style_secondary()),
        ]);
        frame.render_widget(Paragraph::new(actions), chunks[2]);
    }
}
