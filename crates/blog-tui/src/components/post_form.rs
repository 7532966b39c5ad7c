//! PostForm — the create and edit forms.
//!
//! Create collects title, author and content. Edit loads an existing post,
//! lets title and content change and shows author, date and profile read-only;
//! those are sent back untouched.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use blog_proto::{render, Post};

use crate::{
    action::{Action, ComponentId, PostFields, Screen},
    app_state::{AppState, ViewStatus},
    component::Component,
    theme::{style_muted, style_secondary},
    widgets::{pane_chrome::pane_chrome, text_field::TextField},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

const TITLE: &str = "Title";
const AUTHOR: &str = "Author";
const CONTENT: &str = "Content";

pub struct PostForm {
    mode: FormMode,
    fields: Vec<TextField>,
    focused: usize,
}

impl PostForm {
    pub fn new() -> Self {
        let mut form = Self {
            mode: FormMode::Create,
            fields: Vec::new(),
            focused: 0,
        };
        form.reset_for_create();
        form
    }

    #[cfg(test)]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn reset_for_create(&mut self) {
        self.mode = FormMode::Create;
        self.fields = vec![
            TextField::new(TITLE),
            TextField::new(AUTHOR),
            TextField::new(CONTENT),
        ];
        self.focused = 0;
    }

    /// Edit mode with nothing loaded yet.
    pub fn reset_for_edit(&mut self) {
        self.mode = FormMode::Edit;
        self.fields.clear();
        self.focused = 0;
    }

    /// Fill the edit form from the fetched post.
    pub fn populate(&mut self, post: &Post) {
        self.mode = FormMode::Edit;
        let mut title = TextField::new(TITLE);
        title.set_value(&post.title);
        let mut content = TextField::new(CONTENT);
        content.set_value(&post.content);
        let mut author = TextField::read_only(AUTHOR);
        author.set_value(&post.author);
        let mut date = TextField::read_only("Date");
        date.set_value(&render::format_date(&post.date));
        let mut profile = TextField::read_only("Profile");
        profile.set_value(&post.profile);
        self.fields = vec![title, content, author, date, profile];
        self.focused = 0;
    }

    pub fn field(&self, label: &str) -> Option<&TextField> {
        self.fields.iter().find(|f| f.label == label)
    }

    fn value(&self, label: &str) -> String {
        self.field(label)
            .map(|f| f.value().to_string())
            .unwrap_or_default()
    }

    fn editable_indices(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.editable)
            .map(|(i, _)| i)
            .collect()
    }

    fn step(&mut self, forward: bool) {
        let editable = self.editable_indices();
        if editable.is_empty() {
            return;
        }
        let pos = editable
            .iter()
            .position(|&i| i == self.focused)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % editable.len()
        } else {
            (pos + editable.len() - 1) % editable.len()
        };
        self.focused = editable[next];
    }

    fn on_last_field(&self) -> bool {
        self.editable_indices().last() == Some(&self.focused)
    }

    /// Validate every field; on failure focus the first invalid one.
    fn submit(&mut self, state: &AppState) -> Vec<Action> {
        if self.fields.is_empty() || state.mutating {
            return vec![];
        }
        let mut first_invalid = None;
        for (i, field) in self.fields.iter_mut().enumerate() {
            if !field.validate() && first_invalid.is_none() {
                first_invalid = Some(i);
            }
        }
        if let Some(i) = first_invalid {
            self.focused = i;
            return vec![];
        }
        vec![Action::SubmitPost(PostFields {
            title: self.value(TITLE),
            author: self.value(AUTHOR),
            content: self.value(CONTENT),
        })]
    }
}

impl Default for PostForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PostForm {
    fn id(&self) -> ComponentId {
        ComponentId::PostForm
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Esc => return vec![Action::Back],
            KeyCode::Tab | KeyCode::Down => self.step(true),
            KeyCode::BackTab | KeyCode::Up => self.step(false),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.submit(state);
            }
            KeyCode::Enter => {
                if self.on_last_field() {
                    return self.submit(state);
                }
                self.step(true);
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    field.handle_key(key);
                }
            }
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::Navigate(Screen::Create) => self.reset_for_create(),
            Action::Navigate(Screen::Edit(_)) => self.reset_for_edit(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let title = match self.mode {
            FormMode::Create => "new post",
            FormMode::Edit => "edit post",
        };
        let block = pane_chrome(title, focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.fields.is_empty() {
            let msg = match state.status {
                ViewStatus::Failed => " Could not load this post",
                _ => " Loading post…",
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(msg, style_muted()))),
                inner,
            );
            return;
        }

        let mut y = inner.y + 1;
        for (i, field) in self.fields.iter().enumerate() {
            if y + 1 >= inner.y + inner.height {
                break;
            }
            let row = Rect {
                x: inner.x + 1,
                y,
                width: inner.width.saturating_sub(2),
                height: 2,
            };
            field.draw(frame, row, focused && i == self.focused);
            y += 2;
        }

        if y < inner.y + inner.height {
            let hint = if state.mutating {
                " saving…"
            } else {
                " Enter on the last field or Ctrl+S to save"
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(hint, style_secondary()))),
                Rect {
                    x: inner.x + 1,
                    y,
                    width: inner.width.saturating_sub(2),
                    height: 1,
                },
            );
        }
    }
}
