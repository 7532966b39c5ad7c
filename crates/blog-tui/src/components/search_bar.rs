//! SearchBar — full-text search over the collection, re-queried on every keystroke.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, Frame};

use crate::{
    action::{Action, ComponentId, Screen},
    app_state::AppState,
    component::Component,
    widgets::filter_input::{FilterAction, FilterInput},
};

pub struct SearchBar {
    input: FilterInput,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            input: FilterInput::default(),
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        self.input.text()
    }
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SearchBar {
    fn id(&self) -> ComponentId {
        ComponentId::SearchBar
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.input.activate();
        match self.input.handle_key(key) {
            FilterAction::Changed(text) => vec![Action::SearchChanged(text)],
            FilterAction::Confirmed | FilterAction::Cancelled => {
                vec![Action::FocusPane(ComponentId::PostList)]
            }
            FilterAction::None => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if matches!(event.kind, MouseEventKind::Down(_)) {
            self.input.activate();
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            // Entering the list screen starts from an empty field.
            Action::Navigate(Screen::List) => {
                self.input.clear();
                self.input.deactivate();
            }
            Action::FocusPane(ComponentId::SearchBar) => self.input.activate(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        if focused {
            self.input.activate();
        } else {
            self.input.deactivate();
        }
        self.input.draw(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn state() -> AppState {
        AppState::new(&blog_proto::Config::default(), Screen::List)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_each_keystroke_emits_search() {
        let s = state();
        let mut bar = SearchBar::new();
        let mut last = vec![];
        for c in "react".chars() {
            last = bar.handle_key(key(KeyCode::Char(c)), &s);
        }
        assert_eq!(last, vec![Action::SearchChanged("react".into())]);
    }

    #[test]
    fn test_esc_clears_to_empty_search() {
        let s = state();
        let mut bar = SearchBar::new();
        bar.handle_key(key(KeyCode::Char('r')), &s);
        assert_eq!(
            bar.handle_key(key(KeyCode::Esc), &s),
            vec![Action::SearchChanged(String::new())]
        );
        assert_eq!(
            bar.handle_key(key(KeyCode::Esc), &s),
            vec![Action::FocusPane(ComponentId::PostList)]
        );
    }

    #[test]
    fn test_entering_list_screen_clears_field() {
        let s = state();
        let mut bar = SearchBar::new();
        bar.handle_key(key(KeyCode::Char('q')), &s);
        bar.on_action(&Action::Navigate(Screen::List), &s);
        assert_eq!(bar.text(), "");
    }
}
