//! FocusRing — manages keyboard focus cycling between the panes of a screen.

use crate::action::{ComponentId, Screen};

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    /// Panes of `screen` in Tab order; the first one gets focus on entry.
    pub fn for_screen(screen: &Screen) -> Self {
        Self::new(match screen {
            Screen::List => vec![
                ComponentId::PostList,
                ComponentId::Pagination,
                ComponentId::SearchBar,
            ],
            Screen::Detail(_) => vec![ComponentId::PostDetail],
            Screen::Create | Screen::Edit(_) => vec![ComponentId::PostForm],
        })
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::for_screen(&Screen::List)
    }
}
