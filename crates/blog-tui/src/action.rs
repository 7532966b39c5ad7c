//! Action enum — everything a key press, click or response can ask the App to do.

use blog_proto::PostId;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    SearchBar,
    PostList,
    Pagination,
    PostDetail,
    PostForm,
    HelpOverlay,
}

/// The four screens of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail(PostId),
    Create,
    Edit(PostId),
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Self::List => "posts",
            Self::Detail(_) => "post",
            Self::Create => "new post",
            Self::Edit(_) => "edit post",
        }
    }

    /// Where Esc leads from here.
    pub fn parent(&self) -> Option<Screen> {
        match self {
            Self::List => None,
            Self::Detail(_) | Self::Create => Some(Self::List),
            Self::Edit(id) => Some(Self::Detail(id.clone())),
        }
    }
}

/// Values collected by the post form. `author` is ignored when editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub author: String,
    pub content: String,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    Navigate(Screen),
    Back,
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Listing ──────────────────────────────────────────────────────────────
    GoToPage(usize),
    SearchChanged(String),
    Refresh,

    // ── Post mutations ───────────────────────────────────────────────────────
    SubmitPost(PostFields),
    DeletePost(PostId),

    // ── UI toggles ───────────────────────────────────────────────────────────
    DismissNotification,
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
    Noop,
}
