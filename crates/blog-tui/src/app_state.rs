//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this for the listing, the open post and the load status,
//! but never mutate it. The App event-loop is the only thing that writes to
//! AppState.

use blog_proto::config::ListingConfig;
use blog_proto::pagination::PageSelector;
use blog_proto::render::{self, PostCard};
use blog_proto::{ListQuery, Post, PostPage};

use crate::action::Screen;
use crate::widgets::status_bar::InputMode;

/// Load state of the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// The page of posts currently on screen plus the query that produced it.
#[derive(Debug, Clone)]
pub struct Listing {
    pub query: ListQuery,
    pub cards: Vec<PostCard>,
    pub total_count: usize,
    pub selector: PageSelector,
}

impl Listing {
    pub fn empty(listing: &ListingConfig) -> Self {
        Self {
            query: ListQuery::first_page(listing),
            cards: Vec::new(),
            total_count: 0,
            selector: PageSelector::default(),
        }
    }

    /// Replace the displayed page with a fresh response.
    pub fn apply(&mut self, query: ListQuery, page: &PostPage, max_content_length: usize) {
        self.cards = render::cards(&page.posts, max_content_length);
        self.total_count = page.total_count;
        self.selector = PageSelector::from_total(page.total_count, query.page_size, query.page);
        self.query = query;
    }
}

/// The full shared state of the application.
/// Components read this; only the App event-loop writes to it.
pub struct AppState {
    pub screen: Screen,
    pub status: ViewStatus,
    pub input_mode: InputMode,

    // ── Data ────────────────────────────────────────────────────────────────
    pub listing: Listing,
    /// Post shown on the detail screen or being edited.
    pub post: Option<Post>,
    /// A create/update/delete is in flight.
    pub mutating: bool,

    // ── Settings ────────────────────────────────────────────────────────────
    pub listing_config: ListingConfig,
    pub default_profile: String,
    pub api_url: String,
}

impl AppState {
    pub fn new(config: &blog_proto::Config, screen: Screen) -> Self {
        Self {
            screen,
            status: ViewStatus::Idle,
            input_mode: InputMode::Normal,
            listing: Listing::empty(&config.listing),
            post: None,
            mutating: false,
            listing_config: config.listing.clone(),
            default_profile: config.posts.default_profile.clone(),
            api_url: config.collection_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_proto::{Post, PostId};

    fn post(id: u64) -> Post {
        Post {
            id: PostId::from(id),
            title: format!("t{id}"),
            author: "Ada Lovelace".into(),
            date: "2024-01-16T10:00:00.000Z".into(),
            profile: "images/default.jpeg".into(),
            content: "x".repeat(80),
        }
    }

    #[test]
    fn test_listing_apply_builds_cards_and_selector() {
        let config = ListingConfig::default();
        let mut listing = Listing::empty(&config);
        let page = PostPage {
            posts: (1..=12).map(post).collect(),
            total_count: 25,
        };
        listing.apply(ListQuery::first_page(&config), &page, config.max_content_length);

        assert_eq!(listing.cards.len(), 12);
        assert_eq!(listing.selector.total_pages(), 3);
        assert_eq!(listing.selector.active(), Some(1));
        assert!(listing.cards[0].excerpt.ends_with(" ... "));
    }

    #[test]
    fn test_listing_apply_keeps_query() {
        let config = ListingConfig::default();
        let mut listing = Listing::empty(&config);
        let query = ListQuery::first_page(&config).search(Some("react")).page(2);
        let page = PostPage {
            posts: vec![post(1)],
            total_count: 13,
        };
        listing.apply(query.clone(), &page, 50);
        assert_eq!(listing.query, query);
        assert_eq!(listing.selector.active(), Some(2));
    }

    #[test]
    fn test_empty_result_has_no_pages() {
        let config = ListingConfig::default();
        let mut listing = Listing::empty(&config);
        let page = PostPage {
            posts: vec![],
            total_count: 0,
        };
        listing.apply(ListQuery::first_page(&config), &page, 50);
        assert_eq!(listing.selector.total_pages(), 0);
        assert_eq!(listing.selector.active(), None);
    }
}
