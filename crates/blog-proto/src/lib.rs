//! Shared pieces of blogdeck: the post model, configuration, the HTTP client
//! for the `/blogs` collection, and the pure card/pagination shaping used by
//! the TUI.

pub mod client;
pub mod config;
pub mod pagination;
pub mod platform;
pub mod post;
pub mod render;

pub use client::{ApiError, BlogClient, ListQuery, PostPage};
pub use config::Config;
pub use post::{NewPost, Post, PostId};
