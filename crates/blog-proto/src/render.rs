//! Pure text shaping for post cards and the detail view.
//!
//! Nothing here touches the terminal; the TUI components draw whatever these
//! functions produce.

use chrono::{DateTime, FixedOffset, Local, TimeZone};

use crate::post::{Post, PostId};

/// Appended to content cut at the truncation threshold.
pub const ELLIPSIS: &str = " ... ";

/// Cut `content` to `max_len` characters and append [`ELLIPSIS`].
///
/// The cut is a hard one on char boundaries; words are not respected.
pub fn truncate_content(content: &str, max_len: usize) -> String {
    match content.char_indices().nth(max_len) {
        Some((byte_idx, _)) => format!("{}{}", &content[..byte_idx], ELLIPSIS),
        None => content.to_string(),
    }
}

/// `"Tue, Jan 16, 2024"` in the local time zone.
pub fn format_date(iso: &str) -> String {
    format_date_in(iso, &Local)
}

/// Like [`format_date`] for an explicit zone. Unparsable input comes back as-is.
pub fn format_date_in<Tz: TimeZone>(iso: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp(iso) {
        Some(ts) => ts.with_timezone(tz).format("%a, %b %-d, %Y").to_string(),
        None => iso.to_string(),
    }
}

fn parse_timestamp(iso: &str) -> Option<DateTime<FixedOffset>> {
    let iso = iso.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(iso) {
        return Some(ts);
    }
    // Date-only values ("2024-01-16") are read as UTC midnight, like `new Date()` does.
    chrono::NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().fixed_offset())
}

/// Up to two uppercase initials standing in for the avatar image.
pub fn initials(author: &str) -> String {
    let letters: String = author
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

/// Everything a list card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub id: PostId,
    pub avatar: String,
    pub profile: String,
    /// `"{author} • {date}"`
    pub byline: String,
    pub title: String,
    pub excerpt: String,
}

impl PostCard {
    pub fn from_post(post: &Post, max_content_length: usize) -> Self {
        Self::build(post, max_content_length, format_date(&post.date))
    }

    pub fn from_post_in<Tz: TimeZone>(post: &Post, max_content_length: usize, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::build(post, max_content_length, format_date_in(&post.date, tz))
    }

    fn build(post: &Post, max_content_length: usize, date: String) -> Self {
        Self {
            id: post.id.clone(),
            avatar: initials(&post.author),
            profile: post.profile.clone(),
            byline: byline(&post.author, &date),
            title: post.title.clone(),
            excerpt: truncate_content(&post.content, max_content_length),
        }
    }
}

pub fn byline(author: &str, formatted_date: &str) -> String {
    format!("{} • {}", author, formatted_date)
}

/// One card per post, in the order given.
pub fn cards(posts: &[Post], max_content_length: usize) -> Vec<PostCard> {
    posts
        .iter()
        .map(|p| PostCard::from_post(p, max_content_length))
        .collect()
}
