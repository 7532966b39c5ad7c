use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier assigned by the backing store.
///
/// json-server hands out numeric ids for seeded data and string ids for
/// records it creates, so both shapes are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for PostId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for PostId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Num(u64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Num(n) => PostId(n.to_string()),
            RawId::Str(s) => PostId(s),
        })
    }
}

/// A blog post as stored in the `/blogs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// ISO-8601 creation timestamp. Kept verbatim so edits send it back untouched.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub content: String,
}

/// Request body for create and update: every field except `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub date: String,
    pub profile: String,
    pub content: String,
}

impl NewPost {
    /// Build a fresh post: dated now, with the placeholder avatar.
    pub fn compose(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
        default_profile: impl Into<String>,
    ) -> Self {
        Self::compose_at(title, author, content, default_profile, chrono::Utc::now())
    }

    pub fn compose_at(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
        default_profile: impl Into<String>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            date: now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            profile: default_profile.into(),
            content: content.into(),
        }
    }

    /// Full-replacement body for an edit. Only title and content change;
    /// author, date and profile are carried over from `original`.
    pub fn edited(original: &Post, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: original.author.clone(),
            date: original.date.clone(),
            profile: original.profile.clone(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let numeric: Post = serde_json::from_str(
            r#"{"id":7,"title":"t","author":"a","date":"2024-01-16T10:00:00.000Z","profile":"p","content":"c"}"#,
        )
        .unwrap();
        assert_eq!(numeric.id.as_str(), "7");

        let text: Post = serde_json::from_str(r#"{"id":"f3a9","title":"t"}"#).unwrap();
        assert_eq!(text.id, PostId::from("f3a9"));
        assert_eq!(text.content, "");
    }

    #[test]
    fn test_compose_uses_default_profile_and_now() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        let post = NewPost::compose_at("A", "B", "C", "images/default.jpeg", now);
        assert_eq!(post.profile, "images/default.jpeg");
        assert_eq!(post.date, "2024-03-05T14:30:00.000Z");
        assert_eq!(post.title, "A");
        assert_eq!(post.author, "B");
        assert_eq!(post.content, "C");
    }

    #[test]
    fn test_edited_keeps_author_date_profile() {
        let original = Post {
            id: PostId::from(3),
            title: "Old".into(),
            author: "Ada".into(),
            date: "2023-11-02T08:15:42.123Z".into(),
            profile: "images/ada.png".into(),
            content: "old body".into(),
        };
        let body = NewPost::edited(&original, "New", "new body");
        assert_eq!(body.title, "New");
        assert_eq!(body.content, "new body");
        assert_eq!(body.author, original.author);
        assert_eq!(body.date, original.date);
        assert_eq!(body.profile, original.profile);
    }

    #[test]
    fn test_new_post_body_has_no_id() {
        let body = NewPost::compose("A", "B", "C", "images/default.jpeg");
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["profile"], "images/default.jpeg");
    }
}
