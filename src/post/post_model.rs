use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_CONTENT_LENGTH: usize = 5000;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
}

impl PostStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PostStatus::Published => "published",
            PostStatus::Draft => "draft",
        }
    }

    /// Anything other than an explicit "draft" publishes the post.
    pub fn parse(value: Option<&str>) -> PostStatus {
        match value {
            Some("draft") => PostStatus::Draft,
            _ => PostStatus::Published,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub author_id: ObjectId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Denormalized `{id, username}` of a post's author, joined in at read time.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: ObjectId,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorRef,
}

/// Tags arrive either as a JSON array or as one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

pub fn parse_tags(tags: Option<TagsInput>) -> Vec<String> {
    match tags {
        None => Vec::new(),
        Some(TagsInput::List(list)) => list
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(TagsInput::Csv(csv)) => csv
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect(),
    }
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Option<TagsInput>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<TagsInput>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct ListPostsQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub author_id: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_accept_lists_and_csv() {
        let from_list = parse_tags(Some(TagsInput::List(vec![
            " Rust ".into(),
            "WEB".into(),
            "".into(),
        ])));
        assert_eq!(from_list, vec!["rust", "web"]);

        let from_csv = parse_tags(Some(TagsInput::Csv("Rust, web , ,db".into())));
        assert_eq!(from_csv, vec!["rust", "web", "db"]);

        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn status_coerces_unknown_values_to_published() {
        assert_eq!(PostStatus::parse(Some("draft")), PostStatus::Draft);
        assert_eq!(PostStatus::parse(Some("published")), PostStatus::Published);
        assert_eq!(PostStatus::parse(Some("archived")), PostStatus::Published);
        assert_eq!(PostStatus::parse(None), PostStatus::Published);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PostStatus::Draft).unwrap(),
            "\"draft\""
        );
        assert_eq!(PostStatus::Published.as_str(), "published");
    }
}
