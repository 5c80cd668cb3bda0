use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post_id: ObjectId,
    pub user_id: ObjectId,
    pub text: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing shape: the comment plus `{id, username}` of its author.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentWithUser {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: CommentUserRef,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentUserRef {
    pub id: ObjectId,
    pub username: String,
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}
