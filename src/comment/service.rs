use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Client, Collection, IndexModel};

use crate::comment::model::{Comment, CommentWithUser};
use crate::database;
use crate::utils::error::CustomError;
use crate::utils::helpers::now_rfc3339;

pub struct CommentService {
    collection: Collection<Comment>,
}

impl CommentService {
    pub fn new(client: &Client) -> Self {
        let collection = database::app_database(client).collection::<Comment>("comments");
        CommentService { collection }
    }

    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let model = IndexModel::builder()
            .keys(doc! { "post_id": 1, "created_at": -1 })
            .build();

        self.collection.create_index(model).await.map_err(|e| {
            CustomError::InternalServerError(format!("failed to create comment index: {}", e))
        })?;

        Ok(())
    }

    pub async fn insert(&self, mut comment: Comment) -> Result<Comment, CustomError> {
        let result = self.collection.insert_one(&comment).await.map_err(|e| {
            CustomError::InternalServerError(format!("failed to add comment: {}", e))
        })?;

        comment.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("failed to get inserted comment id".to_string())
        })?);

        Ok(comment)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, CustomError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("failed to fetch comment: {}", e))
            })
    }

    /// One page of a post's live comments, newest first, each with its
    /// author's `{id, username}` joined in.
    pub async fn list_for_post(
        &self,
        post_id: &ObjectId,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<CommentWithUser>, u64), CustomError> {
        let filter = doc! { "post_id": post_id, "is_deleted": false };

        let total = self
            .collection
            .count_documents(filter.clone())
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("failed to count comments: {}", e))
            })?;

        let pipeline = vec![
            doc! { "$match": filter },
            doc! { "$sort": { "created_at": -1 } },
            doc! { "$skip": (page - 1) * limit },
            doc! { "$limit": limit },
            doc! { "$lookup": {
                "from": "users",
                "localField": "user_id",
                "foreignField": "_id",
                "as": "user",
            } },
            doc! { "$unwind": "$user" },
            doc! { "$addFields": { "user": { "id": "$user._id", "username": "$user.username" } } },
        ];

        let cursor = self.collection.aggregate(pipeline).await.map_err(|e| {
            CustomError::InternalServerError(format!("failed to query comments: {}", e))
        })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("failed to collect comments: {}", e))
        })?;

        let items = documents
            .into_iter()
            .map(|document| {
                mongodb::bson::from_document(document).map_err(|e| {
                    CustomError::InternalServerError(format!("failed to decode comment: {}", e))
                })
            })
            .collect::<Result<Vec<CommentWithUser>, CustomError>>()?;

        Ok((items, total))
    }

    /// Flip `is_deleted` on the author's own live comment. The filter is the
    /// gate: a repeated delete, or a concurrent one that lost the race, no
    /// longer matches and returns false, so the caller never decrements twice.
    pub async fn soft_delete(
        &self,
        comment_id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": comment_id, "user_id": user_id, "is_deleted": false },
                doc! { "$set": { "is_deleted": true, "updated_at": now_rfc3339() } },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("failed to delete comment: {}", e))
            })?;

        Ok(result.modified_count == 1)
    }
}
