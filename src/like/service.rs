use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};

use crate::database;
use crate::like::model::Like;
use crate::utils::error::CustomError;

pub struct LikeService {
    collection: Collection<Like>,
}

impl LikeService {
    pub fn new(client: &Client) -> Self {
        let collection = database::app_database(client).collection::<Like>("likes");
        LikeService { collection }
    }

    /// At most one like per (user, post) pair, enforced by the store.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "post_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(model).await.map_err(|e| {
            CustomError::InternalServerError(format!("failed to create like index: {}", e))
        })?;

        Ok(())
    }

    /// Insert a like row. Returns false when the pair already exists — the
    /// unique index rejects the duplicate, which also settles the race where
    /// two concurrent likes from the same user both attempt the insert.
    pub async fn insert(&self, user_id: ObjectId, post_id: ObjectId) -> Result<bool, CustomError> {
        let like = Like {
            id: None,
            user_id,
            post_id,
            created_at: Utc::now(),
        };

        match self.collection.insert_one(&like).await {
            Ok(_) => Ok(true),
            Err(e) if database::is_duplicate_key_error(&e) => Ok(false),
            Err(e) => Err(CustomError::InternalServerError(format!(
                "failed to insert like: {}",
                e
            ))),
        }
    }

    /// Delete the like row for (user, post). Returns whether a row was
    /// actually removed, so the caller only decrements for real deletions.
    pub async fn remove(&self, user_id: ObjectId, post_id: ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "user_id": user_id, "post_id": post_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("failed to delete like: {}", e))
            })?;

        Ok(result.deleted_count == 1)
    }
}
