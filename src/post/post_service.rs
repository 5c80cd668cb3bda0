use chrono::{Duration, SecondsFormat, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, IndexModel};

use crate::database;
use crate::post::post_model::{Post, PostWithAuthor};
use crate::post::trending::{self, TrendingQuery};
use crate::utils::error::CustomError;
use crate::utils::helpers::now_rfc3339;

pub struct PostService {
    collection: Collection<Post>,
}

impl PostService {
    pub fn new(client: &Client) -> Self {
        let collection = database::app_database(client).collection::<Post>("posts");
        PostService { collection }
    }

    /// Feed, per-author and tag listings all sort by recency.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let models = vec![
            IndexModel::builder()
                .keys(doc! { "status": 1, "is_deleted": 1, "created_at": -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "author_id": 1, "created_at": -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "tags": 1, "created_at": -1 })
                .build(),
        ];

        self.collection.create_indexes(models).await.map_err(|e| {
            CustomError::InternalServerError(format!("failed to create post indexes: {}", e))
        })?;

        Ok(())
    }

    pub async fn insert_post(&self, post: Post) -> Result<Post, CustomError> {
        self.collection
            .insert_one(&post)
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to create post: {}", e)))?;

        Ok(post)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to fetch post: {}", e)))
    }

    /// One page of posts matching `filter`, each with its author joined in,
    /// plus the total match count for pagination.
    pub async fn list(
        &self,
        filter: Document,
        sort: Document,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<PostWithAuthor>, u64), CustomError> {
        let total = self
            .collection
            .count_documents(filter.clone())
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to count posts: {}", e)))?;

        let pipeline = vec![
            doc! { "$match": filter },
            doc! { "$sort": sort },
            doc! { "$skip": (page - 1) * limit },
            doc! { "$limit": limit },
            doc! { "$lookup": {
                "from": "users",
                "localField": "author_id",
                "foreignField": "_id",
                "as": "author",
            } },
            doc! { "$unwind": "$author" },
            doc! { "$addFields": { "author": { "id": "$author._id", "username": "$author.username" } } },
        ];

        let items = self.run_post_pipeline(pipeline).await?;
        Ok((items, total))
    }

    pub async fn trending(&self, query: &TrendingQuery) -> Result<Vec<PostWithAuthor>, CustomError> {
        let since = (Utc::now() - Duration::days(trending::clamp_days(query.days)))
            .to_rfc3339_opts(SecondsFormat::AutoSi, true);

        self.run_post_pipeline(trending::build_pipeline(query, &since))
            .await
    }

    async fn run_post_pipeline(
        &self,
        pipeline: Vec<Document>,
    ) -> Result<Vec<PostWithAuthor>, CustomError> {
        let cursor = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to query posts: {}", e)))?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("failed to collect posts: {}", e))
        })?;

        documents
            .into_iter()
            .map(|document| {
                mongodb::bson::from_document(document).map_err(|e| {
                    CustomError::InternalServerError(format!("failed to decode post: {}", e))
                })
            })
            .collect()
    }

    pub async fn update_post(
        &self,
        id: &ObjectId,
        patch: Document,
    ) -> Result<Option<Post>, CustomError> {
        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": patch })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to update post: {}", e)))
    }

    pub async fn soft_delete(&self, id: &ObjectId) -> Result<(), CustomError> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "is_deleted": true, "updated_at": now_rfc3339() } },
            )
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to delete post: {}", e)))?;

        Ok(())
    }

    /// Counter maintenance: a single atomic `$inc` scoped to one document.
    /// Never read-modify-write from application code, so concurrent likes and
    /// comments on the same post cannot lose updates to each other.
    pub async fn bump_likes_count(&self, id: &ObjectId, delta: i64) -> Result<(), CustomError> {
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$inc": { "likes_count": delta } })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("failed to update likes count: {}", e))
            })?;

        Ok(())
    }

    pub async fn bump_comments_count(&self, id: &ObjectId, delta: i64) -> Result<(), CustomError> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$inc": { "comments_count": delta } },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("failed to update comments count: {}", e))
            })?;

        Ok(())
    }
}
