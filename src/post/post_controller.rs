use actix_web::{HttpResponse, web};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use serde_json::json;

use crate::middleware::auth::AuthUser;
use crate::post::post_model::{
    CreatePostRequest, ListPostsQuery, MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH, PageQuery, Post,
    PostStatus, UpdatePostRequest, parse_tags,
};
use crate::post::post_service::PostService;
use crate::post::trending::{TrendingQuery, clamp_days, clamp_trending_limit};
use crate::utils::error::CustomError;
use crate::utils::helpers::{assert_owner, clamp_limit, clamp_page, now_rfc3339, parse_object_id};

pub async fn create_post(
    auth: AuthUser,
    post_service: web::Data<PostService>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let title = body.title.trim().to_string();

    if title.is_empty() || body.content.trim().is_empty() {
        return Err(CustomError::BadRequestError(
            "title and content required".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CustomError::BadRequestError(format!(
            "title must be at most {} chars",
            MAX_TITLE_LENGTH
        )));
    }
    if body.content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(CustomError::BadRequestError(format!(
            "content must be at most {} chars",
            MAX_CONTENT_LENGTH
        )));
    }

    let post = Post {
        id: ObjectId::new(),
        author_id: auth.id,
        title,
        content: body.content,
        tags: parse_tags(body.tags),
        status: PostStatus::parse(body.status.as_deref()),
        likes_count: 0,
        comments_count: 0,
        is_deleted: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let post = post_service.insert_post(post).await?;

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "post": post,
    })))
}

/// Public feed: published, non-deleted posts only.
pub async fn list_posts(
    post_service: web::Data<PostService>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, CustomError> {
    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit, 10);

    let mut filter = doc! { "status": "published", "is_deleted": false };

    // Invalid author ids are ignored rather than rejected.
    if let Some(author_id) = &query.author_id {
        if let Ok(author_id) = ObjectId::parse_str(author_id) {
            filter.insert("author_id", author_id);
        }
    }

    if let Some(tag) = &query.tag {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() {
            filter.insert("tags", tag);
        }
    }

    if let Some(search) = &query.search {
        let search = search.trim();
        if !search.is_empty() {
            let pattern = regex::escape(search);
            filter.insert(
                "$or",
                vec![
                    doc! { "title": { "$regex": &pattern, "$options": "i" } },
                    doc! { "content": { "$regex": &pattern, "$options": "i" } },
                ],
            );
        }
    }

    let sort = match query.sort.as_deref() {
        Some("top") => doc! { "likes_count": -1, "comments_count": -1, "created_at": -1 },
        _ => doc! { "created_at": -1 },
    };

    let (items, total) = post_service.list(filter, sort, page, limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "page": page,
        "limit": limit,
        "total": total,
        "items": items,
    })))
}

pub async fn trending_posts(
    post_service: web::Data<PostService>,
    query: web::Query<TrendingQuery>,
) -> Result<HttpResponse, CustomError> {
    let query = query.into_inner();
    let items = post_service.trending(&query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "days": clamp_days(query.days),
        "limit": clamp_trending_limit(query.limit),
        "items": items,
    })))
}

pub async fn get_post(
    auth: AuthUser,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&path.into_inner(), "post")?;

    let post = post_service
        .find_by_id(&post_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or_else(|| CustomError::NotFoundError("post not found".to_string()))?;

    // drafts are visible to their author only
    if post.status == PostStatus::Draft && post.author_id != auth.id {
        return Err(CustomError::ForbiddenError("forbidden".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "post": post,
    })))
}

pub async fn update_post(
    auth: AuthUser,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&path.into_inner(), "post")?;
    let body = body.into_inner();

    let post = post_service
        .find_by_id(&post_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or_else(|| CustomError::NotFoundError("post not found".to_string()))?;

    assert_owner(&auth.id, &post.author_id, "post")?;

    let mut patch = doc! { "updated_at": now_rfc3339() };
    if let Some(title) = body.title {
        let title = title.trim().to_string();
        if title.is_empty() || title.chars().count() > MAX_TITLE_LENGTH {
            return Err(CustomError::BadRequestError("invalid title".to_string()));
        }
        patch.insert("title", title);
    }
    if let Some(content) = body.content {
        if content.trim().is_empty() || content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(CustomError::BadRequestError("invalid content".to_string()));
        }
        patch.insert("content", content);
    }
    if let Some(tags) = body.tags {
        patch.insert("tags", parse_tags(Some(tags)));
    }
    if let Some(status) = body.status {
        patch.insert("status", PostStatus::parse(Some(status.as_str())).as_str());
    }

    let post = post_service
        .update_post(&post_id, patch)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "post": post,
    })))
}

pub async fn delete_post(
    auth: AuthUser,
    post_service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&path.into_inner(), "post")?;

    let post = post_service
        .find_by_id(&post_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or_else(|| CustomError::NotFoundError("post not found".to_string()))?;

    assert_owner(&auth.id, &post.author_id, "post")?;

    post_service.soft_delete(&post_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// The caller's own posts, drafts included.
pub async fn my_posts(
    auth: AuthUser,
    post_service: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit, 10);

    let filter = doc! { "author_id": auth.id, "is_deleted": false };
    let (items, total) = post_service
        .list(filter, doc! { "created_at": -1 }, page, limit)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "page": page,
        "limit": limit,
        "total": total,
        "items": items,
    })))
}

pub async fn my_drafts(
    auth: AuthUser,
    post_service: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit, 10);

    let filter = doc! { "author_id": auth.id, "status": "draft", "is_deleted": false };
    let (items, total) = post_service
        .list(filter, doc! { "created_at": -1 }, page, limit)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "page": page,
        "limit": limit,
        "total": total,
        "items": items,
    })))
}
