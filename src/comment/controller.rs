use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;

use crate::comment::model::{Comment, CreateCommentRequest, MAX_COMMENT_LENGTH};
use crate::comment::service::CommentService;
use crate::middleware::auth::AuthUser;
use crate::post::post_model::PageQuery;
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::{assert_owner, clamp_limit, clamp_page, parse_object_id};

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    auth: AuthUser,
    path: web::Path<String>,
    comment_service: web::Data<CommentService>,
    post_service: web::Data<PostService>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&path.into_inner(), "post")?;
    let text = body.into_inner().text.trim().to_string();

    if text.is_empty() {
        return Err(CustomError::BadRequestError("text required".to_string()));
    }
    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CustomError::BadRequestError(format!(
            "text must be at most {} chars",
            MAX_COMMENT_LENGTH
        )));
    }

    post_service
        .find_by_id(&post_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or_else(|| CustomError::NotFoundError("post not found".to_string()))?;

    let comment = comment_service
        .insert(Comment {
            id: None,
            post_id,
            user_id: auth.id,
            text,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await?;

    // increment only after the insert went through
    post_service.bump_comments_count(&post_id, 1).await?;

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "comment": comment,
    })))
}

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    path: web::Path<String>,
    comment_service: web::Data<CommentService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&path.into_inner(), "post")?;
    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit, 10);

    let (items, total) = comment_service.list_for_post(&post_id, page, limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "page": page,
        "limit": limit,
        "total": total,
        "items": items,
    })))
}

/// DELETE /api/comments/{id} — soft delete, author only.
pub async fn delete_comment(
    auth: AuthUser,
    path: web::Path<String>,
    comment_service: web::Data<CommentService>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = parse_object_id(&path.into_inner(), "comment")?;

    let comment = comment_service
        .find_by_id(&comment_id)
        .await?
        .filter(|c| !c.is_deleted)
        .ok_or_else(|| CustomError::NotFoundError("comment not found".to_string()))?;

    assert_owner(&auth.id, &comment.user_id, "comment")?;

    // the conditional flip is the gate against a double decrement
    if !comment_service.soft_delete(&comment_id, &auth.id).await? {
        return Err(CustomError::NotFoundError("comment not found".to_string()));
    }

    post_service.bump_comments_count(&comment.post_id, -1).await?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
