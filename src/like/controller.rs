use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::like::service::LikeService;
use crate::middleware::auth::AuthUser;
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;

/// POST /api/posts/{id}/like
pub async fn like_post(
    auth: AuthUser,
    path: web::Path<String>,
    like_service: web::Data<LikeService>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&path.into_inner(), "post")?;

    post_service
        .find_by_id(&post_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or_else(|| CustomError::NotFoundError("post not found".to_string()))?;

    if like_service.insert(auth.id, post_id).await? {
        // increment only after the insert went through
        post_service.bump_likes_count(&post_id, 1).await?;

        return Ok(HttpResponse::Created().json(json!({
            "ok": true,
            "liked": true,
        })));
    }

    // duplicate like: report liked, leave the counter alone
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "liked": true,
        "message": "already liked",
    })))
}

/// DELETE /api/posts/{id}/like
pub async fn unlike_post(
    auth: AuthUser,
    path: web::Path<String>,
    like_service: web::Data<LikeService>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let post_id = parse_object_id(&path.into_inner(), "post")?;

    // decrement only when a row was actually deleted; a no-op unlike must not
    // drive the counter negative
    if like_service.remove(auth.id, post_id).await? {
        post_service.bump_likes_count(&post_id, -1).await?;
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "liked": false,
    })))
}
