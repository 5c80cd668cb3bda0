use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::middleware::auth::{AuthUser, create_token};
use crate::user::model::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::user::service::UserService;
use crate::utils::error::CustomError;

pub async fn register_user(
    user_service: web::Data<UserService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();

    let user = user_service
        .register(body.username, body.email, body.password)
        .await?;

    let user_id = user
        .id
        .ok_or_else(|| CustomError::InternalServerError("user id missing".to_string()))?;
    let token = create_token(&user_id, user.role)?;

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "token": token,
        "user": user.to_public_json(),
    })))
}

pub async fn login_user(
    user_service: web::Data<UserService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, CustomError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(CustomError::BadRequestError(
            "email, password required".to_string(),
        ));
    }

    let user = user_service
        .authenticate(&body.email, &body.password)
        .await?;

    let user_id = user
        .id
        .ok_or_else(|| CustomError::InternalServerError("user id missing".to_string()))?;
    let token = create_token(&user_id, user.role)?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "token": token,
        "user": user.to_public_json(),
    })))
}

pub async fn me(
    auth: AuthUser,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, CustomError> {
    let user = user_service
        .find_by_id(&auth.id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "user": user.to_public_json(),
    })))
}

pub async fn update_me(
    auth: AuthUser,
    user_service: web::Data<UserService>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();

    if let Some(bio) = &body.bio {
        if bio.chars().count() > 200 {
            return Err(CustomError::BadRequestError(
                "bio must be at most 200 chars".to_string(),
            ));
        }
    }

    let user = user_service
        .update_profile(&auth.id, body.bio, body.avatar_url)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "user": user.to_public_json(),
    })))
}
