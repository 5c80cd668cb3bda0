use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::user::model::UserRole;
use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub role: UserRole,
    pub exp: usize,
}

const TOKEN_TTL_DAYS: i64 = 7;

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string())
}

/// Create a JWT for a logged-in user.
pub fn create_token(user_id: &ObjectId, role: UserRole) -> Result<String, CustomError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(TOKEN_TTL_DAYS))
        .ok_or_else(|| CustomError::InternalServerError("token expiry overflow".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        id: user_id.to_hex(),
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .map_err(|_| CustomError::InternalServerError("token generation failed".to_string()))
}

pub fn decode_token(token: &str) -> Result<Claims, CustomError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| CustomError::UnauthenticatedError("invalid token".to_string()))
}

/// The authenticated caller, pulled out of the bearer token. Handlers that
/// take this as an argument reject unauthenticated requests with a 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub role: UserRole,
}

impl FromRequest for AuthUser {
    type Error = CustomError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let bearer = BearerAuth::from_request(req, payload);

        Box::pin(async move {
            let credentials = bearer.await.map_err(|_| {
                CustomError::UnauthenticatedError("missing bearer token".to_string())
            })?;

            let claims = decode_token(credentials.token())?;

            let id = ObjectId::parse_str(&claims.id).map_err(|_| {
                CustomError::UnauthenticatedError("invalid user id in token".to_string())
            })?;

            Ok(AuthUser {
                id,
                role: claims.role,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_id_and_role() {
        let user_id = ObjectId::new();
        let token = create_token(&user_id, UserRole::User).unwrap();

        let claims = decode_token(&token).unwrap();
        assert_eq!(claims.id, user_id.to_hex());
        assert!(matches!(claims.role, UserRole::User));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let expired = Claims {
            id: ObjectId::new().to_hex(),
            role: UserRole::User,
            // well past the default leeway
            exp: (chrono::Utc::now().timestamp() - 3600) as usize,
        };
        let token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret(jwt_secret().as_bytes()),
        )
        .unwrap();

        assert!(decode_token(&token).is_err());
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let token = create_token(&ObjectId::new(), UserRole::Admin).unwrap();
        let mut tampered = token.clone();
        tampered.pop();

        assert!(decode_token(&tampered).is_err());
    }
}
