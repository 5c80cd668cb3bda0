use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, IndexModel};

use crate::database;
use crate::user::model::{User, UserRole};
use crate::utils::error::CustomError;
use crate::utils::helpers::now_rfc3339;
use crate::utils::{hashing, password_validation};

pub struct UserService {
    collection: Collection<User>,
}

impl UserService {
    pub fn new(client: &Client) -> Self {
        let collection = database::app_database(client).collection::<User>("users");
        UserService { collection }
    }

    /// Unique constraints on username and email back the registration checks.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let models = vec![
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        ];

        self.collection.create_indexes(models).await.map_err(|e| {
            CustomError::InternalServerError(format!("failed to create user indexes: {}", e))
        })?;

        Ok(())
    }

    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<User, CustomError> {
        let username = username.trim().to_string();
        let email = email.trim().to_lowercase();

        if username.chars().count() < 3 || username.chars().count() > 30 {
            return Err(CustomError::BadRequestError(
                "username must be between 3 and 30 chars".to_string(),
            ));
        }
        if email.is_empty() {
            return Err(CustomError::BadRequestError("email required".to_string()));
        }
        password_validation::validate_password(&password)?;

        let exists = self
            .collection
            .find_one(doc! { "$or": [ { "username": &username }, { "email": &email } ] })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to check user: {}", e)))?;

        if exists.is_some() {
            return Err(CustomError::ConflictError(
                "username or email already taken".to_string(),
            ));
        }

        let password_hash = hashing::hash_password(&password)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        let mut new_user = User {
            id: None,
            username,
            email,
            password_hash,
            role: UserRole::default(),
            bio: String::new(),
            avatar_url: String::new(),
            followers_count: 0,
            following_count: 0,
            posts_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // The unique indexes close the check-then-insert race: a concurrent
        // registration of the same name lands here as a duplicate key.
        let result = match self.collection.insert_one(&new_user).await {
            Ok(result) => result,
            Err(e) if database::is_duplicate_key_error(&e) => {
                return Err(CustomError::ConflictError(
                    "username or email already taken".to_string(),
                ));
            }
            Err(e) => {
                return Err(CustomError::InternalServerError(format!(
                    "failed to create user: {}",
                    e
                )));
            }
        };

        new_user.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("failed to get inserted user id".to_string())
        })?);

        Ok(new_user)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to fetch user: {}", e)))
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, CustomError> {
        let user = self
            .collection
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to fetch user: {}", e)))?
            .ok_or_else(|| CustomError::UnauthenticatedError("invalid credentials".to_string()))?;

        let password_matches = hashing::verify_password(password, &user.password_hash)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        if !password_matches {
            return Err(CustomError::UnauthenticatedError(
                "invalid credentials".to_string(),
            ));
        }

        Ok(user)
    }

    pub async fn update_profile(
        &self,
        id: &ObjectId,
        bio: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Option<User>, CustomError> {
        let mut patch = doc! { "updated_at": now_rfc3339() };
        if let Some(bio) = bio {
            patch.insert("bio", bio);
        }
        if let Some(avatar_url) = avatar_url {
            patch.insert("avatar_url", avatar_url);
        }

        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": patch })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| CustomError::InternalServerError(format!("failed to update user: {}", e)))
    }
}
