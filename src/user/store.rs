use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use crate::database::db::is_duplicate_key;
use crate::user::model::User;
use crate::utils::error::CustomError;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with a conflict when the email is already taken.
    async fn insert(&self, user: User) -> Result<User, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError>;

    /// Returns the updated user, or `None` when no user has `id`.
    async fn update_status(&self, id: &ObjectId, status: &str)
    -> Result<Option<User>, CustomError>;
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>("users"),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, user: User) -> Result<User, CustomError> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => {
                Err(CustomError::ConflictError("User already exists!".to_string()))
            }
            Err(e) => Err(CustomError::store("Failed to create user", e)),
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| CustomError::store("Failed to fetch user", e))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| CustomError::store("Failed to fetch user", e))
    }

    async fn update_status(
        &self,
        id: &ObjectId,
        status: &str,
    ) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": { "status": status } })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| CustomError::store("Failed to update status", e))
    }
}
