//! In-process stores that stand in for MongoDB in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::post::post_model::Post;
use crate::post::post_store::PostStore;
use crate::user::model::User;
use crate::user::store::UserStore;
use crate::utils::error::CustomError;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<ObjectId, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<User, CustomError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(CustomError::ConflictError("User already exists!".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_status(
        &self,
        id: &ObjectId,
        status: &str,
    ) -> Result<Option<User>, CustomError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(id).map(|user| {
            user.status = status.to_string();
            user.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemoryPostStore {
    posts: RwLock<HashMap<ObjectId, Post>>,
}

impl MemoryPostStore {
    async fn sorted(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| {
            a.created_at
                .timestamp_millis()
                .cmp(&b.created_at.timestamp_millis())
                .then(a.id.cmp(&b.id))
        });
        posts
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, post: Post) -> Result<Post, CustomError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Post>, CustomError> {
        Ok(self
            .sorted()
            .await
            .into_iter()
            .rev()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn ids_by_creator(&self, creator: &ObjectId) -> Result<Vec<ObjectId>, CustomError> {
        Ok(self
            .sorted()
            .await
            .into_iter()
            .filter(|post| post.creator == *creator)
            .map(|post| post.id)
            .collect())
    }

    async fn creators_of_image(&self, image_url: &str) -> Result<Vec<ObjectId>, CustomError> {
        Ok(self
            .sorted()
            .await
            .into_iter()
            .filter(|post| post.image_url == image_url)
            .map(|post| post.creator)
            .collect())
    }

    async fn replace(&self, post: &Post) -> Result<(), CustomError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        Ok(self.posts.write().await.remove(id).is_some())
    }
}
