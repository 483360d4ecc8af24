use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::post::post_model::Post;
use crate::utils::error::CustomError;

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;

    /// Newest first; equal timestamps fall back to descending id.
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Post>, CustomError>;

    async fn count(&self) -> Result<u64, CustomError>;

    /// Ids of every post owned by `creator`, oldest first.
    async fn ids_by_creator(&self, creator: &ObjectId) -> Result<Vec<ObjectId>, CustomError>;

    /// Creators of every post whose `imageUrl` equals `image_url`.
    async fn creators_of_image(&self, image_url: &str) -> Result<Vec<ObjectId>, CustomError>;

    async fn replace(&self, post: &Post) -> Result<(), CustomError>;

    /// Returns whether a post was removed.
    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError>;
}

/// Feed order: newest first, ties broken by descending id.
fn feed_sort() -> Document {
    doc! { "createdAt": -1, "_id": -1 }
}

fn creator_filter(creator: &ObjectId) -> Document {
    doc! { "creator": *creator }
}

fn image_filter(image_url: &str) -> Document {
    doc! { "imageUrl": image_url }
}

pub struct MongoPostStore {
    collection: Collection<Post>,
}

impl MongoPostStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Post>("posts"),
        }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn insert(&self, post: Post) -> Result<Post, CustomError> {
        self.collection
            .insert_one(&post)
            .await
            .map_err(|e| CustomError::store("Failed to create post", e))?;

        Ok(post)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        self.collection
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| CustomError::store("Failed to fetch post", e))
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Post>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(feed_sort())
            .skip(skip)
            .limit(limit as i64)
            .await
            .map_err(|e| CustomError::store("Failed to fetch posts", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::store("Failed to collect posts", e))
    }

    async fn count(&self) -> Result<u64, CustomError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| CustomError::store("Failed to count posts", e))
    }

    async fn ids_by_creator(&self, creator: &ObjectId) -> Result<Vec<ObjectId>, CustomError> {
        let cursor = self
            .collection
            .find(creator_filter(creator))
            .sort(doc! { "createdAt": 1, "_id": 1 })
            .await
            .map_err(|e| CustomError::store("Failed to fetch user posts", e))?;

        let posts: Vec<Post> = cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::store("Failed to collect user posts", e))?;

        Ok(posts.into_iter().map(|post| post.id).collect())
    }

    async fn creators_of_image(&self, image_url: &str) -> Result<Vec<ObjectId>, CustomError> {
        let cursor = self
            .collection
            .find(image_filter(image_url))
            .await
            .map_err(|e| CustomError::store("Failed to fetch posts by image", e))?;

        let posts: Vec<Post> = cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::store("Failed to collect posts by image", e))?;

        Ok(posts.into_iter().map(|post| post.creator).collect())
    }

    async fn replace(&self, post: &Post) -> Result<(), CustomError> {
        self.collection
            .replace_one(doc! { "_id": post.id }, post)
            .await
            .map_err(|e| CustomError::store("Failed to update post", e))?;

        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": *id })
            .await
            .map_err(|e| CustomError::store("Failed to delete post", e))?;

        Ok(result.deleted_count > 0)
    }
}
