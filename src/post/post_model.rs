use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::user::model::CreatorView;

pub const POSTS_PER_PAGE: u64 = 2;

/// A post document as stored in the `posts` collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Post {
    pub fn new(title: String, content: String, image_url: String, creator: ObjectId) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            title,
            content,
            image_url,
            creator,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    pub title: String,
    pub content: String,
    /// `None` leaves the stored image untouched.
    #[serde(default, deserialize_with = "optional_image_url")]
    pub image_url: Option<String>,
}

/// Older clients send the literal string `"undefined"` for "no new image".
fn optional_image_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|url| url != "undefined"))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: CreatorView,
    pub created_at: String,
    pub updated_at: String,
}

impl PostView {
    pub fn new(post: &Post, creator: CreatorView) -> Self {
        Self {
            id: post.id.to_hex(),
            title: post.title.clone(),
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            creator,
            created_at: rfc3339(post.created_at),
            updated_at: rfc3339(post.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub total_posts: u64,
}

fn rfc3339(at: DateTime) -> String {
    at.try_to_rfc3339_string()
        .unwrap_or_else(|_| at.timestamp_millis().to_string())
}
