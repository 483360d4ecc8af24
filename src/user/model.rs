use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STATUS: &str = "I am new!";

/// A user document as stored in the `users` collection.
///
/// Owned posts are not stored here; they are looked up by `creator`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub status: String,
}

impl User {
    pub fn new(name: String, email: String, hashed_password: String) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            email,
            password: hashed_password,
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserInput {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
}

/// Public shape of a user, without the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: String,
    pub posts: Vec<String>,
}

impl UserView {
    pub fn new(user: &User, posts: &[ObjectId]) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            status: user.status.clone(),
            posts: posts.iter().map(|id| id.to_hex()).collect(),
        }
    }
}

/// The creator summary embedded in a post.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: String,
}

impl From<&User> for CreatorView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            status: user.status.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub token: String,
    pub user_id: String,
}
