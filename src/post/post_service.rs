use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::{DateTime, oid::ObjectId};

use crate::middleware::auth::{AuthUser, require_auth};
use crate::post::post_model::{POSTS_PER_PAGE, Post, PostInput, PostPage, PostView, UpdatePostInput};
use crate::post::post_store::PostStore;
use crate::user::model::CreatorView;
use crate::user::store::UserStore;
use crate::utils::error::CustomError;
use crate::utils::uploads::{self, ImageStore};
use crate::utils::validation;

pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
    images: Arc<ImageStore>,
}

fn post_not_found() -> CustomError {
    CustomError::NotFoundError("No post found!".to_string())
}

/// An id that does not parse cannot name a stored post.
fn parse_post_id(id: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(id).map_err(|_| post_not_found())
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        users: Arc<dyn UserStore>,
        images: Arc<ImageStore>,
    ) -> Self {
        PostService {
            posts,
            users,
            images,
        }
    }

    pub async fn create_post(
        &self,
        identity: Option<&AuthUser>,
        input: PostInput,
    ) -> Result<PostView, CustomError> {
        let identity = require_auth(identity)?;
        validation::validate_post(&input.title, &input.content)?;

        let creator = self
            .users
            .find_by_id(&identity.user_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("No user found!".to_string()))?;

        let post = self
            .posts
            .insert(Post::new(input.title, input.content, input.image_url, creator.id))
            .await?;

        log::info!("User {} created post {}", creator.id, post.id);
        Ok(PostView::new(&post, CreatorView::from(&creator)))
    }

    pub async fn list_posts(
        &self,
        identity: Option<&AuthUser>,
        page: Option<i64>,
    ) -> Result<PostPage, CustomError> {
        require_auth(identity)?;

        let page = page.unwrap_or(1).max(1) as u64;
        let total_posts = self.posts.count().await?;
        let posts = self
            .posts
            .list((page - 1).saturating_mul(POSTS_PER_PAGE), POSTS_PER_PAGE)
            .await?;

        let mut creators: HashMap<ObjectId, CreatorView> = HashMap::new();
        let mut views = Vec::with_capacity(posts.len());
        for post in &posts {
            let creator = match creators.get(&post.creator) {
                Some(creator) => creator.clone(),
                None => {
                    let creator = self.creator_view(&post.creator).await?;
                    creators.insert(post.creator, creator.clone());
                    creator
                }
            };
            views.push(PostView::new(post, creator));
        }

        Ok(PostPage {
            posts: views,
            total_posts,
        })
    }

    pub async fn get_post(
        &self,
        identity: Option<&AuthUser>,
        id: &str,
    ) -> Result<PostView, CustomError> {
        require_auth(identity)?;

        let post = self.find(id).await?;
        let creator = self.creator_view(&post.creator).await?;
        Ok(PostView::new(&post, creator))
    }

    pub async fn update_post(
        &self,
        identity: Option<&AuthUser>,
        id: &str,
        input: UpdatePostInput,
    ) -> Result<PostView, CustomError> {
        let identity = require_auth(identity)?;

        let mut post = self.find(id).await?;
        ensure_owner(&post, identity)?;
        validation::validate_post(&input.title, &input.content)?;

        post.title = input.title;
        post.content = input.content;
        if let Some(image_url) = input.image_url {
            post.image_url = image_url;
        }
        post.updated_at = DateTime::now();

        self.posts.replace(&post).await?;

        let creator = self.creator_view(&post.creator).await?;
        Ok(PostView::new(&post, creator))
    }

    pub async fn delete_post(
        &self,
        identity: Option<&AuthUser>,
        id: &str,
    ) -> Result<bool, CustomError> {
        let identity = require_auth(identity)?;

        let post = self.find(id).await?;
        ensure_owner(&post, identity)?;

        if !self.posts.delete(&post.id).await? {
            return Err(post_not_found());
        }
        self.release_image(&post.image_url).await;

        log::info!("User {} deleted post {}", identity.user_id, post.id);
        Ok(true)
    }

    /// True when every post showing the image at `path` belongs to `identity`.
    /// Unreferenced images belong to nobody.
    pub async fn owns_image(&self, identity: &AuthUser, path: &str) -> Result<bool, CustomError> {
        let Some(path) = uploads::public_path(path) else {
            return Ok(false);
        };
        let creators = self.posts.creators_of_image(&path).await?;
        Ok(!creators.is_empty() && creators.iter().all(|c| *c == identity.user_id))
    }

    /// Removes the image file once no remaining post refers to it.
    async fn release_image(&self, image_url: &str) {
        let Some(path) = uploads::public_path(image_url) else {
            return;
        };
        match self.posts.creators_of_image(&path).await {
            Ok(creators) if creators.is_empty() => self.images.delete(&path).await,
            Ok(_) => log::info!("Keeping image {path}, still referenced by other posts"),
            Err(e) => log::warn!("Skipping cleanup of image {path}: {e}"),
        }
    }

    async fn find(&self, id: &str) -> Result<Post, CustomError> {
        let id = parse_post_id(id)?;
        self.posts.find_by_id(&id).await?.ok_or_else(post_not_found)
    }

    async fn creator_view(&self, creator: &ObjectId) -> Result<CreatorView, CustomError> {
        match self.users.find_by_id(creator).await? {
            Some(user) => Ok(CreatorView::from(&user)),
            None => {
                log::warn!("Post creator {creator} no longer exists");
                Ok(CreatorView {
                    id: creator.to_hex(),
                    name: String::new(),
                    email: String::new(),
                    status: String::new(),
                })
            }
        }
    }
}

fn ensure_owner(post: &Post, identity: &AuthUser) -> Result<(), CustomError> {
    if post.creator != identity.user_id {
        return Err(CustomError::ForbiddenError("Not authorized!".to_string()));
    }
    Ok(())
}
