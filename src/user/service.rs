use std::sync::Arc;

use crate::middleware::auth::{AuthUser, TokenService, require_auth};
use crate::post::post_store::PostStore;
use crate::user::model::{AuthData, User, UserInput, UserView};
use crate::user::store::UserStore;
use crate::utils::error::CustomError;
use crate::utils::{hashing, validation};

pub struct UserService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        tokens: Arc<TokenService>,
        bcrypt_cost: u32,
    ) -> Self {
        UserService {
            users,
            posts,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn create_user(&self, input: UserInput) -> Result<UserView, CustomError> {
        validation::validate_signup(&input.email, &input.password)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(CustomError::ConflictError("User already exists!".to_string()));
        }

        let hashed_password = hashing::hash_password(&input.password, self.bcrypt_cost)?;
        let user = self
            .users
            .insert(User::new(input.name, input.email, hashed_password))
            .await?;

        log::info!("Created user {}", user.id);
        Ok(UserView::new(&user, &[]))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthData, CustomError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| CustomError::UnauthenticatedError("Could not find user".to_string()))?;

        if !hashing::verify_password(password, &user.password) {
            return Err(CustomError::UnauthenticatedError(
                "Password not valid".to_string(),
            ));
        }

        let token = self.tokens.issue_token(&user.id, &user.email)?;

        Ok(AuthData {
            token,
            user_id: user.id.to_hex(),
        })
    }

    pub async fn current_user(&self, identity: Option<&AuthUser>) -> Result<UserView, CustomError> {
        let identity = require_auth(identity)?;

        let user = self
            .users
            .find_by_id(&identity.user_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("No user found!".to_string()))?;

        self.view(&user).await
    }

    pub async fn update_status(
        &self,
        identity: Option<&AuthUser>,
        status: &str,
    ) -> Result<UserView, CustomError> {
        let identity = require_auth(identity)?;

        let user = self
            .users
            .update_status(&identity.user_id, status)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("No user found!".to_string()))?;

        self.view(&user).await
    }

    async fn view(&self, user: &User) -> Result<UserView, CustomError> {
        let posts = self.posts.ids_by_creator(&user.id).await?;
        Ok(UserView::new(user, &posts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::{MemoryPostStore, MemoryUserStore};
    use crate::post::post_model::Post;

    struct Fixture {
        service: UserService,
        users: Arc<MemoryUserStore>,
        posts: Arc<MemoryPostStore>,
        tokens: Arc<TokenService>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MemoryUserStore::default());
        let posts = Arc::new(MemoryPostStore::default());
        let tokens = Arc::new(TokenService::new("test-secret", 60));
        let service = UserService::new(users.clone(), posts.clone(), tokens.clone(), 4);
        Fixture {
            service,
            users,
            posts,
            tokens,
        }
    }

    fn input(email: &str, password: &str) -> UserInput {
        UserInput {
            email: email.to_string(),
            name: "Ada".to_string(),
            password: password.to_string(),
        }
    }

    #[actix_web::test]
    async fn signup_stores_a_verifiable_hash() {
        let fx = fixture();
        let view = fx.service.create_user(input("ada@example.com", "secret")).await.unwrap();

        let stored = fx.users.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(view.id, stored.id.to_hex());
        assert_eq!(view.status, "I am new!");
        assert!(view.posts.is_empty());
        assert_ne!(stored.password, "secret");
        assert!(hashing::verify_password("secret", &stored.password));
    }

    #[actix_web::test]
    async fn signup_rejects_invalid_input_before_writing() {
        let fx = fixture();
        let err = fx.service.create_user(input("bad", "abc")).await.unwrap_err();

        match err {
            CustomError::ValidationError { errors, .. } => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(fx.users.find_by_email("bad").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn signup_rejects_duplicate_email() {
        let fx = fixture();
        fx.service.create_user(input("ada@example.com", "secret")).await.unwrap();

        let err = fx.service.create_user(input("ada@example.com", "other1")).await.unwrap_err();
        assert!(matches!(err, CustomError::ConflictError(_)));
    }

    #[actix_web::test]
    async fn login_issues_token_for_the_user() {
        let fx = fixture();
        let view = fx.service.create_user(input("ada@example.com", "secret")).await.unwrap();

        let auth = fx.service.login("ada@example.com", "secret").await.unwrap();
        assert_eq!(auth.user_id, view.id);

        let identity = fx.tokens.authenticate(&auth.token).unwrap();
        assert_eq!(identity.user_id.to_hex(), view.id);
        assert_eq!(identity.email, "ada@example.com");
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthenticated() {
        let fx = fixture();
        fx.service.create_user(input("ada@example.com", "secret")).await.unwrap();

        let err = fx.service.login("ada@example.com", "wrong!").await.unwrap_err();
        assert!(matches!(err, CustomError::UnauthenticatedError(_)));
    }

    #[actix_web::test]
    async fn login_for_unknown_email_is_unauthenticated() {
        let fx = fixture();
        let err = fx.service.login("nobody@example.com", "secret").await.unwrap_err();
        assert!(matches!(err, CustomError::UnauthenticatedError(_)));
    }

    #[actix_web::test]
    async fn current_user_lists_owned_posts() {
        let fx = fixture();
        let view = fx.service.create_user(input("ada@example.com", "secret")).await.unwrap();
        let identity = AuthUser {
            user_id: mongodb::bson::oid::ObjectId::parse_str(&view.id).unwrap(),
            email: view.email.clone(),
        };

        let post = Post::new("Title".into(), "Content".into(), String::new(), identity.user_id);
        let post_id = post.id.to_hex();
        fx.posts.insert(post).await.unwrap();

        let me = fx.service.current_user(Some(&identity)).await.unwrap();
        assert_eq!(me.posts, vec![post_id]);
    }

    #[actix_web::test]
    async fn update_status_requires_identity() {
        let fx = fixture();
        let err = fx.service.update_status(None, "busy").await.unwrap_err();
        assert!(matches!(err, CustomError::UnauthenticatedError(_)));
    }

    #[actix_web::test]
    async fn update_status_persists() {
        let fx = fixture();
        let view = fx.service.create_user(input("ada@example.com", "secret")).await.unwrap();
        let identity = AuthUser {
            user_id: mongodb::bson::oid::ObjectId::parse_str(&view.id).unwrap(),
            email: view.email,
        };

        let updated = fx.service.update_status(Some(&identity), "Writing").await.unwrap();
        assert_eq!(updated.status, "Writing");

        let stored = fx.users.find_by_id(&identity.user_id).await.unwrap().unwrap();
        assert_eq!(stored.status, "Writing");
    }

    #[actix_web::test]
    async fn current_user_for_deleted_account_is_not_found() {
        let fx = fixture();
        let identity = AuthUser {
            user_id: mongodb::bson::oid::ObjectId::new(),
            email: "ghost@example.com".into(),
        };
        let err = fx.service.current_user(Some(&identity)).await.unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }
}
