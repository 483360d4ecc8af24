use std::sync::Arc;

use actix_web::web;

use crate::middleware::auth::TokenService;
use crate::middleware::error_handler::json_error_handler;
use crate::operations::index::operation_routes;
use crate::post::post_service::PostService;
use crate::post::post_store::PostStore;
use crate::uploader::index::upload_routes;
use crate::user::service::UserService;
use crate::user::store::UserStore;
use crate::utils::config::AppConfig;
use crate::utils::uploads::ImageStore;

/// Shared handler state, cloned into every worker.
#[derive(Clone)]
pub struct AppServices {
    user_service: web::Data<UserService>,
    post_service: web::Data<PostService>,
    tokens: web::Data<TokenService>,
    images: web::Data<ImageStore>,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserStore>, posts: Arc<dyn PostStore>, config: &AppConfig) -> Self {
        let tokens = Arc::new(TokenService::new(
            &config.jwt_secret,
            config.jwt_expiration_minutes,
        ));
        let images = Arc::new(ImageStore::new(
            config.image_dir.clone(),
            config.max_image_bytes,
        ));

        let user_service = UserService::new(
            Arc::clone(&users),
            Arc::clone(&posts),
            Arc::clone(&tokens),
            config.bcrypt_cost,
        );
        let post_service = PostService::new(posts, users, Arc::clone(&images));

        Self {
            user_service: web::Data::new(user_service),
            post_service: web::Data::new(post_service),
            tokens: web::Data::from(tokens),
            images: web::Data::from(images),
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.user_service.clone())
            .app_data(self.post_service.clone())
            .app_data(self.tokens.clone())
            .app_data(self.images.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler));

        routes(cfg);
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(operation_routes);
    cfg.configure(upload_routes);
}
