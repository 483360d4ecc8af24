use super::controller::{put_post_image, serve_image};
use crate::utils::uploads::PUBLIC_PREFIX;
use actix_web::web;

pub fn upload_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/post-image", web::put().to(put_post_image))
        .route(
            &format!("/{PUBLIC_PREFIX}/{{file_name}}"),
            web::get().to(serve_image),
        );
}
