use super::controller::execute;
use actix_web::web;

pub fn operation_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/graphql", web::post().to(execute));
}
