use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::{Logger, from_fn};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use serde_json::json;

mod database;
mod middleware;
mod operations;
mod post;
mod router;
mod uploader;
mod user;
mod utils;


use middleware::cors::{cors_headers, preflight};
use middleware::not_found::not_found;
use post::post_store::MongoPostStore;
use router::index::AppServices;
use user::store::MongoUserStore;
use utils::config::AppConfig;

#[get("/")]
async fn default(config: web::Data<AppConfig>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the posts API",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": config.service_name,
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    let db = database::connect_to_mongo(&config).await.map_err(|e| {
        log::error!("Failed to connect to MongoDB: {e}");
        std::io::Error::other(e)
    })?;

    let services = AppServices::new(
        Arc::new(MongoUserStore::new(&db)),
        Arc::new(MongoPostStore::new(&db)),
        &config,
    );

    let bind = (config.host.clone(), config.port);
    info!("Starting server on http://{}:{}", bind.0, bind.1);

    let app_config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(app_config.clone())
            .configure(|cfg| services.configure(cfg))
            .service(default)
            .default_service(web::route().to(not_found))
            .wrap(from_fn(preflight))
            .wrap(cors_headers())
            .wrap(Logger::default())
    })
    .bind(bind)?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
