use std::env;
use std::path::PathBuf;

const DEFAULT_JWT_SECRET: &str = "somesupersecret";

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub bcrypt_cost: u32,
    pub image_dir: PathBuf,
    pub max_image_bytes: usize,
    pub service_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET is not set, falling back to the built-in development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: parse_var("PORT", 8080),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "messages".to_string()),
            jwt_secret,
            jwt_expiration_minutes: parse_var("JWT_EXPIRATION_MINUTES", 60),
            bcrypt_cost: parse_var("BCRYPT_COST", 12),
            image_dir: env::var("IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("images")),
            max_image_bytes: parse_var("MAX_IMAGE_BYTES", 10 * 1024 * 1024),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "posts-api".to_string()),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparseable {key}={raw:?}");
            default
        }),
        Err(_) => default,
    }
}
