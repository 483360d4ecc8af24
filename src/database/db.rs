use mongodb::bson::doc;
use mongodb::error::{Error, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};

use crate::user::model::User;
use crate::utils::config::AppConfig;

const DUPLICATE_KEY: i32 = 11000;

pub async fn connect_to_mongo(config: &AppConfig) -> Result<Database, Error> {
    let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
    client_options.app_name = Some(config.service_name.clone());

    let client = Client::with_options(client_options)?;

    // Ping the server so a bad URI fails at startup
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    log::info!("Connected successfully to MongoDB");

    let db = client.database(&config.database_name);
    ensure_indexes(&db).await?;
    Ok(db)
}

async fn ensure_indexes(db: &Database) -> Result<(), Error> {
    let unique_email = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();

    db.collection::<User>("users")
        .create_index(unique_email)
        .await?;

    Ok(())
}

pub fn is_duplicate_key(err: &Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}
