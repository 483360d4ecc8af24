use actix_web::{HttpResponse, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde::Serialize;
use serde_json::{Value, json};

use crate::middleware::auth::{AuthUser, TokenService};
use crate::operations::model::{Operation, OperationRequest};
use crate::post::post_service::PostService;
use crate::user::service::UserService;
use crate::utils::error::CustomError;

/// POST /graphql
pub async fn execute(
    user_service: web::Data<UserService>,
    post_service: web::Data<PostService>,
    tokens: web::Data<TokenService>,
    credentials: Option<BearerAuth>,
    body: web::Json<OperationRequest>,
) -> Result<HttpResponse, CustomError> {
    let identity = tokens.identify(credentials.as_ref());
    let operation = Operation::try_from(body.into_inner())?;
    let name = operation.name();

    log::debug!(
        "Running {name} for {}",
        identity
            .as_ref()
            .map_or_else(|| "anonymous".to_string(), |who| who.user_id.to_hex())
    );

    let result = dispatch(&user_service, &post_service, identity.as_ref(), operation).await?;

    Ok(HttpResponse::Ok().json(json!({ "data": { name: result } })))
}

async fn dispatch(
    users: &UserService,
    posts: &PostService,
    identity: Option<&AuthUser>,
    operation: Operation,
) -> Result<Value, CustomError> {
    match operation {
        Operation::CreateUser { user_input } => to_json(users.create_user(user_input).await?),
        Operation::Login { email, password } => to_json(users.login(&email, &password).await?),
        Operation::CreatePost { post_input } => {
            to_json(posts.create_post(identity, post_input).await?)
        }
        Operation::Posts { page } => to_json(posts.list_posts(identity, page).await?),
        Operation::Post { id } => to_json(posts.get_post(identity, &id).await?),
        Operation::UpdatePost { id, post_input } => {
            to_json(posts.update_post(identity, &id, post_input).await?)
        }
        Operation::DeletePost { id } => to_json(posts.delete_post(identity, &id).await?),
        Operation::User {} => to_json(users.current_user(identity).await?),
        Operation::UpdateStatus { status } => {
            to_json(users.update_status(identity, &status).await?)
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, CustomError> {
    serde_json::to_value(value)
        .map_err(|e| CustomError::InternalServerError(format!("Failed to encode result: {e}")))
}
