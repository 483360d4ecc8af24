use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use futures_util::StreamExt;
use serde_json::json;

use crate::middleware::auth::{TokenService, require_auth};
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::uploads::{FileUpload, ImageStore};

const IMAGE_FIELD: &str = "image";
const OLD_PATH_FIELD: &str = "oldPath";

/// The parts of an image upload form this service reads.
#[derive(Debug, Default)]
struct ImageForm {
    image: Option<FileUpload>,
    old_path: Option<String>,
}

async fn extract_image_form(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<ImageForm, CustomError> {
    let mut form = ImageForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| CustomError::BadRequestError(format!("Error reading multipart field: {e}")))?;

        let Some(content_disposition) = field.content_disposition() else {
            continue;
        };
        let field_name = content_disposition.get_name().unwrap_or("").to_string();
        let file_name = content_disposition.get_filename().map(str::to_string);
        let content_type = field.content_type().map(|ct| ct.essence_str().to_string());

        // Read one byte past the limit so oversize files are still detected
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| CustomError::BadRequestError(format!("Error reading file chunk: {e}")))?;
            if data.len() <= max_bytes {
                let room = max_bytes + 1 - data.len();
                data.extend_from_slice(&chunk[..chunk.len().min(room)]);
            }
        }

        match field_name.as_str() {
            IMAGE_FIELD if form.image.is_none() && !data.is_empty() => {
                let name = file_name.unwrap_or_else(|| "upload".to_string());
                form.image = Some(FileUpload::new(name, data, content_type));
            }
            OLD_PATH_FIELD => {
                let old_path = String::from_utf8_lossy(&data).trim().to_string();
                if !old_path.is_empty() {
                    form.old_path = Some(old_path);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// PUT /post-image
pub async fn put_post_image(
    images: web::Data<ImageStore>,
    posts: web::Data<PostService>,
    tokens: web::Data<TokenService>,
    credentials: Option<BearerAuth>,
    payload: Multipart,
) -> Result<HttpResponse, CustomError> {
    let identity = tokens.identify(credentials.as_ref());
    let identity = require_auth(identity.as_ref())?;

    let form = extract_image_form(payload, images.max_bytes()).await?;

    // Only images shown solely by the caller's own posts may be replaced
    let old_path = match form.old_path {
        Some(path) if posts.owns_image(identity, &path).await? => Some(path),
        Some(path) => {
            log::warn!("User {} may not replace image {path:?}", identity.user_id);
            None
        }
        None => None,
    };

    let stored = match form.image {
        Some(upload) => images.replace(old_path.as_deref(), upload).await?,
        None => None,
    };

    match stored {
        Some(file_path) => {
            log::info!("User {} uploaded {file_path}", identity.user_id);
            Ok(HttpResponse::Created().json(json!({
                "message": "File stored.",
                "filePath": file_path,
            })))
        }
        None => Ok(HttpResponse::Ok().json(json!({ "message": "No file provided!" }))),
    }
}

/// GET /images/{file_name}
pub async fn serve_image(
    images: web::Data<ImageStore>,
    file_name: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let file_name = file_name.into_inner();
    let not_found = || CustomError::NotFoundError("Image not found".to_string());

    let path = images.resolve(&file_name).ok_or_else(not_found)?;
    let bytes = tokio::fs::read(&path).await.map_err(|_| not_found())?;

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&file_name))
        .body(bytes))
}

fn content_type_for(file_name: &str) -> ContentType {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => ContentType::png(),
        "jpg" | "jpeg" => ContentType::jpeg(),
        _ => ContentType::octet_stream(),
    }
}
