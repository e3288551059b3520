/// Post handlers - HTTP endpoints for post operations
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::DeleteResponse;
use crate::services::{MediaUpload, PostService};
use crate::storage::MediaStorage;

/// Upload guardrail; anything larger is rejected as invalid input
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024; // 100MB

/// Create a new post
/// POST /api/v1/posts (multipart: file, optional caption)
pub async fn create_post(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<MediaStorage>>,
    user: AuthenticatedUser,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut file_bytes: Vec<u8> = Vec::new();
    let mut caption = String::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        match field.name() {
            Some("file") => {
                file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(|name| name.to_string());
                content_type = field.content_type().map(|mime| mime.to_string());

                while let Some(chunk) = field.next().await {
                    let data = chunk
                        .map_err(|e| AppError::BadRequest(format!("Upload read error: {}", e)))?;
                    if file_bytes.len() + data.len() > MAX_UPLOAD_BYTES {
                        return Err(AppError::BadRequest(format!(
                            "Upload exceeds {} byte limit",
                            MAX_UPLOAD_BYTES
                        )));
                    }
                    file_bytes.extend_from_slice(&data);
                }
            }
            Some("caption") => {
                let mut raw = Vec::new();
                while let Some(chunk) = field.next().await {
                    let data = chunk
                        .map_err(|e| AppError::BadRequest(format!("Caption read error: {}", e)))?;
                    raw.extend_from_slice(&data);
                }
                caption = String::from_utf8_lossy(&raw).to_string();
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let file_name = file_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("A media file is required".to_string()))?;

    if file_bytes.is_empty() {
        return Err(AppError::ValidationError(
            "Uploaded file must not be empty".to_string(),
        ));
    }

    let content_type =
        content_type.unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

    let service = PostService::new((**pool).clone(), storage.get_ref().clone());
    let post = service
        .create_post(
            user.id,
            &caption,
            MediaUpload {
                file_name,
                content_type,
                bytes: file_bytes,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Get a post by ID
/// GET /api/v1/posts/{post_id}
pub async fn get_post(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<MediaStorage>>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post_uuid = Uuid::parse_str(&post_id)
        .map_err(|_| AppError::BadRequest("Invalid post ID".to_string()))?;

    let service = PostService::new((**pool).clone(), storage.get_ref().clone());
    let post = service
        .get_post(post_uuid)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post owned by the caller
/// DELETE /api/v1/posts/{post_id}
pub async fn delete_post(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<MediaStorage>>,
    user: AuthenticatedUser,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post_uuid = Uuid::parse_str(&post_id)
        .map_err(|_| AppError::BadRequest("Invalid post ID".to_string()))?;

    let service = PostService::new((**pool).clone(), storage.get_ref().clone());
    service.delete_post(post_uuid, user.id).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: "Post deleted".to_string(),
    }))
}
