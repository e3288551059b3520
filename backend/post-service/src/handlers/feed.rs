/// Feed handler - the full reverse-chronological feed for the caller
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::services::PostService;
use crate::storage::MediaStorage;

/// Get the feed
/// GET /api/v1/feed
///
/// Returns every post, newest first, each annotated with whether the
/// caller owns it. The full set is returned on every call.
pub async fn get_feed(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<MediaStorage>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    debug!(user_id = %user.id, "feed request");

    let service = PostService::new((**pool).clone(), storage.get_ref().clone());
    let feed = service.list_feed(user.id).await?;

    Ok(HttpResponse::Ok().json(feed))
}
