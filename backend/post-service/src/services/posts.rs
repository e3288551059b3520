/// Post service - handles post creation, feed assembly, and deletion
use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::models::{FeedItem, FeedResponse, MediaType, Post};
use crate::storage::MediaStorage;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// An uploaded media payload as received from the HTTP layer
#[derive(Debug)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct PostService {
    pool: PgPool,
    storage: Arc<MediaStorage>,
}

impl PostService {
    pub fn new(pool: PgPool, storage: Arc<MediaStorage>) -> Self {
        Self { pool, storage }
    }

    /// Create a new post
    ///
    /// The payload is staged to a scoped temp file first; the blob store
    /// reads the staged copy, and the file is removed on drop on every exit
    /// path. The post row is only inserted after the blob upload succeeds,
    /// so no record ever points at missing media. A blob orphaned by a
    /// failed insert is tolerated.
    pub async fn create_post(
        &self,
        owner_id: Uuid,
        caption: &str,
        upload: MediaUpload,
    ) -> Result<Post> {
        let staged = tempfile::NamedTempFile::new()
            .map_err(|e| AppError::Internal(format!("Failed to stage upload: {}", e)))?;
        tokio::fs::write(staged.path(), &upload.bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to stage upload: {}", e)))?;

        let stored = self
            .storage
            .upload_media(staged.path(), &upload.file_name, &upload.content_type)
            .await?;

        let media_type = MediaType::from_content_type(&upload.content_type);

        let post = post_repo::insert_post(
            &self.pool,
            owner_id,
            caption,
            &stored.url,
            media_type,
            &stored.stored_name,
        )
        .await?;

        tracing::info!(post_id = %post.id, owner_id = %owner_id, "post created");

        Ok(post)
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = post_repo::find_post_by_id(&self.pool, post_id).await?;
        Ok(post)
    }

    /// Assemble the full feed for one viewer, newest first
    pub async fn list_feed(&self, viewer_id: Uuid) -> Result<FeedResponse> {
        let posts = post_repo::list_posts_newest_first(&self.pool).await?;

        let posts = posts
            .into_iter()
            .map(|post| FeedItem::from_post(post, viewer_id))
            .collect();

        Ok(FeedResponse { posts })
    }

    /// Delete a post owned by the caller
    ///
    /// Absent posts answer NotFound; a caller who is not the owner gets
    /// Forbidden and the post is left untouched.
    pub async fn delete_post(&self, post_id: Uuid, caller_id: Uuid) -> Result<()> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if post.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the owner can delete a post".to_string(),
            ));
        }

        let deleted = post_repo::delete_post(&self.pool, post_id).await?;
        if !deleted {
            // Lost the race against a concurrent delete of the same id
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        // Reclaim the stored media; the record is already gone, so a failure
        // here only leaks the object and must not fail the request
        if let Err(err) = self.storage.delete_media(&post.stored_name).await {
            tracing::warn!(%post_id, "media cleanup failed: {}", err);
        }

        tracing::info!(%post_id, owner_id = %caller_id, "post deleted");

        Ok(())
    }
}
