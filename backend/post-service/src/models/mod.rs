/// Data models for post-service
///
/// Defines the persisted `Post` record, the `MediaType` classification, and
/// the projections returned to API clients.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of an uploaded media file
///
/// Stored as the Postgres enum `media_type`. Derived once at creation from
/// the file's declared content type and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "media_type", rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify from a declared content type: a `video` prefix means video,
    /// anything else is treated as an image.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.trim().to_ascii_lowercase().starts_with("video") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

/// A user-created media post
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub caption: String,
    pub media_url: String,
    pub media_type: MediaType,
    pub stored_name: String,
    pub created_at: DateTime<Utc>,
}

/// A feed entry as seen by one authenticated viewer
#[derive(Debug, Serialize)]
pub struct FeedItem {
    pub id: Uuid,
    pub caption: String,
    pub media_url: String,
    pub media_type: MediaType,
    pub stored_name: String,
    pub created_at: DateTime<Utc>,
    /// Whether the viewer owns this post
    pub is_owner: bool,
}

impl FeedItem {
    pub fn from_post(post: Post, viewer_id: Uuid) -> Self {
        let is_owner = post.owner_id == viewer_id;
        Self {
            id: post.id,
            caption: post.caption,
            media_url: post.media_url,
            media_type: post.media_type,
            stored_name: post.stored_name,
            created_at: post.created_at,
            is_owner,
        }
    }
}

/// Response body for `GET /feed`
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedItem>,
}

/// Acknowledgment for `DELETE /posts/{id}`
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_content_types_classify_as_video() {
        assert_eq!(MediaType::from_content_type("video/mp4"), MediaType::Video);
        assert_eq!(
            MediaType::from_content_type("video/quicktime"),
            MediaType::Video
        );
        assert_eq!(MediaType::from_content_type("VIDEO/MP4"), MediaType::Video);
    }

    #[test]
    fn test_non_video_content_types_classify_as_image() {
        assert_eq!(MediaType::from_content_type("image/png"), MediaType::Image);
        assert_eq!(MediaType::from_content_type("image/jpeg"), MediaType::Image);
        assert_eq!(
            MediaType::from_content_type("application/octet-stream"),
            MediaType::Image
        );
        assert_eq!(MediaType::from_content_type(""), MediaType::Image);
    }

    #[test]
    fn test_media_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(MediaType::Image).unwrap(),
            serde_json::json!("image")
        );
        assert_eq!(
            serde_json::to_value(MediaType::Video).unwrap(),
            serde_json::json!("video")
        );
    }

    #[test]
    fn test_feed_item_ownership_flag() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let post = Post {
            id: Uuid::new_v4(),
            owner_id: owner,
            caption: "hello".to_string(),
            media_url: "https://cdn.example.com/posts/a.jpg".to_string(),
            media_type: MediaType::Image,
            stored_name: "a.jpg".to_string(),
            created_at: Utc::now(),
        };

        assert!(FeedItem::from_post(post.clone(), owner).is_owner);
        assert!(!FeedItem::from_post(post, other).is_owner);
    }
}
