/// HTTP handlers for post-service endpoints
///
/// This module contains handlers for:
/// - Posts: Create, read, delete posts with uploaded media
/// - Feed: The full reverse-chronological feed for the caller
pub mod feed;
pub mod posts;

// Re-export handler functions at module level
pub use feed::get_feed;
pub use posts::{create_post, delete_post, get_post};
