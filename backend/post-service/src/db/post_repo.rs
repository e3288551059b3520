use crate::models::{MediaType, Post};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new post
///
/// `id` and `created_at` are assigned by the database; the returned row
/// carries the authoritative values.
pub async fn insert_post(
    pool: &PgPool,
    owner_id: Uuid,
    caption: &str,
    media_url: &str,
    media_type: MediaType,
    stored_name: &str,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (owner_id, caption, media_url, media_type, stored_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, owner_id, caption, media_url, media_type, stored_name, created_at
        "#,
    )
    .bind(owner_id)
    .bind(caption)
    .bind(media_url)
    .bind(media_type)
    .bind(stored_name)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, owner_id, caption, media_url, media_type, stored_name, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Fetch every post in feed order
///
/// Newest first; equal timestamps fall back to id order so the feed is a
/// stable total order.
pub async fn list_posts_newest_first(pool: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, owner_id, caption, media_url, media_type, stored_name, created_at
        FROM posts
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Hard-delete a post by ID
///
/// Returns whether a row was removed; deleting an already-deleted id is a
/// no-op that reports false.
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
