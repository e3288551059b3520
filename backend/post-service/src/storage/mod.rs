/// Blob store client for uploaded media
///
/// Wraps an S3-compatible bucket behind the small contract the service
/// needs: upload a staged file and get back a public URL plus the stored
/// name, delete an object, and verify connectivity at startup. Object keys
/// live under a fixed `posts/` prefix and carry a provenance metadata tag.
use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use uuid::Uuid;

/// Key prefix classifying every object created by this service
const MEDIA_KEY_PREFIX: &str = "posts";

/// Result of a successful media upload
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Absolute URL the media is served from
    pub url: String,
    /// Name assigned by the store (differs from the uploaded filename)
    pub stored_name: String,
}

/// S3-backed media storage
#[derive(Clone)]
pub struct MediaStorage {
    client: Client,
    bucket: String,
    region: String,
    public_base_url: Option<String>,
}

impl MediaStorage {
    /// Build the S3 client from configuration
    ///
    /// Static credentials and a custom endpoint are optional; without them
    /// the default AWS credential chain and endpoint are used.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        use aws_sdk_s3::config::Region;

        let mut aws_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            use aws_sdk_s3::config::Credentials;

            let credentials = Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "post_service_media",
            );

            aws_config_builder = aws_config_builder.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        let aws_config = aws_config_builder.load().await;

        Ok(Self {
            client: Client::new(&aws_config),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            public_base_url: config.public_base_url.clone(),
        })
    }

    /// Upload a staged media file
    ///
    /// The staged file must remain on disk for the duration of the call.
    /// The original filename is only a hint: the stored name gets a random
    /// suffix so repeated uploads of the same filename never collide.
    pub async fn upload_media(
        &self,
        staged_path: &Path,
        file_name: &str,
        content_type: &str,
    ) -> Result<StoredMedia> {
        let stored_name = unique_stored_name(file_name);
        let key = media_key(&stored_name);

        let body = ByteStream::from_path(staged_path).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to read staged file {}: {}",
                staged_path.display(),
                e
            ))
        })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type(content_type)
            .metadata("category", MEDIA_KEY_PREFIX)
            .metadata("original_name", file_name)
            .send()
            .await
            .map_err(|e| {
                let error_msg = e.to_string();
                if error_msg.contains("403") || error_msg.contains("Forbidden") {
                    AppError::StorageError(
                        "Blob store auth failed (403): check storage credentials".to_string(),
                    )
                } else if error_msg.contains("NoSuchBucket") {
                    AppError::StorageError(format!("Bucket not found: {}", self.bucket))
                } else {
                    AppError::StorageError(format!("Media upload failed: {}", e))
                }
            })?;

        Ok(StoredMedia {
            url: self.media_url(&key),
            stored_name,
        })
    }

    /// Delete a stored media object
    pub async fn delete_media(&self, stored_name: &str) -> Result<()> {
        let key = media_key(stored_name);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| AppError::StorageError(format!("Media delete failed: {}", e)))?;

        Ok(())
    }

    /// Health check for blob store connectivity and bucket access
    ///
    /// Media persistence depends entirely on the bucket; the service should
    /// not start if this fails.
    pub async fn health_check(&self) -> Result<()> {
        match self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(1)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!(
                    "Blob store connection validated (bucket: {}, region: {})",
                    self.bucket,
                    self.region
                );
                Ok(())
            }
            Err(e) => Err(AppError::StorageError(format!(
                "Blob store health check failed for bucket {}: {}",
                self.bucket, e
            ))),
        }
    }

    /// Public URL for an object key
    fn media_url(&self, key: &str) -> String {
        public_media_url(
            self.public_base_url.as_deref(),
            &self.bucket,
            &self.region,
            key,
        )
    }
}

fn public_media_url(
    public_base_url: Option<&str>,
    bucket: &str,
    region: &str,
    key: &str,
) -> String {
    match public_base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

fn media_key(stored_name: &str) -> String {
    format!("{}/{}", MEDIA_KEY_PREFIX, stored_name)
}

/// Derive a collision-free stored name from an uploaded filename
///
/// Keeps the (sanitized) stem and extension for operator readability and
/// inserts a random suffix for uniqueness.
fn unique_stored_name(file_name: &str) -> String {
    // Only the final path component of the hint is trusted
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or("").trim();

    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };

    fn sanitize(part: &str) -> String {
        part.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    let safe_stem = sanitize(stem);
    let safe_stem = if safe_stem.trim_matches('_').is_empty() {
        "upload".to_string()
    } else {
        safe_stem
    };

    let suffix = Uuid::new_v4().simple().to_string();
    match ext
        .map(|e| sanitize(&e.to_ascii_lowercase()))
        .filter(|e| !e.trim_matches('_').is_empty())
    {
        Some(ext) => format!("{}-{}.{}", safe_stem, suffix, ext),
        None => format!("{}-{}", safe_stem, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_names_are_unique_for_same_hint() {
        let a = unique_stored_name("beach.jpg");
        let b = unique_stored_name("beach.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_stored_name_keeps_extension() {
        let name = unique_stored_name("holiday clip.MP4");
        assert!(name.ends_with(".mp4"));
        assert!(name.starts_with("holiday_clip-"));
    }

    #[test]
    fn test_stored_name_sanitizes_path_characters() {
        let name = unique_stored_name("../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_stored_name_handles_missing_extension() {
        let name = unique_stored_name("rawfile");
        assert!(name.starts_with("rawfile-"));
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_stored_name_handles_empty_hint() {
        let name = unique_stored_name("");
        assert!(name.starts_with("upload-"));
    }

    #[test]
    fn test_media_key_is_prefixed() {
        assert_eq!(media_key("a.jpg"), "posts/a.jpg");
    }

    #[test]
    fn test_media_url_prefers_public_base() {
        assert_eq!(
            public_media_url(
                Some("https://cdn.example.com/"),
                "prism-media",
                "us-east-1",
                "posts/a.jpg"
            ),
            "https://cdn.example.com/posts/a.jpg"
        );
    }

    #[test]
    fn test_media_url_falls_back_to_bucket_url() {
        assert_eq!(
            public_media_url(None, "prism-media", "us-east-1", "posts/a.jpg"),
            "https://prism-media.s3.us-east-1.amazonaws.com/posts/a.jpg"
        );
    }
}
