//! S3-backed blob store for generated images.
//!
//! Uploaded objects are keyed
//! `generated_images/{scope}/{YYYYMMDD}/{uuid}.{ext}` and addressed by
//! their public virtual-hosted URL.  The extension and content type are
//! sniffed from the image header rather than assumed.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

/// Key prefix for all generated image objects.
const KEY_PREFIX: &str = "generated_images";

/// Errors from the blob storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 upload failed: {0}")]
    Upload(String),

    #[error("storage not configured: {0}")]
    Config(&'static str),
}

/// Blob upload capability.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload one object, returning its retrievable URI.
    ///
    /// `scope` groups related objects under one key prefix (the pipeline
    /// passes a per-component scope).
    async fn upload(&self, scope: &str, bytes: Vec<u8>) -> Result<String, StorageError>;
}

/// S3 implementation of [`BlobStore`].
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3BlobStore {
    /// Build a store from the default AWS credential chain.
    ///
    /// Reads `AWS_S3_BUCKET` (required) and the region from the resolved
    /// AWS configuration (default `us-east-1`).
    pub async fn from_env() -> Result<Self, StorageError> {
        let bucket =
            std::env::var("AWS_S3_BUCKET").map_err(|_| StorageError::Config("AWS_S3_BUCKET"))?;

        let config = aws_config::load_from_env().await;
        let region = config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "us-east-1".to_string());

        Ok(Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket,
            region,
        })
    }

    /// Sniff the encoded image format, defaulting to PNG for unknown
    /// payloads.
    fn detect_format(bytes: &[u8]) -> (&'static str, &'static str) {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => ("jpeg", "image/jpeg"),
            Ok(image::ImageFormat::WebP) => ("webp", "image/webp"),
            _ => ("png", "image/png"),
        }
    }

    /// Build an object key for one upload.
    fn object_key(scope: &str, extension: &str) -> String {
        let date = chrono::Utc::now().format("%Y%m%d");
        let id = uuid::Uuid::new_v4();
        format!("{KEY_PREFIX}/{scope}/{date}/{id}.{extension}")
    }

    /// Public virtual-hosted URL for an object key.
    fn object_url(&self, key: &str) -> String {
        format!("https://{}.s3.{}.amazonaws.com/{key}", self.bucket, self.region)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(&self, scope: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let (extension, content_type) = Self::detect_format(&bytes);
        let key = Self::object_key(scope, extension);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        let url = self.object_url(&key);
        tracing::debug!(key = %key, "Uploaded generated image");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_header_detected() {
        let png = [0x89u8, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(S3BlobStore::detect_format(&png), ("png", "image/png"));
    }

    #[test]
    fn jpeg_header_detected() {
        let jpeg = [0xFFu8, 0xD8, 0xFF, 0xE0, 0, 0];
        assert_eq!(S3BlobStore::detect_format(&jpeg), ("jpeg", "image/jpeg"));
    }

    #[test]
    fn unknown_payload_defaults_to_png() {
        assert_eq!(S3BlobStore::detect_format(b"garbage"), ("png", "image/png"));
    }

    #[test]
    fn object_keys_carry_scope_and_extension() {
        let key = S3BlobStore::object_key("component-42", "png");
        assert!(key.starts_with("generated_images/component-42/"));
        assert!(key.ends_with(".png"));
    }
}
