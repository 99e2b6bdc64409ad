//! Blob storage for generated image assets.

pub mod storage;

pub use storage::{BlobStore, S3BlobStore, StorageError};
