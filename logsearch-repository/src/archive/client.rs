//! S3-compatible archive store implementation.
//!
//! Works against MinIO or any S3-compatible endpoint. Objects are written
//! with plain puts; rewriting an existing name replaces it, which is what
//! gives the daily archive objects their overwrite semantics.

use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use tracing::{debug, info};

use crate::errors::ArchiveError;
use crate::interfaces::ArchiveStore;

/// Region reported to S3-compatible stores that ignore it (MinIO does).
const DEFAULT_REGION: &str = "us-east-1";

/// Archive store backed by an S3-compatible object store.
pub struct S3ArchiveStore {
    store: AmazonS3,
    bucket: String,
}

impl S3ArchiveStore {
    /// Create a new archive store client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full endpoint URL (e.g. "http://minio:9000"); plain
    ///   HTTP is allowed for non-`https` endpoints
    /// * `bucket` - Bucket all archive objects are written into
    /// * `access_key` / `secret_key` - Store credentials
    pub fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
    ) -> Result<Self, ArchiveError> {
        let store = AmazonS3Builder::new()
            .with_endpoint(endpoint)
            .with_bucket_name(bucket)
            .with_access_key_id(access_key)
            .with_secret_access_key(secret_key)
            .with_region(DEFAULT_REGION)
            .with_allow_http(!endpoint.starts_with("https"))
            .with_virtual_hosted_style_request(false)
            .build()?;

        info!(endpoint = %endpoint, bucket = %bucket, "Created archive store client");

        Ok(Self {
            store,
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl ArchiveStore for S3ArchiveStore {
    async fn put_object(&self, name: &str, payload: Vec<u8>) -> Result<(), ArchiveError> {
        let size = payload.len();
        self.store
            .put(&Path::from(name), PutPayload::from(payload))
            .await?;

        debug!(bucket = %self.bucket, object = %name, bytes = size, "Archived object");
        Ok(())
    }
}
