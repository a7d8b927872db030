use super::artifact_repository::{ArtifactRepository, StorageLocation};
use crate::domain::shared::PipelineError;
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client as S3Client};
use std::sync::Arc;

/// S3 (or S3-compatible) implementation of the artifact repository
pub struct S3ArtifactRepository {
    s3_client: Arc<S3Client>,
    bucket: Option<String>,
    public_host: String,
}

impl S3ArtifactRepository {
    pub fn new(s3_client: Arc<S3Client>, bucket: Option<String>, public_host: String) -> Self {
        Self {
            s3_client,
            bucket,
            public_host,
        }
    }
}

#[async_trait]
impl ArtifactRepository for S3ArtifactRepository {
    fn location(&self) -> Result<StorageLocation, PipelineError> {
        let bucket = self
            .bucket
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| PipelineError::Configuration("no storage bucket configured".to_string()))?;

        Ok(StorageLocation {
            public_host: self.public_host.clone(),
            bucket: bucket.to_string(),
        })
    }

    async fn upload_public(
        &self,
        object_path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError> {
        let location = self.location()?;
        let size = bytes.len();

        tracing::info!(
            bucket = %location.bucket,
            object_path = object_path,
            size_bytes = size,
            "Uploading object to storage"
        );

        self.s3_client
            .put_object()
            .bucket(&location.bucket)
            .key(object_path)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    bucket = %location.bucket,
                    object_path = object_path,
                    "S3 put_object failed"
                );
                PipelineError::Storage(format!("failed to upload {}: {}", object_path, e))
            })?;

        tracing::debug!(object_path = object_path, size_bytes = size, "Object uploaded and published");

        Ok(())
    }
}
