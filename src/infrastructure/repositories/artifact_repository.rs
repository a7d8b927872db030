use crate::domain::shared::PipelineError;
use async_trait::async_trait;

/// Where publicly readable objects can be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub public_host: String,
    pub bucket: String,
}

impl StorageLocation {
    /// Canonical public URL of an object: `https://<host>/<bucket>/<path>`.
    ///
    /// Built from the location alone, never from a URL handed back by the
    /// storage provider, so it does not expire like a signed link would.
    pub fn public_url(&self, object_path: &str) -> String {
        let encoded_path = object_path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "https://{}/{}/{}",
            self.public_host.trim_end_matches('/'),
            self.bucket,
            encoded_path
        )
    }
}

/// Durable binary object storage with public retrieval
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Resolve the configured bucket and public host.
    /// Fails with `PipelineError::Configuration` when no bucket is configured.
    fn location(&self) -> Result<StorageLocation, PipelineError>;

    /// Store `bytes` at `object_path` and make the object publicly readable
    async fn upload_public(
        &self,
        object_path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError>;
}
