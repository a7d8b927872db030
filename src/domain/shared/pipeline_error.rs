use crate::error::AppError;

/// Closed set of failures raised by the report and narration pipelines.
///
/// Every repository converts its provider-specific error into one of these
/// kinds at the call boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("upstream error from {provider} (status {}): {body}", status.map(|s| s.to_string()).unwrap_or_else(|| "n/a".to_string()))]
    Upstream {
        provider: &'static str,
        status: Option<u16>,
        body: String,
    },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("report not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn upstream(provider: &'static str, status: Option<u16>, body: impl Into<String>) -> Self {
        PipelineError::Upstream {
            provider,
            status,
            body: body.into(),
        }
    }
}

/// Repository failures. Database errors become `Other` so their text is
/// never echoed to the client.
impl From<AppError> for PipelineError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => PipelineError::Validation(msg),
            AppError::NotFound(_) => PipelineError::NotFound,
            AppError::Configuration(msg) => PipelineError::Configuration(msg),
            AppError::Storage(msg) => PipelineError::Storage(msg),
            AppError::Database(e) => PipelineError::Other(anyhow::Error::new(e)),
            other => PipelineError::Other(anyhow::anyhow!(other.to_string())),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Configuration(msg) => AppError::Configuration(msg),
            PipelineError::Validation(msg) => AppError::BadRequest(msg),
            e @ PipelineError::Upstream { .. } => AppError::ExternalService(e.to_string()),
            e @ PipelineError::Parse(_) => AppError::ExternalService(e.to_string()),
            PipelineError::Storage(msg) => AppError::Storage(msg),
            PipelineError::NotFound => AppError::NotFound("Report not found".to_string()),
            PipelineError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
