//! In-memory doubles for the repository traits, shared by the domain unit tests.

use crate::domain::narration::{NarrationHooks, NarrationInput};
use crate::domain::report::{NarrationPatch, NewReport, Report};
use crate::domain::shared::PipelineError;
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{
    ArtifactRepository, ChatRepository, ChatRequest, ReportRepository, SpeechRequest,
    StorageLocation, TtsRepository,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

enum Reply {
    Text(String),
    Unconfigured,
    Failing(Option<u16>, String),
}

pub struct FakeChatRepository {
    reply: Reply,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeChatRepository {
    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn unconfigured() -> Self {
        Self::with(Reply::Unconfigured)
    }

    pub fn failing(status: Option<u16>, body: &str) -> Self {
        Self::with(Reply::Failing(status, body.to_string()))
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests that reached the model (unconfigured calls are not counted)
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatRepository for FakeChatRepository {
    async fn complete(&self, request: &ChatRequest) -> Result<String, PipelineError> {
        match &self.reply {
            Reply::Unconfigured => Err(PipelineError::Configuration(
                "model API key is not configured".to_string(),
            )),
            Reply::Failing(status, body) => {
                self.requests.lock().push(request.clone());
                Err(PipelineError::upstream("openai", *status, body.clone()))
            }
            Reply::Text(text) => {
                self.requests.lock().push(request.clone());
                Ok(text.clone())
            }
        }
    }
}

pub struct FakeTtsRepository {
    audio: Option<Vec<u8>>,
    failure: Option<(u16, String)>,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl FakeTtsRepository {
    pub fn returning(audio: Vec<u8>) -> Self {
        Self {
            audio: Some(audio),
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            audio: None,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            audio: None,
            failure: Some((status, body.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TtsRepository for FakeTtsRepository {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, PipelineError> {
        if let Some((status, body)) = &self.failure {
            self.requests.lock().push(request.clone());
            return Err(PipelineError::upstream("elevenlabs", Some(*status), body.clone()));
        }

        let audio = self.audio.clone().ok_or_else(|| {
            PipelineError::Configuration("ELEVENLABS_API_KEY is not configured".to_string())
        })?;
        self.requests.lock().push(request.clone());
        Ok(audio)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub object_path: String,
    pub content_type: String,
    pub size_bytes: usize,
}

pub struct FakeArtifactRepository {
    location: Option<StorageLocation>,
    fail_uploads: bool,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl FakeArtifactRepository {
    pub fn new(public_host: &str, bucket: &str) -> Self {
        Self {
            location: Some(StorageLocation {
                public_host: public_host.to_string(),
                bucket: bucket.to_string(),
            }),
            fail_uploads: false,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn without_bucket() -> Self {
        Self {
            location: None,
            fail_uploads: false,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_uploads(public_host: &str, bucket: &str) -> Self {
        Self {
            fail_uploads: true,
            ..Self::new(public_host, bucket)
        }
    }

    /// Successful uploads only
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl ArtifactRepository for FakeArtifactRepository {
    fn location(&self) -> Result<StorageLocation, PipelineError> {
        self.location.clone().ok_or_else(|| {
            PipelineError::Configuration("STORAGE_BUCKET is not configured".to_string())
        })
    }

    async fn upload_public(
        &self,
        object_path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError> {
        if self.fail_uploads {
            return Err(PipelineError::Storage("bucket unreachable".to_string()));
        }
        self.uploads.lock().push(RecordedUpload {
            object_path: object_path.to_string(),
            content_type: content_type.to_string(),
            size_bytes: bytes.len(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: Mutex<HashMap<Uuid, Report>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn get(&self, report_id: Uuid) -> Option<Report> {
        self.reports.lock().get(&report_id).cloned()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn create(&self, user_id: &str, report: &NewReport) -> AppResult<Report> {
        let now = chrono::Utc::now();
        let created = Report {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            parcelle_id: report.parcelle_id.clone(),
            parcelle_name: report.parcelle_name.clone(),
            status: report.status,
            summary: report.summary.clone(),
            recommendations: report.recommendations.clone(),
            weather: report.weather.clone(),
            audio_url: report.audio_url.clone(),
            darija_script: report.darija_script.clone(),
            created_at: now,
            updated_at: now,
        };
        self.reports.lock().insert(created.id, created.clone());
        Ok(created)
    }

    async fn find(&self, user_id: &str, report_id: Uuid) -> AppResult<Option<Report>> {
        Ok(self
            .reports
            .lock()
            .get(&report_id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .lock()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports.truncate(limit as usize);
        Ok(reports)
    }

    async fn patch_narration(
        &self,
        user_id: &str,
        report_id: Uuid,
        patch: &NarrationPatch,
    ) -> AppResult<()> {
        let mut reports = self.reports.lock();
        let report = reports
            .get_mut(&report_id)
            .filter(|r| r.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;
        report.audio_url = Some(patch.audio_url.clone());
        report.darija_script = Some(patch.darija_script.clone());
        report.updated_at = chrono::Utc::now();
        Ok(())
    }
}

/// A store whose every call fails with a driver error carrying connection details
pub struct FailingReportRepository;

impl FailingReportRepository {
    pub const LEAKED_DETAIL: &'static str = "10.0.0.3:5432 password=hunter2";

    fn error() -> AppError {
        AppError::Database(sqlx::Error::Protocol(format!(
            "relation \"reports\" at {}",
            Self::LEAKED_DETAIL
        )))
    }
}

#[async_trait]
impl ReportRepository for FailingReportRepository {
    async fn create(&self, _user_id: &str, _report: &NewReport) -> AppResult<Report> {
        Err(Self::error())
    }

    async fn find(&self, _user_id: &str, _report_id: Uuid) -> AppResult<Option<Report>> {
        Err(Self::error())
    }

    async fn list_by_user(&self, _user_id: &str, _limit: i64) -> AppResult<Vec<Report>> {
        Err(Self::error())
    }

    async fn patch_narration(
        &self,
        _user_id: &str,
        _report_id: Uuid,
        _patch: &NarrationPatch,
    ) -> AppResult<()> {
        Err(Self::error())
    }
}

/// Hooks that record the order of calls and return canned values
pub struct RecordingHooks {
    script: String,
    audio_url: String,
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingHooks {
    pub fn new(script: &str, audio_url: &str) -> Self {
        Self {
            script: script.to_string(),
            audio_url: audio_url.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl NarrationHooks for RecordingHooks {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn script(&self, _input: &NarrationInput) -> Result<String, PipelineError> {
        self.calls.lock().push("script");
        Ok(self.script.clone())
    }

    async fn audio(&self, _script: &str, _report_key: &str) -> Result<String, PipelineError> {
        self.calls.lock().push("audio");
        Ok(self.audio_url.clone())
    }
}
