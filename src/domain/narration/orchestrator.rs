use super::synthesizer::audio_filename;
use super::{AudioSynthesizer, NarrationTrigger, ScriptTranslator};
use crate::domain::report::NarrationPatch;
use crate::domain::shared::PipelineError;
use crate::infrastructure::repositories::ReportRepository;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct NarrationOutcome {
    pub report_id: Uuid,
    pub audio_url: String,
    pub darija_script: String,
    pub object_path: String,
}

pub struct NarrationOrchestrator {
    translator: Arc<ScriptTranslator>,
    synthesizer: Arc<AudioSynthesizer>,
    report_repo: Arc<dyn ReportRepository>,
}

impl NarrationOrchestrator {
    pub fn new(
        translator: Arc<ScriptTranslator>,
        synthesizer: Arc<AudioSynthesizer>,
        report_repo: Arc<dyn ReportRepository>,
    ) -> Self {
        Self {
            translator,
            synthesizer,
            report_repo,
        }
    }
}

#[async_trait]
pub trait NarrationOrchestratorApi: Send + Sync {
    /// Run Phase-2 for an already persisted report
    ///
    /// This operation:
    /// - Validates the trigger payload
    /// - Checks the report exists for the caller before any provider is called
    /// - Generates the Darija script
    /// - Synthesizes and uploads the audio under a fresh object name
    /// - Patches `audioUrl` and `darijaScript` on the stored report
    ///
    /// The report is only written when every earlier step succeeded. Repeated
    /// triggers for the same report each upload a new object; the last patch wins.
    async fn narrate(&self, trigger: NarrationTrigger) -> Result<NarrationOutcome, PipelineError>;
}

#[async_trait]
impl NarrationOrchestratorApi for NarrationOrchestrator {
    async fn narrate(&self, trigger: NarrationTrigger) -> Result<NarrationOutcome, PipelineError> {
        let start_time = std::time::Instant::now();
        let job = trigger.validate()?;

        tracing::info!(
            user_id = %job.user_id,
            report_id = %job.report_id,
            status = %job.input.status,
            "Narration request"
        );

        // 1. The report must belong to the caller
        self.report_repo
            .find(&job.user_id, job.report_id)
            .await?
            .ok_or(PipelineError::NotFound)?;

        // 2. Script
        let script = self
            .translator
            .translate(&job.input, job.addressee.as_deref())
            .await?;

        // 3. Audio
        let filename = audio_filename(
            &job.report_id.to_string(),
            chrono::Utc::now().timestamp_millis(),
        );
        let audio = self
            .synthesizer
            .synthesize(&script, job.voice_id.as_deref(), None, &filename)
            .await?;

        // 4. Patch the stored report; the last patch wins
        let patch = NarrationPatch {
            audio_url: audio.public_url.clone(),
            darija_script: script.clone(),
        };
        self.report_repo
            .patch_narration(&job.user_id, job.report_id, &patch)
            .await?;

        tracing::info!(
            user_id = %job.user_id,
            report_id = %job.report_id,
            object_path = %audio.object_path,
            size_bytes = audio.size_bytes,
            latency_ms = start_time.elapsed().as_millis(),
            "Narration completed"
        );

        Ok(NarrationOutcome {
            report_id: job.report_id,
            audio_url: audio.public_url,
            darija_script: script,
            object_path: audio.object_path,
        })
    }
}
