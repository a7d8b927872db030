use super::{ReportAssembler, ReportGenerator, ReportRequest, Report};
use crate::domain::narration::{DeferredNarration, NarrationHooks};
use crate::domain::shared::PipelineError;
use crate::infrastructure::repositories::ReportRepository;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

const MAX_LISTED_REPORTS: i64 = 50;

/// How Phase-1 treats narration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrationMode {
    /// Return the report without audio; narration is triggered separately
    #[default]
    Deferred,
    /// Run script and audio generation before persisting the report
    Inline,
}

pub struct ReportService {
    generator: ReportGenerator,
    assembler: ReportAssembler,
    report_repo: Arc<dyn ReportRepository>,
    inline_hooks: Arc<dyn NarrationHooks>,
}

impl ReportService {
    pub fn new(
        generator: ReportGenerator,
        report_repo: Arc<dyn ReportRepository>,
        inline_hooks: Arc<dyn NarrationHooks>,
    ) -> Self {
        Self {
            generator,
            assembler: ReportAssembler::new(),
            report_repo,
            inline_hooks,
        }
    }
}

#[async_trait]
pub trait ReportServiceApi: Send + Sync {
    /// Generate and persist a report for a user
    ///
    /// This operation:
    /// - Validates the four field-condition payloads
    /// - Calls the report model in JSON mode and parses its answer
    /// - Assembles the report (running narration hooks only in inline mode)
    /// - Persists it; nothing is written if any earlier step fails
    async fn generate_report(
        &self,
        user_id: &str,
        request: ReportRequest,
        mode: NarrationMode,
    ) -> Result<Report, PipelineError>;

    async fn get_report(&self, user_id: &str, report_id: Uuid) -> Result<Report, PipelineError>;

    async fn list_reports(&self, user_id: &str) -> Result<Vec<Report>, PipelineError>;
}

#[async_trait]
impl ReportServiceApi for ReportService {
    async fn generate_report(
        &self,
        user_id: &str,
        request: ReportRequest,
        mode: NarrationMode,
    ) -> Result<Report, PipelineError> {
        let start_time = std::time::Instant::now();

        tracing::info!(user_id = %user_id, mode = ?mode, "Report generation request");

        // 1. Validate + model call + JSON extraction
        let draft = self.generator.generate(request).await?;

        // 2. Assemble with the narration capability selected by the caller
        let hooks: &dyn NarrationHooks = match mode {
            NarrationMode::Deferred => &DeferredNarration,
            NarrationMode::Inline => self.inline_hooks.as_ref(),
        };
        let new_report = self.assembler.assemble(draft, hooks).await?;

        // 3. Persist
        let report = self
            .report_repo
            .create(user_id, &new_report)
            .await?;

        tracing::info!(
            user_id = %user_id,
            report_id = %report.id,
            parcelle_id = %report.parcelle_id,
            status = %report.status,
            recommendations = report.recommendations.len(),
            has_audio = report.audio_url.is_some(),
            latency_ms = start_time.elapsed().as_millis(),
            "Report generated"
        );

        Ok(report)
    }

    async fn get_report(&self, user_id: &str, report_id: Uuid) -> Result<Report, PipelineError> {
        self.report_repo
            .find(user_id, report_id)
            .await?
            .ok_or(PipelineError::NotFound)
    }

    async fn list_reports(&self, user_id: &str) -> Result<Vec<Report>, PipelineError> {
        Ok(self
            .report_repo
            .list_by_user(user_id, MAX_LISTED_REPORTS)
            .await?)
    }
}
