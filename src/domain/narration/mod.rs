pub mod hooks;
pub mod orchestrator;
pub mod severity;
pub mod synthesizer;
pub mod translator;

pub use hooks::{DeferredNarration, InlineNarration, NarrationHooks};
pub use orchestrator::{NarrationOrchestrator, NarrationOrchestratorApi, NarrationOutcome};
pub use synthesizer::{AudioSynthesizer, SynthesizedAudio};
pub use translator::ScriptTranslator;

use crate::domain::report::{NewReport, ReportStatus};
use crate::domain::shared::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Read-only projection of a report consumed by the narration stages
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationInput {
    pub parcelle_name: String,
    pub status: ReportStatus,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub weather: JsonValue,
}

impl From<&NewReport> for NarrationInput {
    fn from(report: &NewReport) -> Self {
        Self {
            parcelle_name: report
                .parcelle_name
                .clone()
                .unwrap_or_else(|| report.parcelle_id.clone()),
            status: report.status,
            summary: report.summary.clone(),
            recommendations: report.recommendations.clone(),
            weather: report.weather.clone(),
        }
    }
}

/// Request for POST /api/narration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationTrigger {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub report_id: String,
    #[serde(default)]
    pub parcelle_name: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub weather: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addressee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

/// A trigger that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationJob {
    pub user_id: String,
    pub report_id: Uuid,
    pub input: NarrationInput,
    pub addressee: Option<String>,
    pub voice_id: Option<String>,
}

impl NarrationTrigger {
    pub fn validate(self) -> Result<NarrationJob, PipelineError> {
        let user_id = self.user_id.trim().to_string();
        if user_id.is_empty() {
            return Err(PipelineError::Validation("userId is required".to_string()));
        }

        let report_id = Uuid::parse_str(self.report_id.trim()).map_err(|_| {
            PipelineError::Validation(format!("reportId '{}' is not a valid id", self.report_id))
        })?;

        let status = ReportStatus::parse(&self.status).ok_or_else(|| {
            PipelineError::Validation(format!(
                "status must be one of normal, vigilance, alerte (got '{}')",
                self.status
            ))
        })?;

        let summary = self.summary.trim().to_string();
        if summary.is_empty() {
            return Err(PipelineError::Validation("summary is required".to_string()));
        }

        let parcelle_name = self
            .parcelle_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "la parcelle".to_string());

        Ok(NarrationJob {
            user_id,
            report_id,
            input: NarrationInput {
                parcelle_name,
                status,
                summary,
                recommendations: self
                    .recommendations
                    .into_iter()
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect(),
                weather: self.weather.unwrap_or(JsonValue::Null),
            },
            addressee: self.addressee.filter(|a| !a.trim().is_empty()),
            voice_id: self.voice_id.filter(|v| !v.trim().is_empty()),
        })
    }
}

/// Response for POST /api/narration
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationResponse {
    pub success: bool,
    pub report_id: Uuid,
    pub audio_url: String,
    pub darija_script: String,
}

impl From<NarrationOutcome> for NarrationResponse {
    fn from(outcome: NarrationOutcome) -> Self {
        Self {
            success: true,
            report_id: outcome.report_id,
            audio_url: outcome.audio_url,
            darija_script: outcome.darija_script,
        }
    }
}
