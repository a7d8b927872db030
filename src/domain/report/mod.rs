pub mod assembler;
pub mod generator;
pub mod model;
pub mod service;

pub use assembler::ReportAssembler;
pub use generator::{ModelDraft, ReportGenerator};
pub use model::{NarrationPatch, NewReport, Report, ReportStatus};
pub use service::{NarrationMode, ReportService, ReportServiceApi};

use crate::domain::shared::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Request for POST /api/reports
///
/// Every field is an opaque payload; absent and `null` are both treated as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parcelle: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<JsonValue>,
}

/// A request that passed validation: all four payloads present and the
/// parcelle identity resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConditions {
    pub parcelle_id: String,
    pub parcelle_name: Option<String>,
    pub parcelle: JsonValue,
    pub weather: JsonValue,
    pub soil: JsonValue,
    pub elevation: JsonValue,
}

impl ReportRequest {
    pub fn validate(self) -> Result<FieldConditions, PipelineError> {
        let missing: Vec<&str> = [
            ("parcelle", self.parcelle.is_none()),
            ("weather", self.weather.is_none()),
            ("soil", self.soil.is_none()),
            ("elevation", self.elevation.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (self.parcelle, self.weather, self.soil, self.elevation) {
            (Some(parcelle), Some(weather), Some(soil), Some(elevation)) => {
                let (parcelle_id, parcelle_name) = parcelle_identity(&parcelle)?;
                Ok(FieldConditions {
                    parcelle_id,
                    parcelle_name,
                    parcelle,
                    weather,
                    soil,
                    elevation,
                })
            }
            _ => Err(PipelineError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}

/// Resolve `(id, name)` from the parcelle payload.
///
/// A string is the id itself. An object uses `id`, then `parcelleId`, then
/// `name`; its display name comes from `name` or `nom`.
fn parcelle_identity(parcelle: &JsonValue) -> Result<(String, Option<String>), PipelineError> {
    let non_empty = |value: Option<&JsonValue>| -> Option<String> {
        match value? {
            JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };

    match parcelle {
        JsonValue::String(s) if !s.trim().is_empty() => Ok((s.trim().to_string(), None)),
        JsonValue::Object(map) => {
            let name = non_empty(map.get("name")).or_else(|| non_empty(map.get("nom")));
            let id = non_empty(map.get("id"))
                .or_else(|| non_empty(map.get("parcelleId")))
                .or_else(|| name.clone())
                .ok_or_else(|| {
                    PipelineError::Validation("parcelle must carry an id or a name".to_string())
                })?;
            Ok((id, name))
        }
        _ => Err(PipelineError::Validation(
            "parcelle must be a non-empty string or an object".to_string(),
        )),
    }
}

/// Report as returned by the API
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: Uuid,
    pub parcelle_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parcelle_name: Option<String>,
    pub status: ReportStatus,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub weather: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub darija_script: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            parcelle_id: report.parcelle_id,
            parcelle_name: report.parcelle_name,
            status: report.status,
            summary: report.summary,
            recommendations: report.recommendations,
            weather: report.weather,
            audio_url: report.audio_url,
            darija_script: report.darija_script,
            created_at: report.created_at,
        }
    }
}
