use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub user_id: String,
    pub parcelle_id: String,
    pub parcelle_name: Option<String>,
    pub status: ReportStatus,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub weather: JsonValue,
    pub audio_url: Option<String>,
    pub darija_script: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Report content before the store assigns its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub parcelle_id: String,
    pub parcelle_name: Option<String>,
    pub status: ReportStatus,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub weather: JsonValue,
    pub audio_url: Option<String>,
    pub darija_script: Option<String>,
}

/// Fields written by a narration run. Both are overwritten together.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationPatch {
    pub audio_url: String,
    pub darija_script: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum ReportStatus {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "vigilance")]
    Vigilance,
    #[serde(rename = "alerte")]
    Alerte,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Normal => "normal",
            ReportStatus::Vigilance => "vigilance",
            ReportStatus::Alerte => "alerte",
        }
    }

    /// Direct lookup, ignoring surrounding whitespace and case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Some(ReportStatus::Normal),
            "vigilance" => Some(ReportStatus::Vigilance),
            "alerte" => Some(ReportStatus::Alerte),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
