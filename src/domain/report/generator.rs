use super::{FieldConditions, ReportRequest};
use crate::domain::shared::PipelineError;
use crate::infrastructure::repositories::{ChatRepository, ChatRequest};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::{Arc, LazyLock};

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.3;

const SYSTEM_INSTRUCTION: &str = "You are an agronomist advising smallholder farmers. \
You receive the current conditions of one field parcel (parcel description, weather, soil, elevation) \
and assess the agronomic risk for the coming days. \
Answer with a single JSON object and nothing else, using exactly these keys: \
\"status\" (one of \"normal\", \"vigilance\", \"alerte\"), \
\"summary\" (2 to 4 sentences in French describing the situation), \
\"recommendations\" (an array of 3 to 5 short, concrete actions in French, most urgent first).";

static FENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```[ \t]*(?:json)?\s*(.*?)\s*```").expect("valid fence pattern"));

/// Validated input together with the parsed model answer, ready for assembly
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDraft {
    pub conditions: FieldConditions,
    pub output: JsonValue,
}

pub struct ReportGenerator {
    chat_repo: Arc<dyn ChatRepository>,
}

impl ReportGenerator {
    pub fn new(chat_repo: Arc<dyn ChatRepository>) -> Self {
        Self { chat_repo }
    }

    /// Validate the request, ask the report model for an assessment and parse its JSON answer
    pub async fn generate(&self, request: ReportRequest) -> Result<ModelDraft, PipelineError> {
        let conditions = request.validate()?;

        let chat_request = ChatRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: build_prompt(&conditions),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            json_mode: true,
        };

        let raw = self.chat_repo.complete(&chat_request).await?;

        let output = parse_model_json(&raw).map_err(|e| {
            tracing::warn!(
                parcelle_id = %conditions.parcelle_id,
                response_preview = %raw.chars().take(200).collect::<String>(),
                "Report model answer is not valid JSON"
            );
            e
        })?;

        Ok(ModelDraft { conditions, output })
    }
}

/// Request-specific prompt. Payloads are embedded verbatim, always in the same order.
pub fn build_prompt(conditions: &FieldConditions) -> String {
    let section = |title: &str, value: &JsonValue| {
        let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        format!("## {}\n{}\n", title, rendered)
    };

    format!(
        "Assess the following parcel and produce the JSON report.\n\n{}\n{}\n{}\n{}",
        section("Parcel", &conditions.parcelle),
        section("Weather", &conditions.weather),
        section("Soil", &conditions.soil),
        section("Elevation", &conditions.elevation),
    )
}

/// Strip a surrounding code fence if there is one, otherwise return the trimmed text
pub fn extract_json(raw: &str) -> &str {
    FENCE_PATTERN
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| raw.trim())
}

pub fn parse_model_json(raw: &str) -> Result<JsonValue, PipelineError> {
    serde_json::from_str(extract_json(raw))
        .map_err(|e| PipelineError::Parse(format!("report model returned invalid JSON: {}", e)))
}
