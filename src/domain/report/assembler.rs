use super::{ModelDraft, NewReport, ReportStatus};
use crate::domain::narration::{NarrationHooks, NarrationInput};
use crate::domain::shared::PipelineError;
use serde_json::Value as JsonValue;

/// Merges the model's assessment with the request context into a report.
///
/// Pure composition: the only I/O happens inside the narration hooks, and
/// only when the caller supplied non-trivial ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn new() -> Self {
        Self
    }

    pub async fn assemble(
        &self,
        draft: ModelDraft,
        hooks: &dyn NarrationHooks,
    ) -> Result<NewReport, PipelineError> {
        let ModelDraft { conditions, output } = draft;

        let mut report = NewReport {
            status: classify_status(&output)?,
            summary: extract_summary(&output)?,
            recommendations: extract_recommendations(&output)?,
            parcelle_id: conditions.parcelle_id,
            parcelle_name: conditions.parcelle_name,
            weather: conditions.weather,
            audio_url: None,
            darija_script: None,
        };

        if hooks.is_enabled() {
            let input = NarrationInput::from(&report);
            let script = hooks.script(&input).await?;
            let audio_url = hooks.audio(&script, &report.parcelle_id).await?;

            report.darija_script = Some(script).filter(|s| !s.is_empty());
            report.audio_url = Some(audio_url).filter(|u| !u.is_empty());
        }

        Ok(report)
    }
}

fn classify_status(output: &JsonValue) -> Result<ReportStatus, PipelineError> {
    let raw = output
        .get("status")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| PipelineError::Parse("model output has no status".to_string()))?;

    ReportStatus::parse(raw)
        .ok_or_else(|| PipelineError::Parse(format!("model output has unknown status '{}'", raw)))
}

fn extract_summary(output: &JsonValue) -> Result<String, PipelineError> {
    output
        .get("summary")
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PipelineError::Parse("model output has no summary".to_string()))
}

/// Accepts an array of strings (blank entries dropped) or a single string
fn extract_recommendations(output: &JsonValue) -> Result<Vec<String>, PipelineError> {
    let recommendations = match output.get("recommendations") {
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
                    PipelineError::Parse("recommendations must be strings".to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>(),
        Some(JsonValue::String(single)) if !single.trim().is_empty() => {
            vec![single.trim().to_string()]
        }
        _ => Vec::new(),
    };

    if recommendations.is_empty() {
        return Err(PipelineError::Parse(
            "model output has no recommendations".to_string(),
        ));
    }

    Ok(recommendations)
}
