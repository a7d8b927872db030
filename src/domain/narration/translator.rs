use super::severity::severity_term;
use super::NarrationInput;
use crate::domain::shared::PipelineError;
use crate::infrastructure::repositories::{ChatRepository, ChatRequest};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const DEFAULT_ADDRESSEE: &str = "الفلاح";
pub const OPENING_GREETING: &str = "السلام عليكم";
pub const CLOSING_BLESSING: &str = "الله يعاونك";

const MIN_WORDS: u32 = 130;
const MAX_WORDS: u32 = 150;
const MAX_TOKENS: u32 = 700;
const TEMPERATURE: f32 = 0.7;

const SYSTEM_INSTRUCTION: &str = "You write short radio-style voice messages in Moroccan Darija \
for farmers. Your text is read aloud by a text-to-speech voice, so you write plain spoken sentences only.";

/// Turns a report projection into a Darija narration script.
///
/// Length and the mandated phrases are requested from the model, not checked
/// afterwards.
pub struct ScriptTranslator {
    chat_repo: Arc<dyn ChatRepository>,
}

impl ScriptTranslator {
    pub fn new(chat_repo: Arc<dyn ChatRepository>) -> Self {
        Self { chat_repo }
    }

    pub async fn translate(
        &self,
        input: &NarrationInput,
        addressee: Option<&str>,
    ) -> Result<String, PipelineError> {
        let addressee = addressee.unwrap_or(DEFAULT_ADDRESSEE);

        let chat_request = ChatRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: build_prompt(input, addressee),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            json_mode: false,
        };

        let script = self.chat_repo.complete(&chat_request).await?.trim().to_string();

        tracing::info!(
            parcelle = %input.parcelle_name,
            status = %input.status,
            word_count = script.split_whitespace().count(),
            "Darija script generated"
        );

        Ok(script)
    }
}

pub fn build_prompt(input: &NarrationInput, addressee: &str) -> String {
    let recommendations = if input.recommendations.is_empty() {
        "- (aucune)".to_string()
    } else {
        input
            .recommendations
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}", i + 1, r))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let weather = match &input.weather {
        JsonValue::Null => "(non disponible)".to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    };

    format!(
        "Rewrite this agronomic report as a spoken message in Moroccan Darija for {addressee}.\n\
\n\
Report:\n\
- Parcel: {parcel}\n\
- Situation: {severity} ({status})\n\
- Summary: {summary}\n\
- Weather: {weather}\n\
- Recommendations:\n{recommendations}\n\
\n\
Rules:\n\
1. Between {min} and {max} words.\n\
2. Start exactly with \"{greeting}\" followed by {addressee}.\n\
3. End exactly with \"{blessing}\".\n\
4. Speak Darija, but keep French technical words for agronomy (irrigation, traitement, engrais, mildiou, etc.) \
the way farmers naturally mix them.\n\
5. Say the situation with the words \"{severity}\".\n\
6. Plain text only: no markdown, no lists, no emojis, no titles.",
        addressee = addressee,
        parcel = input.parcelle_name,
        severity = severity_term(input.status),
        status = input.status,
        summary = input.summary,
        weather = weather,
        recommendations = recommendations,
        min = MIN_WORDS,
        max = MAX_WORDS,
        greeting = OPENING_GREETING,
        blessing = CLOSING_BLESSING,
    )
}
