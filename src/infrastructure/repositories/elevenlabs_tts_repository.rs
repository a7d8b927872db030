use super::tts_repository::{SpeechRequest, TtsRepository, VoiceSettings};
use crate::domain::shared::PipelineError;
use async_trait::async_trait;
use serde::Serialize;

const PROVIDER: &str = "elevenlabs";

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

#[derive(Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl ElevenLabsTtsRepository {
    pub fn new(client: reqwest::Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url,
            urlencoding::encode(voice_id)
        )
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, PipelineError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| PipelineError::Configuration("no ElevenLabs API key configured".to_string()))?;

        let start_time = std::time::Instant::now();

        tracing::info!(
            provider = PROVIDER,
            voice = %request.voice_id,
            model = %request.model_id,
            text_length = request.text.len(),
            "Calling ElevenLabs text-to-speech"
        );

        let body = TextToSpeechBody {
            text: &request.text,
            model_id: &request.model_id,
            voice_settings: request.voice_settings,
        };

        let response = self
            .client
            .post(self.endpoint(&request.voice_id))
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = %request.voice_id, "ElevenLabs request failed");
                PipelineError::upstream(PROVIDER, e.status().map(|s| s.as_u16()), e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                voice = %request.voice_id,
                "ElevenLabs returned an error"
            );
            return Err(PipelineError::upstream(PROVIDER, Some(status.as_u16()), body));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::upstream(PROVIDER, Some(status.as_u16()), e.to_string()))?
            .to_vec();

        tracing::info!(
            provider = PROVIDER,
            voice = %request.voice_id,
            model = %request.model_id,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(audio_bytes)
    }
}
