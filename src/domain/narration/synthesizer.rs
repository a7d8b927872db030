use crate::domain::shared::PipelineError;
use crate::infrastructure::repositories::{
    ArtifactRepository, SpeechRequest, TtsRepository, VoiceSettings,
};
use std::sync::Arc;

pub const AUDIO_PREFIX: &str = "audio-reports";
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Multilingual voice that carries a Maghrebi accent well
pub const FALLBACK_VOICE_ID: &str = "tavIIPLplRB883FzWU0V";
pub const FALLBACK_MODEL_ID: &str = "eleven_multilingual_v2";

/// Low stability and high similarity keep the accent instead of a flat read
pub const VOICE_SETTINGS: VoiceSettings = VoiceSettings {
    stability: 0.35,
    similarity_boost: 0.85,
    style: 0.45,
    use_speaker_boost: true,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub public_url: String,
    pub object_path: String,
    pub size_bytes: usize,
}

pub struct AudioSynthesizer {
    tts_repo: Arc<dyn TtsRepository>,
    artifact_repo: Arc<dyn ArtifactRepository>,
    default_voice: Option<String>,
    default_model: Option<String>,
}

impl AudioSynthesizer {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        artifact_repo: Arc<dyn ArtifactRepository>,
        default_voice: Option<String>,
        default_model: Option<String>,
    ) -> Self {
        Self {
            tts_repo,
            artifact_repo,
            default_voice,
            default_model,
        }
    }

    /// Explicit voice > configured default > fallback
    pub fn resolve_voice(&self, voice: Option<&str>) -> String {
        first_non_empty(voice, self.default_voice.as_deref(), FALLBACK_VOICE_ID)
    }

    /// Explicit model > configured default > fallback
    pub fn resolve_model(&self, model: Option<&str>) -> String {
        first_non_empty(model, self.default_model.as_deref(), FALLBACK_MODEL_ID)
    }

    /// Synthesize `text`, store it at `audio-reports/<filename>` and return its public URL.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
        model: Option<&str>,
        filename: &str,
    ) -> Result<SynthesizedAudio, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::Validation(
                "narration text cannot be empty".to_string(),
            ));
        }

        // Resolve storage first so a missing bucket fails before the TTS call
        let location = self.artifact_repo.location()?;

        let request = SpeechRequest {
            text: text.to_string(),
            voice_id: self.resolve_voice(voice),
            model_id: self.resolve_model(model),
            voice_settings: VOICE_SETTINGS,
        };

        let audio = self.tts_repo.synthesize(&request).await?;
        let size_bytes = audio.len();

        let object_path = object_path(filename);
        self.artifact_repo
            .upload_public(&object_path, audio, AUDIO_CONTENT_TYPE)
            .await?;

        let public_url = location.public_url(&object_path);

        tracing::info!(
            voice = %request.voice_id,
            model = %request.model_id,
            object_path = %object_path,
            size_bytes = size_bytes,
            "Narration audio stored"
        );

        Ok(SynthesizedAudio {
            public_url,
            object_path,
            size_bytes,
        })
    }
}

fn first_non_empty(explicit: Option<&str>, configured: Option<&str>, fallback: &str) -> String {
    explicit
        .filter(|v| !v.trim().is_empty())
        .or_else(|| configured.filter(|v| !v.trim().is_empty()))
        .unwrap_or(fallback)
        .trim()
        .to_string()
}

/// `report_<key>_<epochMillis>.mp3`
pub fn audio_filename(report_key: &str, epoch_millis: i64) -> String {
    let key: String = report_key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("report_{}_{}.mp3", key, epoch_millis)
}

pub fn object_path(filename: &str) -> String {
    format!("{}/{}", AUDIO_PREFIX, filename)
}
