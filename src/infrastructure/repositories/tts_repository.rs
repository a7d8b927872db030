use crate::domain::shared::PipelineError;
use async_trait::async_trait;
use serde::Serialize;

/// Voice quality parameters sent with every synthesis request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

/// A fully resolved synthesis request (voice and model already chosen)
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (ElevenLabs or a compatible API)
///
/// Implementations are responsible for:
/// - Rejecting calls without a configured credential before touching the network
/// - Returning the binary audio payload (MP3 format) on success
/// - Reporting non-success responses with their status code and body
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech with the given voice and model
    ///
    /// # Errors
    /// `PipelineError::Configuration` when uncredentialed,
    /// `PipelineError::Upstream` when the provider fails
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, PipelineError>;
}
