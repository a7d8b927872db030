use super::synthesizer::audio_filename;
use super::{AudioSynthesizer, NarrationInput, ScriptTranslator};
use crate::domain::shared::PipelineError;
use async_trait::async_trait;
use std::sync::Arc;

/// Narration capability handed to the report assembler.
///
/// Phase-1 runs with [`DeferredNarration`] by default; [`InlineNarration`]
/// produces the script and audio before the report is persisted.
#[async_trait]
pub trait NarrationHooks: Send + Sync {
    /// Whether the assembler should invoke the hooks at all
    fn is_enabled(&self) -> bool;

    async fn script(&self, input: &NarrationInput) -> Result<String, PipelineError>;

    /// Returns the public URL of the stored audio
    async fn audio(&self, script: &str, report_key: &str) -> Result<String, PipelineError>;
}

/// No-op hooks: audio fields stay absent until a narration trigger arrives
#[derive(Debug, Default, Clone, Copy)]
pub struct DeferredNarration;

#[async_trait]
impl NarrationHooks for DeferredNarration {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn script(&self, _input: &NarrationInput) -> Result<String, PipelineError> {
        Ok(String::new())
    }

    async fn audio(&self, _script: &str, _report_key: &str) -> Result<String, PipelineError> {
        Ok(String::new())
    }
}

pub struct InlineNarration {
    translator: Arc<ScriptTranslator>,
    synthesizer: Arc<AudioSynthesizer>,
}

impl InlineNarration {
    pub fn new(translator: Arc<ScriptTranslator>, synthesizer: Arc<AudioSynthesizer>) -> Self {
        Self {
            translator,
            synthesizer,
        }
    }
}

#[async_trait]
impl NarrationHooks for InlineNarration {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn script(&self, input: &NarrationInput) -> Result<String, PipelineError> {
        self.translator.translate(input, None).await
    }

    async fn audio(&self, script: &str, report_key: &str) -> Result<String, PipelineError> {
        let filename = audio_filename(report_key, chrono::Utc::now().timestamp_millis());
        let audio = self
            .synthesizer
            .synthesize(script, None, None, &filename)
            .await?;
        Ok(audio.public_url)
    }
}
