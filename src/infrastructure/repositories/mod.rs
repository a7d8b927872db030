pub mod artifact_repository;
pub mod chat_repository;
pub mod elevenlabs_tts_repository;
pub mod openai_chat_repository;
pub mod report_repository;
pub mod s3_artifact_repository;
pub mod tts_repository;

pub use artifact_repository::{ArtifactRepository, StorageLocation};
pub use chat_repository::{ChatRepository, ChatRequest};
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use openai_chat_repository::OpenAiChatRepository;
pub use report_repository::{PgReportRepository, ReportRepository};
pub use s3_artifact_repository::S3ArtifactRepository;
pub use tts_repository::{SpeechRequest, TtsRepository, VoiceSettings};
