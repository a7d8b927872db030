use crate::e2e::helpers;

use aws_sdk_s3::operation::put_object::{PutObjectError, PutObjectOutput};
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_smithy_mocks_experimental::{mock, mock_client};
use helpers::mock_audio_bytes;
use helpers::provider_mocks::MockProvider;
use hyper::StatusCode;
use parcel_report_backend::domain::shared::PipelineError;
use parcel_report_backend::infrastructure::repositories::{
    ArtifactRepository, ChatRepository, ChatRequest, ElevenLabsTtsRepository,
    OpenAiChatRepository, S3ArtifactRepository, SpeechRequest, TtsRepository, VoiceSettings,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn chat_request(json_mode: bool) -> ChatRequest {
    ChatRequest {
        system: "You are an agronomist.".to_string(),
        prompt: "## Parcel\n\"P1\"".to_string(),
        max_tokens: 1000,
        temperature: 0.3,
        json_mode,
    }
}

fn openai_repo(server: &MockProvider) -> OpenAiChatRepository {
    OpenAiChatRepository::from_credentials(
        Some("sk-test".to_string()),
        Some(format!("{}/v1", server.base_url)),
        "gpt-4o-mini".to_string(),
        "report",
    )
}

fn speech_request() -> SpeechRequest {
    SpeechRequest {
        text: "السلام عليكم الفلاح".to_string(),
        voice_id: "voice-123".to_string(),
        model_id: "eleven_multilingual_v2".to_string(),
        voice_settings: VoiceSettings {
            stability: 0.35,
            similarity_boost: 0.85,
            style: 0.45,
            use_speaker_boost: true,
        },
    }
}

#[tokio::test]
async fn it_should_call_chat_completions_in_json_mode() {
    let server = MockProvider::openai_replying(r#"{"status": "normal"}"#).await;
    let repo = openai_repo(&server);

    let content = repo.complete(&chat_request(true)).await.unwrap();
    assert_eq!(content, r#"{"status": "normal"}"#);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 1000);
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(
        requests[0].headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer sk-test")
    );
}

#[tokio::test]
async fn it_should_omit_response_format_for_free_text() {
    let server = MockProvider::openai_replying("السلام عليكم").await;
    let repo = openai_repo(&server);

    repo.complete(&chat_request(false)).await.unwrap();

    assert!(server.requests()[0].body.get("response_format").is_none());
}

#[tokio::test]
async fn it_should_map_chat_api_errors_to_upstream() {
    let server =
        MockProvider::openai_failing(StatusCode::INTERNAL_SERVER_ERROR, "The server had an error").await;
    let repo = openai_repo(&server);

    let err = repo.complete(&chat_request(true)).await.unwrap_err();

    match err {
        PipelineError::Upstream { provider, body, .. } => {
            assert_eq!(provider, "openai");
            assert!(body.contains("The server had an error"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn it_should_not_retry_rate_limited_chat_calls() {
    let server = MockProvider::openai_failing(StatusCode::TOO_MANY_REQUESTS, "Rate limit reached").await;
    let repo = openai_repo(&server);

    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        repo.complete(&chat_request(true)),
    )
    .await
    .expect("rate-limited call should return without backing off");

    match result.unwrap_err() {
        PipelineError::Upstream { provider, body, .. } => {
            assert_eq!(provider, "openai");
            assert!(body.contains("Rate limit reached"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn it_should_treat_empty_completion_as_upstream_error() {
    let server = MockProvider::openai_replying("   ").await;
    let repo = openai_repo(&server);

    let err = repo.complete(&chat_request(true)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Upstream { .. }));
}

#[tokio::test]
async fn it_should_post_text_to_speech_with_api_key() {
    let server = MockProvider::elevenlabs_returning(mock_audio_bytes()).await;
    let repo = ElevenLabsTtsRepository::new(
        reqwest::Client::new(),
        Some("xi-test".to_string()),
        format!("{}/", server.base_url),
    );

    let audio = repo.synthesize(&speech_request()).await.unwrap();
    assert_eq!(audio, mock_audio_bytes());

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path_param.as_deref(), Some("voice-123"));
    assert_eq!(
        requests[0].headers.get("xi-api-key").and_then(|v| v.to_str().ok()),
        Some("xi-test")
    );
    let body = &requests[0].body;
    assert_eq!(body["text"], "السلام عليكم الفلاح");
    assert_eq!(body["model_id"], "eleven_multilingual_v2");
    assert_eq!(body["voice_settings"]["use_speaker_boost"], true);
    assert!((body["voice_settings"]["similarity_boost"].as_f64().unwrap() - 0.85).abs() < 1e-6);
}

#[tokio::test]
async fn it_should_carry_tts_status_and_body_on_failure() {
    let server = MockProvider::elevenlabs_failing(StatusCode::UNAUTHORIZED, "invalid_api_key").await;
    let repo = ElevenLabsTtsRepository::new(
        reqwest::Client::new(),
        Some("wrong".to_string()),
        server.base_url.clone(),
    );

    let err = repo.synthesize(&speech_request()).await.unwrap_err();

    match err {
        PipelineError::Upstream {
            provider,
            status,
            body,
        } => {
            assert_eq!(provider, "elevenlabs");
            assert_eq!(status, Some(401));
            assert!(body.contains("invalid_api_key"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn it_should_upload_publicly_readable_audio_to_s3() {
    let put_rule = mock!(aws_sdk_s3::Client::put_object)
        .match_requests(|req| {
            req.bucket() == Some("agri-audio")
                && req.key() == Some("audio-reports/report_r1_1700000000000.mp3")
                && req.content_type() == Some("audio/mpeg")
                && req.acl() == Some(&ObjectCannedAcl::PublicRead)
        })
        .then_output(|| PutObjectOutput::builder().build());
    let client = mock_client!(aws_sdk_s3, [&put_rule]);

    let repo = S3ArtifactRepository::new(
        Arc::new(client),
        Some("agri-audio".to_string()),
        "s3.eu-west-1.amazonaws.com".to_string(),
    );

    repo.upload_public(
        "audio-reports/report_r1_1700000000000.mp3",
        mock_audio_bytes(),
        "audio/mpeg",
    )
    .await
    .unwrap();

    assert_eq!(put_rule.num_calls(), 1);
    assert_eq!(
        repo.location()
            .unwrap()
            .public_url("audio-reports/report_r1_1700000000000.mp3"),
        "https://s3.eu-west-1.amazonaws.com/agri-audio/audio-reports/report_r1_1700000000000.mp3"
    );
}

#[tokio::test]
async fn it_should_map_s3_failures_to_storage_errors() {
    let put_rule = mock!(aws_sdk_s3::Client::put_object).then_error(|| {
        PutObjectError::generic(
            aws_sdk_s3::error::ErrorMetadata::builder()
                .code("AccessDenied")
                .message("Access Denied")
                .build(),
        )
    });
    let client = mock_client!(aws_sdk_s3, [&put_rule]);

    let repo = S3ArtifactRepository::new(
        Arc::new(client),
        Some("agri-audio".to_string()),
        "s3.eu-west-1.amazonaws.com".to_string(),
    );

    let err = repo
        .upload_public("audio-reports/a.mp3", mock_audio_bytes(), "audio/mpeg")
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Storage(_)));
    assert_eq!(put_rule.num_calls(), 1);
}
