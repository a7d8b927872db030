use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use parcel_report_backend::controllers::{narration::NarrationController, report::ReportController};
use parcel_report_backend::domain::narration::{
    AudioSynthesizer, InlineNarration, NarrationOrchestrator, ScriptTranslator,
};
use parcel_report_backend::domain::report::{ReportGenerator, ReportService};
use parcel_report_backend::infrastructure::config::{Config, LogFormat};
use parcel_report_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use parcel_report_backend::infrastructure::http::start_http_server;
use parcel_report_backend::infrastructure::repositories::{
    ElevenLabsTtsRepository, OpenAiChatRepository, PgReportRepository, S3ArtifactRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting parcel report backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // Missing provider credentials are reported here but only fail the calls that need them
    tracing::info!(
        report_llm_configured = config.report_llm.api_key.is_some(),
        report_llm_model = %config.report_llm.model,
        script_llm_configured = config.script_llm.api_key.is_some(),
        script_llm_model = %config.script_llm.model,
        elevenlabs_configured = config.elevenlabs_api_key.is_some(),
        storage_bucket = ?config.storage_bucket,
        "Provider configuration"
    );

    // Create S3 client
    tracing::info!("Initializing S3 client with region: {}", config.aws_region);
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    let mut s3_config = aws_sdk_s3::config::Builder::from(&aws_config);
    if let Some(endpoint) = &config.storage_endpoint_url {
        // S3-compatible providers are addressed path-style
        s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
        tracing::info!(endpoint = %endpoint, "Using custom storage endpoint");
    }
    let s3_client = Arc::new(aws_sdk_s3::Client::from_conf(s3_config.build()));

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let report_repo = Arc::new(PgReportRepository::new(pool.clone()));
    let report_chat_repo = Arc::new(OpenAiChatRepository::from_credentials(
        config.report_llm.api_key.clone(),
        config.report_llm.api_base.clone(),
        config.report_llm.model.clone(),
        "report",
    ));
    let script_chat_repo = Arc::new(OpenAiChatRepository::from_credentials(
        config.script_llm.api_key.clone(),
        config.script_llm.api_base.clone(),
        config.script_llm.model.clone(),
        "script",
    ));
    let tts_repo = Arc::new(ElevenLabsTtsRepository::new(
        reqwest::Client::new(),
        config.elevenlabs_api_key.clone(),
        config.elevenlabs_base_url.clone(),
    ));
    let artifact_repo = Arc::new(S3ArtifactRepository::new(
        s3_client,
        config.storage_bucket.clone(),
        config.storage_public_host.clone(),
    ));

    // 2. Instantiate narration stages
    let translator = Arc::new(ScriptTranslator::new(script_chat_repo));
    let synthesizer = Arc::new(AudioSynthesizer::new(
        tts_repo,
        artifact_repo,
        config.elevenlabs_voice_id.clone(),
        config.elevenlabs_model_id.clone(),
    ));

    // 3. Instantiate services
    tracing::info!("Instantiating services...");
    let report_service = Arc::new(ReportService::new(
        ReportGenerator::new(report_chat_repo),
        report_repo.clone(),
        Arc::new(InlineNarration::new(translator.clone(), synthesizer.clone())),
    ));
    let orchestrator = Arc::new(NarrationOrchestrator::new(
        translator,
        synthesizer,
        report_repo,
    ));

    // 4. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let report_controller = Arc::new(ReportController::new(report_service));
    let narration_controller = Arc::new(NarrationController::new(orchestrator));

    // Start HTTP server with all routes
    start_http_server(config, pool, report_controller, narration_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "parcel_report_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "parcel_report_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
