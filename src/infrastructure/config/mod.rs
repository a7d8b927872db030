use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub aws_region: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Report model
    pub report_llm: LlmConfig,
    // Darija script model
    pub script_llm: LlmConfig,
    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_voice_id: Option<String>,
    pub elevenlabs_model_id: Option<String>,
    // Audio storage
    pub storage_bucket: Option<String>,
    pub storage_public_host: String,
    pub storage_endpoint_url: Option<String>,
}

/// Credentials and model of one OpenAI-compatible chat endpoint
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

pub const DEFAULT_REPORT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SCRIPT_MODEL: &str = "gpt-4o";
pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

impl Config {
    /// Credentials for the model and storage providers are optional here;
    /// a missing one surfaces as a configuration error when it is first needed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let aws_region = env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string());
        let shared_openai_key = optional_var("OPENAI_API_KEY");

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            report_llm: LlmConfig {
                api_key: optional_var("REPORT_LLM_API_KEY").or_else(|| shared_openai_key.clone()),
                api_base: optional_var("REPORT_LLM_API_BASE"),
                model: optional_var("REPORT_LLM_MODEL")
                    .unwrap_or_else(|| DEFAULT_REPORT_MODEL.to_string()),
            },
            script_llm: LlmConfig {
                api_key: optional_var("SCRIPT_LLM_API_KEY").or(shared_openai_key),
                api_base: optional_var("SCRIPT_LLM_API_BASE"),
                model: optional_var("SCRIPT_LLM_MODEL")
                    .unwrap_or_else(|| DEFAULT_SCRIPT_MODEL.to_string()),
            },
            elevenlabs_api_key: optional_var("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: optional_var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
            elevenlabs_voice_id: optional_var("ELEVENLABS_VOICE_ID"),
            elevenlabs_model_id: optional_var("ELEVENLABS_MODEL_ID"),
            storage_bucket: optional_var("STORAGE_BUCKET"),
            storage_public_host: optional_var("STORAGE_PUBLIC_HOST")
                .unwrap_or_else(|| default_public_host(&aws_region)),
            storage_endpoint_url: optional_var("STORAGE_ENDPOINT_URL"),
            aws_region,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Unset and blank variables are both treated as absent
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_public_host(region: &str) -> String {
    format!("s3.{}.amazonaws.com", region)
}
