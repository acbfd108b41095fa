//! Configuration module
//!
//! Environment-driven configuration for the gateway: server, database,
//! remote judge endpoints, media tooling paths, size limits and the
//! default toxicity threshold.

use std::env;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_THRESHOLD: f64 = 0.85;
const MAX_AUDIO_MB: usize = 25;
const MAX_IMAGE_MB: usize = 20;
const SEGMENT_SECONDS: u64 = 300;
const STREAM_MAX_BUFFER_MB: usize = 50;
const STREAM_IDLE_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    // Remote judge (OpenAI-compatible) configuration
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub openai_chat_model: String,
    pub openai_transcribe_model: String,
    // Translation and local classifier sidecars
    pub translate_url: Option<String>,
    pub translate_target: String,
    pub classifier_url: Option<String>,
    // Media tooling
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    // Size gates (checked before any remote call)
    pub max_audio_bytes: usize,
    pub max_image_bytes: usize,
    pub segment_seconds: u64,
    // Violation gating
    pub default_threshold: f64,
    pub admin_api_key: Option<String>,
    // Streaming (WebSocket) limits
    pub stream_max_buffer_bytes: usize,
    pub stream_idle_timeout_secs: u64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let openai_api_key =
            env::var("OPENAI_API_KEY").map_err(|_| anyhow::anyhow!("OPENAI_API_KEY must be set"))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let default_threshold: f64 = env_parse("TOXICITY_THRESHOLD", DEFAULT_THRESHOLD);
        if !(0.0..=1.0).contains(&default_threshold) {
            return Err(anyhow::anyhow!(
                "TOXICITY_THRESHOLD must be between 0.0 and 1.0, got {}",
                default_threshold
            ));
        }

        Ok(Self {
            server_port: env_parse("PORT", DEFAULT_PORT),
            cors_origins,
            environment,
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            openai_api_key,
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_chat_model: env::var("OPENAI_CHAT_MODEL")
                .unwrap_or_else(|_| "gpt-4o".to_string()),
            openai_transcribe_model: env::var("OPENAI_TRANSCRIBE_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            translate_url: env::var("TRANSLATE_URL").ok(),
            translate_target: env::var("TRANSLATE_TARGET").unwrap_or_else(|_| "en".to_string()),
            classifier_url: env::var("CLASSIFIER_URL").ok(),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            max_audio_bytes: env_parse("MAX_AUDIO_SIZE_MB", MAX_AUDIO_MB) * 1024 * 1024,
            max_image_bytes: env_parse("MAX_IMAGE_SIZE_MB", MAX_IMAGE_MB) * 1024 * 1024,
            segment_seconds: env_parse("AUDIO_SEGMENT_SECONDS", SEGMENT_SECONDS),
            default_threshold,
            admin_api_key: env::var("ADMIN_API_KEY").ok(),
            stream_max_buffer_bytes: env_parse("STREAM_MAX_BUFFER_MB", STREAM_MAX_BUFFER_MB)
                * 1024
                * 1024,
            stream_idle_timeout_secs: env_parse(
                "STREAM_IDLE_TIMEOUT_SECS",
                STREAM_IDLE_TIMEOUT_SECS,
            ),
        })
    }
}
