//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first if present, so local
//! development does not need exported variables.

use std::env;
use std::path::PathBuf;

/// Default bearer token lifetime: 30 days.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 30;

/// Which document store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    /// Google Cloud Firestore (or its emulator).
    Firestore,
    /// In-process store, data is lost on restart.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Document store backend
    pub database_backend: DatabaseBackend,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: String,
    /// JWT signing key for bearer tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Bearer token lifetime in minutes
    pub token_ttl_minutes: i64,
    /// Directory where uploaded images are written and served from
    pub upload_dir: PathBuf,
    /// CORS origins; empty means any origin is accepted
    pub allowed_origins: Vec<String>,
    /// API key for the LLM provider. LLM endpoints fail without it.
    pub llm_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API
    pub llm_base_url: String,
    /// Chat model name
    pub llm_model: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            database_backend: DatabaseBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            upload_dir: env::temp_dir().join("petid-uploads"),
            allowed_origins: Vec::new(),
            llm_api_key: None,
            llm_base_url: "http://127.0.0.1:9".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    /// Config used by tests (alias of `Default`).
    pub fn test_default() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let database_backend = match env::var("DATABASE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => DatabaseBackend::Firestore,
            "memory" => DatabaseBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "DATABASE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let token_ttl_minutes = match env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or(ConfigError::Invalid {
                    name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                    value: raw,
                })?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            token_ttl_minutes,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            llm_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
