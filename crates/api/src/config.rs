use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry, cookie name).
    pub jwt: JwtConfig,
    /// Activity-classifier service configuration.
    pub classifier: ClassifierConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `4000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            classifier: ClassifierConfig::from_env(),
        }
    }
}

/// Configuration for the external activity-classification service.
///
/// When no API key is configured the classifier adapter fails every
/// request; classification then degrades to the default category, so the
/// server runs fine without one.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// API key for the classification service. Optional.
    pub api_key: Option<String>,
    /// Base URL of the service (default: `https://api.anthropic.com`).
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
}

/// Default classifier model identifier.
const DEFAULT_CLASSIFIER_MODEL: &str = "claude-haiku-4-5";

impl ClassifierConfig {
    /// Load classifier configuration from environment variables.
    ///
    /// | Env Var               | Required | Default                     |
    /// |-----------------------|----------|-----------------------------|
    /// | `ANTHROPIC_API_KEY`   | no       | --                          |
    /// | `CLASSIFIER_BASE_URL` | no       | `https://api.anthropic.com` |
    /// | `CLASSIFIER_MODEL`    | no       | `claude-haiku-4-5`          |
    pub fn from_env() -> Self {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let base_url = std::env::var("CLASSIFIER_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com".into());

        let model =
            std::env::var("CLASSIFIER_MODEL").unwrap_or_else(|_| DEFAULT_CLASSIFIER_MODEL.into());

        Self {
            api_key,
            base_url,
            model,
        }
    }
}
