use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider settings
    pub provider: ProviderConfig,
    /// State database settings
    pub database: DatabaseConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// HTTP request settings
    pub request: RequestConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Credential passed as the `key` query parameter. `None` when unset or blank;
    /// that is reported when an analysis is attempted, not at startup.
    pub api_key: Option<String>,
    /// Endpoint root, without the `/v1beta/...` path
    pub base_url: String,
    /// Model name used in the request path
    pub model: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite file path
    pub path: PathBuf,
    /// Pool size
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Transport timeout. Unset means reqwest's own defaults apply.
    pub timeout_ms: Option<u64>,
}

/// Provider endpoint used when `GEMINI_BASE_URL` is unset
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Model used when `GEMINI_MODEL` is unset
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let provider = ProviderConfig {
            api_key: env::var("GEMINI_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        };

        let database = DatabaseConfig {
            path: PathBuf::from(
                env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/crucible.db".to_string()),
            ),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &u32| *n > 0)
                .unwrap_or(1),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms: &u64| *ms > 0),
        };

        Config {
            provider,
            database,
            logging,
            request,
        }
    }
}

impl ProviderConfig {
    /// Provider settings with the default endpoint and model.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Point the client at a different base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The credential, trimmed, or `None` when unset or blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}
