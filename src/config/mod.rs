use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration for talking to the file-sharing backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (default: "http://localhost:3333")
    pub api_base_url: String,

    /// Public origin used to build share links (default: "http://localhost:3000")
    pub public_origin: String,

    /// Bearer token for authenticated endpoints
    pub api_token: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,

    /// JSON file with message overrides, keyed like `dashboard.loadError`
    pub messages_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3333".to_string(),
            public_origin: "http://localhost:3000".to_string(),
            api_token: None,
            request_timeout_secs: 30,
            messages_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or(default.api_base_url),

            public_origin: env::var("PUBLIC_ORIGIN")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(default.public_origin),

            api_token: env::var("API_TOKEN").ok().filter(|v| !v.trim().is_empty()),

            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.request_timeout_secs),

            messages_file: env::var("MESSAGES_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Config for a local backend with short timeouts
    pub fn development() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3333".to_string(),
            public_origin: "http://localhost:3000".to_string(),
            api_token: env::var("API_TOKEN").ok(),
            request_timeout_secs: 5,
            messages_file: None,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
