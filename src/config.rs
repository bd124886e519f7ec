/// Client configuration
///
/// Resolution order for the backend address: the `--base-url` flag, then the
/// MEET_BRIEF_BASE_URL environment variable, then the backend's default dev
/// address.
use crate::error::{AppError, Result};

/// Environment variable consulted when --base-url is not given
pub const BASE_URL_ENV: &str = "MEET_BRIEF_BASE_URL";

/// Default backend address (the Flask dev server's)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    /// Resolve the configuration from an optional CLI flag
    pub fn resolve(flag: Option<String>) -> Result<Self> {
        let raw = flag
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self::from_raw(&raw)
    }

    fn from_raw(raw: &str) -> Result<Self> {
        let base_url = raw.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "base URL must start with http:// or https://, got {raw:?}"
            )));
        }
        Ok(Self { base_url })
    }
}
