use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error_handling::{InquiryError, Result};
use crate::utils::log_sanitizer::redact_sensitive;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub auth_token: Option<String>,
    /// Transport-level timeout for the HTTP client. `None` leaves it to reqwest.
    pub request_timeout: Option<Duration>,
}

// The token is redacted so the config can be logged with `?config`.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("auth_token", &self.auth_token.as_deref().map(redact_sensitive))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_base_url: &str) -> Result<Self> {
        let api_base_url = Url::parse(api_base_url)?;
        if api_base_url.cannot_be_a_base() {
            return Err(InquiryError::Config(format!(
                "API URL cannot be used as a base: {}",
                api_base_url
            )));
        }

        Ok(Self {
            api_base_url,
            auth_token: None,
            request_timeout: None,
        })
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("INQUIRY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(base_url.trim())?;

        config.auth_token = lookup("INQUIRY_API_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if let Some(raw) = lookup("INQUIRY_API_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                InquiryError::Config(format!("INQUIRY_API_TIMEOUT_SECS must be a whole number, got '{}'", raw))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Append path segments to the base URL. Each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| InquiryError::Config("API URL cannot be used as a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
