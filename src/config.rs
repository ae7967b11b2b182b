//! Client configuration.
//!
//! Environment variables read by [`ClientConfig::from_env`]:
//!   ENCLAVE_BASE_URL       - Enclave base address (required)
//!   ENCLAVE_SECRET         - Static secret sent as `x-enclave-secret` (optional)
//!   ENCLAVE_TIMEOUT_SECS   - HTTP timeout in seconds (default: 30)

use core::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Url;
use zeroize::Zeroizing;

use crate::error::{EnclaveError, Result};
use crate::wire::SECRET_HEADER;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub secret: Option<Zeroizing<String>>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| EnclaveError::Config(format!("base url {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(EnclaveError::Config(format!("{} cannot be a base url", base_url)));
        }
        Ok(Self {
            base_url,
            secret: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(Zeroizing::new(secret.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self> {
        let base = std::env::var("ENCLAVE_BASE_URL")
            .map_err(|_| EnclaveError::Config("ENCLAVE_BASE_URL is not set".to_string()))?;
        let mut config = Self::new(&base)?;

        if let Ok(secret) = std::env::var("ENCLAVE_SECRET") {
            if !secret.is_empty() {
                config = config.with_secret(secret);
            }
        }

        if let Ok(raw) = std::env::var("ENCLAVE_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| EnclaveError::Config(format!("ENCLAVE_TIMEOUT_SECS={:?}", raw)))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Static headers sent on the bootstrap call and every operation call.
    pub fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(secret) = &self.secret {
            let mut value = HeaderValue::from_str(secret)
                .map_err(|_| EnclaveError::Config("secret is not a valid header value".to_string()))?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(SECRET_HEADER), value);
        }
        Ok(headers)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
