//! Enclave handle and bootstrap.
//!
//! The bootstrap is the only plaintext request in the protocol:
//! `GET {base}/api/v1/enclave` → `{ "publicKey": "<64 hex chars>" }`.

use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{EnclaveError, Result};
use crate::keys::PublicKey;
use crate::wire::{ENCLAVE_INFO_PATH, OPERATION_PATH_PREFIX};

/// Longest slice of a failed bootstrap body kept in the error.
const ERROR_BODY_LIMIT: usize = 256;

/// The enclave's public identity plus where and how to reach it.
/// Immutable once built; holds no secret key material.
#[derive(Debug, Clone)]
pub struct EnclaveHandle {
    base_url: Url,
    public_key: PublicKey,
    auth_headers: HeaderMap,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnclaveInfo {
    public_key: Option<String>,
}

impl EnclaveHandle {
    /// Build a handle from an already-known public key.
    pub fn new(base_url: Url, public_key: PublicKey, auth_headers: HeaderMap) -> Self {
        Self {
            base_url,
            public_key,
            auth_headers,
        }
    }

    /// Fetch the enclave's static public key. Every failure is a
    /// `Bootstrap` error and no handle is produced.
    pub async fn bootstrap(client: &Client, config: &ClientConfig) -> Result<Self> {
        let auth_headers = config.auth_headers()?;
        let url = join(&config.base_url, ENCLAVE_INFO_PATH).map_err(bootstrap_err)?;
        debug!(url = %url, "fetching enclave public key");

        let response = client
            .get(url)
            .headers(auth_headers.clone())
            .send()
            .await
            .map_err(|e| bootstrap_err(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(bootstrap_err(format!(
                "status {}: {}",
                status.as_u16(),
                truncate_body(&body, ERROR_BODY_LIMIT)
            )));
        }

        let info: EnclaveInfo = response
            .json()
            .await
            .map_err(|e| bootstrap_err(format!("invalid body: {}", e)))?;
        let raw = info
            .public_key
            .ok_or_else(|| bootstrap_err("missing publicKey"))?;
        let public_key = PublicKey::from_hex(&raw).map_err(|e| bootstrap_err(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            public_key = %public_key.fingerprint(),
            "enclave handle bootstrapped"
        );

        Ok(Self::new(config.base_url.clone(), public_key, auth_headers))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn auth_headers(&self) -> &HeaderMap {
        &self.auth_headers
    }

    /// Absolute URL of an operation route such as `sign/message`.
    pub fn operation_url(&self, route: &str) -> Result<Url> {
        let path = format!("{}{}", OPERATION_PATH_PREFIX, route);
        join(&self.base_url, &path).map_err(EnclaveError::Config)
    }
}

/// Append `path` to the base URL's path, keeping any prefix the base carries.
fn join(base: &Url, path: &str) -> core::result::Result<Url, String> {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{}{}", prefix, path));
    url.set_query(None);
    if url.cannot_be_a_base() {
        return Err(format!("{} cannot be a base url", base));
    }
    Ok(url)
}

/// Cut `body` to at most `limit` bytes on a char boundary.
fn truncate_body(body: &str, limit: usize) -> String {
    if body.len() <= limit {
        return body.to_string();
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes)", &body[..end], body.len())
}

fn bootstrap_err(reason: impl Into<String>) -> EnclaveError {
    EnclaveError::Bootstrap {
        reason: reason.into(),
    }
}
