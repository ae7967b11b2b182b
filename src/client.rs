//! Request dispatcher.
//!
//! One call = one fresh ephemeral key: seal the payload to the enclave's
//! static key, POST the envelope, classify the body, then either surface the
//! plaintext rejection or open the sealed result with that same ephemeral key.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::envelope::{EnvelopeCodec, Plaintext};
use crate::error::{EnclaveError, Result};
use crate::handle::EnclaveHandle;
use crate::payload::Payload;
use crate::response::{classify, Response};
use crate::wire::Envelope;

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Raw answer from the transport. Non-2xx statuses are not errors here:
/// enclave rejections arrive with error statuses and still need classifying.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        url: Url,
        headers: &HeaderMap,
        envelope: &Envelope,
    ) -> Result<TransportResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EnclaveError::Config(format!("http client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: Url,
        headers: &HeaderMap,
        envelope: &Envelope,
    ) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(envelope.to_json()?)
            .send()
            .await
            .map_err(|e| EnclaveError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| EnclaveError::Transport(e.to_string()))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for sealed enclave operations. Cheap to clone; concurrent calls
/// share the read-only handle and nothing else.
#[derive(Clone)]
pub struct EnclaveClient<T: Transport = HttpTransport> {
    handle: Arc<EnclaveHandle>,
    transport: T,
    codec: EnvelopeCodec,
}

impl EnclaveClient<HttpTransport> {
    /// Bootstrap a handle over HTTP and build a client on it.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        let handle = EnclaveHandle::bootstrap(transport.client(), config).await?;
        Ok(Self::with_transport(handle, transport))
    }
}

impl<T: Transport> EnclaveClient<T> {
    pub fn with_transport(handle: EnclaveHandle, transport: T) -> Self {
        Self {
            handle: Arc::new(handle),
            transport,
            codec: EnvelopeCodec::new(),
        }
    }

    pub fn handle(&self) -> &EnclaveHandle {
        &self.handle
    }

    /// Seal `payload`, send it and open the answer.
    ///
    /// Failures surface as distinct kinds: `Rejected` carries the enclave's
    /// own message, `DecryptionFailed` means the sealed answer did not
    /// authenticate under this call's key. Calling again mints a new key.
    pub async fn call(&self, payload: &Payload) -> Result<Plaintext> {
        let op = payload.name();
        let url = self.handle.operation_url(payload.route())?;
        let (envelope, ephemeral) = self.codec.seal_json(payload, self.handle.public_key())?;

        let response = self
            .transport
            .post(url, self.handle.auth_headers(), &envelope)
            .await?;
        debug!(
            op,
            status = response.status,
            request_bytes = envelope.ciphertext.len() / 2,
            response_bytes = response.body.len(),
            "enclave call completed"
        );

        let classified = classify(&response.body).map_err(|e| match e {
            EnclaveError::MalformedResponse(reason) => {
                EnclaveError::MalformedResponse(format!("status {}: {}", response.status, reason))
            }
            other => other,
        })?;
        if let Response::Error(msg) = &classified {
            warn!(op, status = response.status, error = %msg, "enclave rejected call");
        }
        let sealed = classified.into_envelope()?;

        self.codec.open_response(&sealed, ephemeral).map_err(|e| {
            if matches!(e, EnclaveError::DecryptionFailed) {
                warn!(op, "enclave response failed authentication");
            }
            e
        })
    }

    pub async fn ping(&self) -> Result<Plaintext> {
        self.call(&Payload::Ping).await
    }
}
