//! Response discrimination
//!
//! An enclave response is either a plaintext `{ "error": ... }` object or a
//! sealed [`Envelope`]. The presence of an `error` key decides, and it is
//! checked before any decryption is attempted.

use serde_json::Value;

use crate::error::{EnclaveError, Result};
use crate::wire::Envelope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The enclave rejected the call without sealing a result.
    Error(String),
    Sealed(Envelope),
}

impl Response {
    /// Turn a rejection into `EnclaveError::Rejected`, keeping the enclave's
    /// message as-is.
    pub fn into_envelope(self) -> Result<Envelope> {
        match self {
            Self::Sealed(envelope) => Ok(envelope),
            Self::Error(msg) => Err(EnclaveError::Rejected(msg)),
        }
    }
}

/// Classify a raw response body.
pub fn classify(body: &[u8]) -> Result<Response> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| EnclaveError::MalformedResponse(format!("body is not JSON: {}", e)))?;
    classify_value(value)
}

/// Any `error` key counts, including `null`; only an absent key means sealed.
pub fn classify_value(value: Value) -> Result<Response> {
    if let Some(error) = value.get("error") {
        let msg = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(Response::Error(msg));
    }

    serde_json::from_value::<Envelope>(value)
        .map(Response::Sealed)
        .map_err(|e| EnclaveError::MalformedResponse(format!("not an envelope: {}", e)))
}
