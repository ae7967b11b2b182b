//! Wire format
//!
//! Request bodies and successful response bodies are the same JSON object:
//!
//! ```text
//! { "ephemeralPublicKey": hex[32], "nonce": hex[24], "ciphertext": hex[16+] }
//! ```
//!
//! `ciphertext` carries the Poly1305 tag in its last 16 bytes. No associated
//! data is bound into the seal.

use serde::{Deserialize, Serialize};

use crate::error::{EnclaveError, Result};

/// HKDF info string for the envelope encryption key.
pub const KDF_INFO: &[u8] = b"encryption";

/// X25519 public / secret key size.
pub const KEY_BYTES: usize = 32;
pub const NONCE_BYTES: usize = 24;
pub const TAG_BYTES: usize = 16;

/// Well-known bootstrap path, relative to the base address.
pub const ENCLAVE_INFO_PATH: &str = "/api/v1/enclave";

/// Prefix of every sealed operation route.
pub const OPERATION_PATH_PREFIX: &str = "/api/v1/";

/// Static secret header sent on every call when configured.
pub const SECRET_HEADER: &str = "x-enclave-secret";

/// An envelope as it crosses the wire. Fields are hex strings; use
/// [`Envelope::decode`] to get checked byte arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub ephemeral_public_key: String,
    pub nonce: String,
    pub ciphertext: String,
}

/// Decoded view of an [`Envelope`].
#[derive(Debug, Clone)]
pub struct EnvelopeParts {
    pub ephemeral_public_key: [u8; KEY_BYTES],
    pub nonce: [u8; NONCE_BYTES],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn encode(
        ephemeral_public_key: &[u8; KEY_BYTES],
        nonce: &[u8; NONCE_BYTES],
        ciphertext: &[u8],
    ) -> Self {
        Self {
            ephemeral_public_key: hex::encode(ephemeral_public_key),
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        }
    }

    /// Decode every field, rejecting anything not of the expected size before
    /// it reaches a cryptographic primitive.
    pub fn decode(&self) -> Result<EnvelopeParts> {
        let ephemeral_public_key =
            decode_fixed::<KEY_BYTES>("ephemeralPublicKey", &self.ephemeral_public_key)?;
        let nonce = decode_fixed::<NONCE_BYTES>("nonce", &self.nonce)?;

        let ciphertext = decode_hex("ciphertext", &self.ciphertext)?;
        if ciphertext.len() < TAG_BYTES {
            return Err(EnclaveError::malformed(
                "ciphertext",
                format!("expected at least {} bytes, got {}", TAG_BYTES, ciphertext.len()),
            ));
        }

        Ok(EnvelopeParts {
            ephemeral_public_key,
            nonce,
            ciphertext,
        })
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| EnclaveError::Encoding(e.to_string()))
    }
}

/// Decode a hex string of any length. A leading `0x` is tolerated.
pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>> {
    let value = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(value).map_err(|e| EnclaveError::malformed(field, e.to_string()))
}

/// Decode a hex string into an exact-size array.
pub fn decode_fixed<const N: usize>(field: &'static str, value: &str) -> Result<[u8; N]> {
    let bytes = decode_hex(field, value)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| EnclaveError::bad_length(field, N, bytes.len()))
}
