//! Envelope codec
//!
//! seal: fresh ephemeral key → key agreement with the peer's public key →
//!       fresh 24-byte nonce → AEAD seal → `{ ephemeralPublicKey, nonce, ciphertext }`
//! open: decode → key agreement with the envelope's ephemeral public key →
//!       AEAD open → UTF-8 → JSON if it parses, raw text otherwise
//!
//! Every seal derives a new key, so the random nonce never repeats under a key.

use core::fmt;
use core::marker::PhantomData;

use rand_core::{CryptoRng, OsRng, RngCore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use zeroize::Zeroizing;

use crate::aead;
use crate::error::{EnclaveError, Result};
use crate::kdf::{self, EncryptionKey};
use crate::keys::{EphemeralKey, PublicKey, SecretKey};
use crate::wire::{Envelope, NONCE_BYTES};

// ---------------------------------------------------------------------------
// Primitive injection
// ---------------------------------------------------------------------------

/// The ECDH + KDF + AEAD triple an [`EnvelopeCodec`] is built on.
pub trait CipherSuite {
    fn derive_key(secret: &SecretKey, peer: &PublicKey) -> Result<EncryptionKey>;
    fn seal(key: &EncryptionKey, nonce: &[u8; NONCE_BYTES], plaintext: &[u8]) -> Result<Vec<u8>>;
    fn open(key: &EncryptionKey, nonce: &[u8; NONCE_BYTES], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// X25519 + HKDF-SHA256 + XChaCha20-Poly1305.
pub struct X25519XChaCha20Poly1305;

impl CipherSuite for X25519XChaCha20Poly1305 {
    fn derive_key(secret: &SecretKey, peer: &PublicKey) -> Result<EncryptionKey> {
        kdf::derive_encryption_key(secret, peer)
    }

    fn seal(key: &EncryptionKey, nonce: &[u8; NONCE_BYTES], plaintext: &[u8]) -> Result<Vec<u8>> {
        aead::aead_seal(key, nonce, plaintext)
    }

    fn open(key: &EncryptionKey, nonce: &[u8; NONCE_BYTES], ciphertext: &[u8]) -> Result<Vec<u8>> {
        aead::aead_open(key, nonce, ciphertext)
    }
}

// ---------------------------------------------------------------------------
// Opened payloads
// ---------------------------------------------------------------------------

/// Decrypted payload. Content is opaque at this layer: bytes that parse as
/// JSON come back as `Json`, anything else as `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum Plaintext {
    Json(Value),
    Text(String),
}

impl Plaintext {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes).into_owned();
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(_) => None,
        }
    }

    /// Deserialize a JSON plaintext into a caller type.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Json(v) => serde_json::from_value(v)
                .map_err(|e| EnclaveError::MalformedResponse(e.to_string())),
            Self::Text(_) => Err(EnclaveError::MalformedResponse(
                "payload is not JSON".to_string(),
            )),
        }
    }
}

impl fmt::Display for Plaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Builds and opens envelopes. Stateless; share freely.
pub struct EnvelopeCodec<S: CipherSuite = X25519XChaCha20Poly1305> {
    _suite: PhantomData<fn() -> S>,
}

impl<S: CipherSuite> EnvelopeCodec<S> {
    pub fn new() -> Self {
        Self {
            _suite: PhantomData,
        }
    }

    /// Seal under a fresh ephemeral key from the OS CSPRNG.
    pub fn seal(&self, plaintext: &[u8], peer: &PublicKey) -> Result<(Envelope, EphemeralKey)> {
        self.seal_with_rng(&mut OsRng, plaintext, peer)
    }

    /// Seal with caller-supplied randomness. Returns the wire envelope and the
    /// ephemeral key needed to open the paired response.
    pub fn seal_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
        peer: &PublicKey,
    ) -> Result<(Envelope, EphemeralKey)> {
        let ephemeral = EphemeralKey::generate(rng);
        let key = S::derive_key(ephemeral.secret(), peer)?;
        let nonce = aead::nonce(rng);
        let ciphertext = S::seal(&key, &nonce, plaintext)?;

        let envelope = Envelope::encode(ephemeral.public_key().as_bytes(), &nonce, &ciphertext);
        Ok((envelope, ephemeral))
    }

    /// Serialize `payload` as JSON and seal it.
    pub fn seal_json<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        peer: &PublicKey,
    ) -> Result<(Envelope, EphemeralKey)> {
        let bytes = Zeroizing::new(
            serde_json::to_vec(payload).map_err(|e| EnclaveError::Encoding(e.to_string()))?,
        );
        self.seal(&bytes, peer)
    }

    /// Open with any secret whose public half the sender sealed to: the
    /// enclave's static key for requests, an ephemeral key for responses.
    pub fn open(&self, envelope: &Envelope, secret: &SecretKey) -> Result<Zeroizing<Vec<u8>>> {
        let parts = envelope.decode()?;
        let peer = PublicKey::from_bytes(&parts.ephemeral_public_key)?;
        let key = S::derive_key(secret, &peer)?;
        S::open(&key, &parts.nonce, &parts.ciphertext).map(Zeroizing::new)
    }

    pub fn open_payload(&self, envelope: &Envelope, secret: &SecretKey) -> Result<Plaintext> {
        let bytes = self.open(envelope, secret)?;
        Ok(Plaintext::from_bytes(&bytes))
    }

    /// Open the response paired with an earlier seal. The ephemeral key is
    /// consumed, whatever the outcome.
    pub fn open_response(&self, envelope: &Envelope, key: EphemeralKey) -> Result<Plaintext> {
        self.open_payload(envelope, key.secret())
    }
}

impl<S: CipherSuite> Default for EnvelopeCodec<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CipherSuite> Clone for EnvelopeCodec<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: CipherSuite> Copy for EnvelopeCodec<S> {}

impl<S: CipherSuite> fmt::Debug for EnvelopeCodec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnvelopeCodec")
    }
}
