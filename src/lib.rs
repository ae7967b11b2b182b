//! # Enclave Envelope
//!
//! Confidential request/response envelopes for a remote signing enclave.
//!
//! Every call mints a fresh X25519 key pair, agrees a key with the enclave's
//! static public key (HKDF-SHA256), and seals the payload with
//! XChaCha20-Poly1305. The enclave answers either with a plaintext
//! `{ "error": ... }` or with an envelope sealed back to the call's ephemeral
//! public key.
//!
//! ## Quick Start
//!
//! ```rust
//! use enclave_envelope::{EnvelopeCodec, Plaintext, SecretKey};
//!
//! let codec: EnvelopeCodec = EnvelopeCodec::new();
//! let enclave = SecretKey::random();
//!
//! // client side
//! let (request, ephemeral) = codec.seal(b"{\"op\":\"ping\"}", &enclave.public_key()).unwrap();
//!
//! // enclave side
//! let opened = codec.open(&request, &enclave).unwrap();
//! assert_eq!(opened.as_slice(), b"{\"op\":\"ping\"}");
//! let (response, _) = codec.seal(b"pong", ephemeral.public_key()).unwrap();
//!
//! // client side again; the ephemeral key is consumed here
//! let reply = codec.open_response(&response, ephemeral).unwrap();
//! assert_eq!(reply, Plaintext::Text("pong".to_string()));
//! ```
//!
//! Over HTTP, [`EnclaveClient::connect`] bootstraps the enclave's public key
//! from `GET {base}/api/v1/enclave` and [`EnclaveClient::call`] runs the
//! whole round trip for a [`Payload`].
//!
//! ## What's NOT Provided
//!
//! - Associated data: envelopes are not bound to a route or request id
//! - Replay tracking beyond single-use ephemeral keys
//! - Retries; a retried call must go through `call` again for a new key

#![deny(unsafe_code)]

mod aead;
mod client;
mod config;
mod envelope;
mod error;
mod handle;
mod kdf;
mod keys;
mod payload;
mod response;

pub mod wire;

pub use client::{EnclaveClient, HttpTransport, Transport, TransportResponse};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use envelope::{CipherSuite, EnvelopeCodec, Plaintext, X25519XChaCha20Poly1305};
pub use error::{EnclaveError, ErrorKind, Result};
pub use handle::EnclaveHandle;
pub use kdf::{derive_encryption_key, derive_encryption_key_from_bytes, EncryptionKey};
pub use keys::{EphemeralKey, PublicKey, SecretKey};
pub use payload::Payload;
pub use response::{classify, classify_value, Response};
pub use wire::Envelope;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
