//! AEAD: XChaCha20-Poly1305, no associated data

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    Key, XChaCha20Poly1305, XNonce,
};
use rand_core::{CryptoRng, RngCore};

use crate::error::{EnclaveError, Result};
use crate::kdf::EncryptionKey;
use crate::wire::NONCE_BYTES;

/// Draw a fresh 24-byte nonce. Used during sealing only.
pub fn nonce<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; NONCE_BYTES] {
    let mut n = [0u8; NONCE_BYTES];
    rng.fill_bytes(&mut n);
    n
}

/// Seal; the returned ciphertext ends with the 16-byte tag.
pub fn aead_seal(
    key: &EncryptionKey,
    nonce: &[u8; NONCE_BYTES],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let payload = Payload { msg: plaintext, aad: &[] };
    cipher
        .encrypt(XNonce::from_slice(nonce), payload)
        .map_err(|_| EnclaveError::Encoding("aead seal failed".to_string()))
}

/// Open; any tag mismatch is `DecryptionFailed`.
pub fn aead_open(
    key: &EncryptionKey,
    nonce: &[u8; NONCE_BYTES],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let payload = Payload { msg: ciphertext, aad: &[] };
    cipher
        .decrypt(XNonce::from_slice(nonce), payload)
        .map_err(|_| EnclaveError::DecryptionFailed)
}
