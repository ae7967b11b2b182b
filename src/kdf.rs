//! Key agreement
//!
//! shared = X25519(secret, peer_public)
//! key    = HKDF-SHA256(shared, salt=None, info=b"encryption", len=32)

use core::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{EnclaveError, Result};
use crate::keys::{PublicKey, SecretKey};
use crate::wire::{KDF_INFO, KEY_BYTES};

/// Symmetric key for one envelope. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_BYTES]);

impl EncryptionKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }
}

impl PartialEq for EncryptionKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Derive the envelope key from our secret scalar and the peer's public point.
///
/// A peer key that yields an all-zero shared secret (a low-order point) is
/// rejected as malformed key material.
pub fn derive_encryption_key(secret: &SecretKey, peer: &PublicKey) -> Result<EncryptionKey> {
    let shared = secret.inner().diffie_hellman(peer.inner());
    if !shared.was_contributory() {
        return Err(EnclaveError::malformed(
            "peer public key",
            "non-contributory key agreement",
        ));
    }

    let hk = Hkdf::<Sha256>::new(None, shared.as_bytes());
    let mut out = [0u8; KEY_BYTES];
    hk.expand(KDF_INFO, &mut out)
        .map_err(|_| EnclaveError::malformed("encryption key", "hkdf expand failed"))?;
    let key = EncryptionKey(out);
    out.zeroize();
    Ok(key)
}

/// Raw-bytes entry point: both inputs must be exactly 32 bytes.
pub fn derive_encryption_key_from_bytes(secret: &[u8], peer: &[u8]) -> Result<EncryptionKey> {
    let secret = SecretKey::from_bytes(secret)?;
    let peer = PublicKey::from_bytes(peer)?;
    derive_encryption_key(&secret, &peer)
}
