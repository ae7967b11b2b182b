//! X25519 key types
//!
//! Serialization:
//!   PublicKey  = x25519_pk[32]   (hex on the wire)
//!   SecretKey  = x25519_sk[32]   (never leaves the process)
//!
//! An [`EphemeralKey`] is minted by every seal and consumed by the open of
//! the paired response, so one ephemeral key can never open two responses.

use core::fmt;

use rand_core::{CryptoRng, OsRng, RngCore};
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::{EnclaveError, Result};
use crate::wire::{decode_fixed, KEY_BYTES};

// ---------------------------------------------------------------------------
// Public key
// ---------------------------------------------------------------------------

/// A 32-byte X25519 public key.
#[derive(Clone, Copy)]
pub struct PublicKey(X25519PublicKey);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; KEY_BYTES] = bytes
            .try_into()
            .map_err(|_| EnclaveError::bad_length("public key", KEY_BYTES, bytes.len()))?;
        Ok(Self(X25519PublicKey::from(raw)))
    }

    pub fn from_hex(value: &str) -> Result<Self> {
        let raw = decode_fixed::<KEY_BYTES>("public key", value)?;
        Ok(Self(X25519PublicKey::from(raw)))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// First 8 hex characters, for logs.
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.as_bytes()[..4])
    }

    pub(crate) fn inner(&self) -> &X25519PublicKey {
        &self.0
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes().ct_eq(other.as_bytes()).into()
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

// ---------------------------------------------------------------------------
// Secret key
// ---------------------------------------------------------------------------

/// A 32-byte X25519 secret scalar, zeroized on drop.
#[derive(Clone)]
pub struct SecretKey(StaticSecret);

impl SecretKey {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(StaticSecret::random_from_rng(rng))
    }

    /// Generate from the operating system CSPRNG.
    pub fn random() -> Self {
        Self::generate(&mut OsRng)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: Zeroizing<[u8; KEY_BYTES]> = Zeroizing::new(
            bytes
                .try_into()
                .map_err(|_| EnclaveError::bad_length("secret key", KEY_BYTES, bytes.len()))?,
        );
        Ok(Self(StaticSecret::from(*raw)))
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; KEY_BYTES]> {
        Zeroizing::new(self.0.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(X25519PublicKey::from(&self.0))
    }

    pub(crate) fn inner(&self) -> &StaticSecret {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Ephemeral key
// ---------------------------------------------------------------------------

/// Single-use key pair retained by the caller between sealing a request and
/// opening its response. Not `Clone`.
pub struct EphemeralKey {
    secret: SecretKey,
    public: PublicKey,
}

impl EphemeralKey {
    pub(crate) fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = SecretKey::generate(rng);
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for EphemeralKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn secret_key_serialization_roundtrip() {
        let sk = SecretKey::random();
        let sk2 = SecretKey::from_bytes(sk.to_bytes().as_slice()).unwrap();
        assert_eq!(sk.public_key(), sk2.public_key());
    }

    #[test]
    fn public_key_hex_roundtrip() {
        let pk = SecretKey::random().public_key();
        assert_eq!(PublicKey::from_hex(&pk.to_hex()).unwrap(), pk);
        assert_eq!(pk.fingerprint(), pk.to_hex()[..8]);
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert_eq!(
            PublicKey::from_bytes(&[0u8; 31]).unwrap_err().kind(),
            ErrorKind::MalformedKeyMaterial
        );
        assert_eq!(
            SecretKey::from_bytes(&[0u8; 33]).unwrap_err().kind(),
            ErrorKind::MalformedKeyMaterial
        );
        assert_eq!(
            PublicKey::from_hex("abcd").unwrap_err().kind(),
            ErrorKind::MalformedKeyMaterial
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let sk = SecretKey::random();
        let dbg = format!("{:?}", sk);
        assert!(!dbg.contains(&hex::encode(sk.to_bytes().as_slice())));
        assert!(dbg.contains("redacted"));
    }
}
