//! Error taxonomy for the enclave envelope protocol.

use core::fmt;

/// Fieldless category of an [`EnclaveError`], for callers that only need to
/// decide between retrying with a new ephemeral key and giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Bootstrap,
    Rejected,
    DecryptionFailed,
    MalformedKeyMaterial,
    MalformedResponse,
    Encoding,
    Transport,
    Config,
}

#[derive(Debug)]
pub enum EnclaveError {
    /// Fetching the enclave's static public key failed. No handle exists.
    Bootstrap { reason: String },
    /// The enclave answered with a plaintext `{ "error": ... }` body.
    Rejected(String),
    /// AEAD authentication failed while opening an envelope.
    DecryptionFailed,
    /// Key, nonce or ciphertext of the wrong size or encoding.
    MalformedKeyMaterial { field: &'static str, reason: String },
    /// Response body is neither a plaintext error nor an envelope.
    MalformedResponse(String),
    /// Caller payload could not be serialized.
    Encoding(String),
    /// Network failure on an operation call.
    Transport(String),
    Config(String),
}

impl EnclaveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Bootstrap { .. } => ErrorKind::Bootstrap,
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::DecryptionFailed => ErrorKind::DecryptionFailed,
            Self::MalformedKeyMaterial { .. } => ErrorKind::MalformedKeyMaterial,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Only transport failures are worth retrying, and a retry must seal the
    /// payload again under a brand-new ephemeral key.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedKeyMaterial {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_length(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::malformed(
            field,
            format!("expected {} bytes, got {}", expected, actual),
        )
    }
}

impl fmt::Display for EnclaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap { reason } => write!(f, "enclave bootstrap failed: {}", reason),
            Self::Rejected(msg) => f.write_str(msg),
            Self::DecryptionFailed => write!(f, "decryption failed"),
            Self::MalformedKeyMaterial { field, reason } => {
                write!(f, "malformed {}: {}", field, reason)
            }
            Self::MalformedResponse(msg) => write!(f, "malformed enclave response: {}", msg),
            Self::Encoding(msg) => write!(f, "payload encoding error: {}", msg),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::Config(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for EnclaveError {}

pub type Result<T> = core::result::Result<T, EnclaveError>;
