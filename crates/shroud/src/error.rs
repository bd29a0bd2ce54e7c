//! Error taxonomy for every shroud operation.

use thiserror::Error;

use crate::cipher::KEY_LEN;

/// Errors returned by [`Client`](crate::Client) and [`Secret`](crate::Secret).
///
/// No variant ever carries key material or plaintext. Deserialization
/// failures report only where the shape mismatch was found, because serde's
/// own messages quote the offending value.
#[derive(Debug, Error)]
pub enum ShroudError {
    /// The key is not exactly [`KEY_LEN`] bytes.
    #[error("invalid encryption key: expected {KEY_LEN} bytes, got {len}")]
    InvalidKey { len: usize },

    /// The serialized value or the supplied token is empty.
    #[error("value cannot be empty")]
    EmptyValue,

    /// The token is malformed, truncated, tampered with, or was sealed under
    /// a different key. These cases are intentionally indistinguishable.
    #[error("invalid secret format")]
    InvalidSecret,

    /// The value has no representation in the canonical encoding.
    #[error("failed to serialize value: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The decrypted payload does not fit the requested destination type.
    #[error("failed to deserialize value: incompatible shape at line {line} column {column}")]
    Deserialization { line: usize, column: usize },

    /// The AEAD primitive could not be set up or refused to seal.
    #[error("failed to initialise cipher")]
    CipherInit,

    /// The OS random source failed while generating a nonce or key.
    #[error("secure random source unavailable")]
    Randomness,

    /// A required argument was absent.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Coarse classification of a [`ShroudError`], stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidKey,
    EmptyValue,
    InvalidSecret,
    Serialization,
    Deserialization,
    CipherInit,
    Randomness,
    InvalidArgument,
}

impl ErrorKind {
    /// Short machine-readable code, e.g. `"invalid_secret"`.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidKey => "invalid_key",
            ErrorKind::EmptyValue => "empty_value",
            ErrorKind::InvalidSecret => "invalid_secret",
            ErrorKind::Serialization => "serialization_error",
            ErrorKind::Deserialization => "deserialization_error",
            ErrorKind::CipherInit => "cipher_init_error",
            ErrorKind::Randomness => "randomness_error",
            ErrorKind::InvalidArgument => "invalid_argument",
        }
    }

    /// Whether retrying with different input can never succeed.
    ///
    /// A bad key or a broken crypto backend is fatal; everything else is a
    /// problem with the particular value or token.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidKey | ErrorKind::CipherInit | ErrorKind::Randomness
        )
    }
}

impl ShroudError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShroudError::InvalidKey { .. } => ErrorKind::InvalidKey,
            ShroudError::EmptyValue => ErrorKind::EmptyValue,
            ShroudError::InvalidSecret => ErrorKind::InvalidSecret,
            ShroudError::Serialization(_) => ErrorKind::Serialization,
            ShroudError::Deserialization { .. } => ErrorKind::Deserialization,
            ShroudError::CipherInit => ErrorKind::CipherInit,
            ShroudError::Randomness => ErrorKind::Randomness,
            ShroudError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}
