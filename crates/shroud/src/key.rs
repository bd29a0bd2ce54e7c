//! [`Key`]: the client's AES-256 key material.

use zeroize::{Zeroize, Zeroizing};

use crate::cipher::KEY_LEN;
use crate::error::ShroudError;

/// Exactly [`KEY_LEN`] bytes, heap-allocated so moves never leave copies
/// behind, and wiped with [`zeroize`] when the owning
/// [`Client`](crate::Client) goes away.
#[derive(Clone)]
pub(crate) struct Key(Box<Zeroizing<[u8; KEY_LEN]>>);

impl Key {
    /// Copy `bytes` into a new key.
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidKey`] if the slice is not [`KEY_LEN`] bytes.
    pub(crate) fn from_slice(bytes: &[u8]) -> Result<Self, ShroudError> {
        let material: &[u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| ShroudError::InvalidKey { len: bytes.len() })?;
        Ok(Self(Box::new(Zeroizing::new(*material))))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Zeroize for Key {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key([REDACTED])")
    }
}
