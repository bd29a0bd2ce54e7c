//! AES-256-GCM sealing and opening of opaque byte payloads.
//!
//! # Sealed layout
//!
//! ```text
//! nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! Every call to [`Client::encrypt`] draws a fresh 96-bit nonce from the OS
//! CSPRNG. GCM nonce reuse under one key breaks both confidentiality and
//! authentication, so the nonce is never derived from the plaintext and never
//! cached.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::ShroudError;
use crate::key::Key;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest sealed payload: a nonce and a tag around an empty ciphertext.
pub const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

/// Cipher context owning exactly one key.
///
/// The key never changes after construction, so a `Client` can be shared
/// across threads (`&Client` or `Arc<Client>`) without any locking.
#[derive(Clone, Debug)]
pub struct Client {
    key: Key,
}

impl Client {
    /// Create a client from a raw key.
    ///
    /// Only the length is checked. The caller is responsible for supplying
    /// a key drawn from a cryptographically secure source.
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidKey`] if `key` is not [`KEY_LEN`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, ShroudError> {
        Ok(Self {
            key: Key::from_slice(key)?,
        })
    }

    /// Seal `plaintext`, returning `nonce || ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::Randomness`] if the OS random source fails; no
    /// weaker source is ever substituted.
    /// Returns [`ShroudError::CipherInit`] on an internal AEAD error (should be
    /// unreachable with a validated key).
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, ShroudError> {
        let cipher = self.build_cipher()?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|_| ShroudError::Randomness)?;

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| ShroudError::CipherInit)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Open a payload produced by [`Client::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidSecret`] if `sealed` is shorter than a
    /// nonce or if authentication fails. A wrong key, a flipped bit and a
    /// truncated tag all produce the same error and no partial plaintext.
    pub fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, ShroudError> {
        if sealed.len() < NONCE_LEN {
            return Err(ShroudError::InvalidSecret);
        }
        let cipher = self.build_cipher()?;
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| ShroudError::InvalidSecret)
    }

    fn build_cipher(&self) -> Result<Aes256Gcm, ShroudError> {
        Aes256Gcm::new_from_slice(self.key.as_bytes()).map_err(|_| ShroudError::CipherInit)
    }
}

/// Generate a fresh random key from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`ShroudError::Randomness`] if the OS random source fails.
pub fn generate_key() -> Result<[u8; KEY_LEN], ShroudError> {
    let mut key = [0u8; KEY_LEN];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|_| ShroudError::Randomness)?;
    Ok(key)
}
