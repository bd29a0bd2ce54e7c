//! [`Secret`]: an encrypted, printable token bound to the [`Client`] that can
//! open it.
//!
//! # Token format
//!
//! ```text
//! base64-standard(nonce || ciphertext || tag)
//! ```
//!
//! The token is the only form meant for storage or transmission. Its layout
//! is opaque to callers.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Serialize, Serializer};

use crate::cipher::Client;
use crate::codec;
use crate::error::ShroudError;

/// An encrypted value together with a borrow of the client that sealed it.
///
/// The borrow ties a `Secret` to its [`Client`]: it cannot outlive the
/// client, and exposing it needs no key argument. Exposing is read-only and
/// can be repeated any number of times.
#[derive(Clone)]
pub struct Secret<'c> {
    encrypted: String,
    client: &'c Client,
}

impl Client {
    /// Serialize `value` canonically, seal it, and wrap the token.
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::Serialization`] if `value` has no canonical
    /// representation, [`ShroudError::EmptyValue`] if the encoding is empty,
    /// and propagates [`Client::encrypt`] failures.
    pub fn shroud<T: Serialize + ?Sized>(&self, value: &T) -> Result<Secret<'_>, ShroudError> {
        let plaintext = codec::to_canonical(value)?;
        let sealed = self.encrypt(&plaintext)?;
        Ok(Secret {
            encrypted: STANDARD.encode(sealed),
            client: self,
        })
    }

    /// Wrap a previously issued token without decrypting it.
    ///
    /// Only the base64 layer is checked here. Truncation, tampering and a
    /// wrong key surface later, from [`Secret::expose`].
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::EmptyValue`] if `token` is empty and
    /// [`ShroudError::InvalidSecret`] if it is not standard base64.
    pub fn create_from_encrypted(&self, token: &str) -> Result<Secret<'_>, ShroudError> {
        if token.is_empty() {
            return Err(ShroudError::EmptyValue);
        }
        STANDARD
            .decode(token)
            .map_err(|_| ShroudError::InvalidSecret)?;
        Ok(Secret {
            encrypted: token.to_owned(),
            client: self,
        })
    }

    /// Open a stored token straight into `T`.
    ///
    /// Shorthand for [`create_from_encrypted`](Self::create_from_encrypted)
    /// followed by [`Secret::expose`].
    pub fn open_token<T: DeserializeOwned>(&self, token: &str) -> Result<T, ShroudError> {
        self.create_from_encrypted(token)?.expose()
    }
}

impl<'c> Secret<'c> {
    /// Decrypt and deserialize the wrapped value.
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidSecret`] if the token cannot be decoded
    /// or fails authentication, and [`ShroudError::Deserialization`] if the
    /// plaintext does not fit `T` (e.g. a number exposed as a `String`).
    pub fn expose<T: DeserializeOwned>(&self) -> Result<T, ShroudError> {
        let sealed = STANDARD
            .decode(&self.encrypted)
            .map_err(|_| ShroudError::InvalidSecret)?;
        let plaintext = self.client.decrypt(&sealed)?;
        codec::from_canonical(&plaintext)
    }

    /// Decrypt the wrapped value into an existing destination.
    ///
    /// `dest` is only written on success.
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidArgument`] if `dest` is `None`, before
    /// any decryption happens. Otherwise fails as [`Secret::expose`].
    pub fn expose_into<T: DeserializeOwned>(&self, dest: Option<&mut T>) -> Result<(), ShroudError> {
        let dest = dest.ok_or(ShroudError::InvalidArgument(
            "expose destination must not be absent",
        ))?;
        *dest = self.expose()?;
        Ok(())
    }

    /// The printable token, for storage or transmission.
    pub fn encrypted_value(&self) -> &str {
        &self.encrypted
    }

    /// Consume the secret, keeping only its token.
    pub fn into_encrypted_value(self) -> String {
        self.encrypted
    }

    /// The client this secret is bound to.
    pub fn client(&self) -> &'c Client {
        self.client
    }
}

impl fmt::Display for Secret<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encrypted)
    }
}

impl fmt::Debug for Secret<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("encrypted", &self.encrypted)
            .finish_non_exhaustive()
    }
}

/// A `Secret` serializes as its token, so it can sit inside a larger
/// document headed for a log line or a database row.
impl Serialize for Secret<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encrypted)
    }
}
