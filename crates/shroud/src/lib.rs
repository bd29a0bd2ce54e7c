//! Encrypt-then-serialize secret wrapper.
//!
//! A [`Client`] owns one 32-byte AES-256 key. [`Client::shroud`] turns any
//! serde-serializable value into a [`Secret`] whose
//! [`encrypted_value`](Secret::encrypted_value) is a base64 token safe to
//! store in logs, databases or configuration. [`Secret::expose`] turns it
//! back into a native value.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use shroud::Client;
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct User {
//!     username: String,
//!     api_key: String,
//! }
//!
//! let key = shroud::generate_key()?;
//! let client = Client::new(&key)?;
//!
//! let user = User { username: "john_doe".into(), api_key: "secret-api-key".into() };
//! let token = client.shroud(&user)?.into_encrypted_value();
//!
//! // Later, from storage:
//! let restored: User = client.create_from_encrypted(&token)?.expose()?;
//! assert_eq!(restored, user);
//! # Ok::<(), shroud::ShroudError>(())
//! ```
//!
//! The library never logs and never retries. Every failure comes back as a
//! [`ShroudError`].

pub mod cipher;
pub mod codec;
pub mod error;
mod key;
pub mod secret;

pub use cipher::{generate_key, Client, KEY_LEN};
pub use error::{ErrorKind, ShroudError};
pub use secret::Secret;
