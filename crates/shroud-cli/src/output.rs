//! JSON documents printed on stdout by each command.

use serde::{Deserialize, Serialize};
use shroud::ShroudError;

// ---------------------------------------------------------------------------
// Success documents
// ---------------------------------------------------------------------------

/// Output of `shroud keygen`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeygenOutput {
    /// Fresh 32-byte key, base64 standard alphabet. Suitable for `SHROUD_KEY`.
    pub key: String,
}

/// Output of `shroud seal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealOutput {
    /// Printable token for storage.
    pub encrypted_value: String,
}

/// Output of `shroud open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOutput {
    /// The exposed value in its schema-erased form.
    pub value: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error document
// ---------------------------------------------------------------------------

/// Printed on stdout when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Short machine-readable error code (e.g. `"invalid_secret"`).
    pub code: String,
    /// Human-readable description. Never contains key material or plaintext.
    pub message: String,
}

impl ErrorOutput {
    /// Construct an [`ErrorOutput`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Map a command failure onto an error document.
    ///
    /// Library errors anywhere in the chain keep their stable code; anything
    /// else (configuration, I/O, malformed input JSON) is `"usage_error"`.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let code = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ShroudError>())
            .map_or("usage_error", |e| e.kind().code());
        Self::new(code, format!("{err:#}"))
    }
}

/// Print `value` as one line of JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
