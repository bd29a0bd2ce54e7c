//! Configuration loading and validation for the `shroud` CLI.
//!
//! Values are read from `SHROUD_`-prefixed environment variables. The key is
//! only required by commands that seal or open tokens.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use shroud::{Client, KEY_LEN};

/// Validated CLI configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base64 (standard alphabet) encoding of the 32-byte key, from `SHROUD_KEY`.
    #[serde(default)]
    pub key: Option<String>,

    /// Tracing log level (e.g. `"warn"`, `"debug"`), from `SHROUD_LOG_LEVEL`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("SHROUD"))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("SHROUD_LOG_LEVEL must not be empty");
        }
        Ok(())
    }

    /// Decode `SHROUD_KEY` and build a [`Client`] from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is absent, not base64, or not
    /// [`KEY_LEN`] bytes once decoded.
    pub fn client(&self) -> Result<Client> {
        let encoded = self
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .context("SHROUD_KEY is required; generate one with `shroud keygen`")?;

        let raw = STANDARD
            .decode(encoded)
            .context("SHROUD_KEY must be standard base64")?;
        if raw.len() != KEY_LEN {
            anyhow::bail!(
                "SHROUD_KEY must decode to {KEY_LEN} bytes, got {}",
                raw.len()
            );
        }
        Client::new(&raw).context("SHROUD_KEY was rejected")
    }
}
