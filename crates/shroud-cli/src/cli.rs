//! Command-line definitions for the `shroud` binary.

use clap::{Parser, Subcommand};

/// Seal structured values into encrypted tokens and open them again.
///
/// The key is read from `SHROUD_KEY` (base64 of 32 bytes).
#[derive(Debug, Parser)]
#[command(name = "shroud", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a fresh random key suitable for `SHROUD_KEY`.
    Keygen,

    /// Encrypt a JSON document into a token.
    Seal {
        /// JSON document to seal. Read from stdin when omitted.
        json: Option<String>,
    },

    /// Decrypt a token and print the JSON document inside it.
    Open {
        /// Token previously printed by `seal`.
        token: String,
    },

    /// Walk through sealing, storing and restoring a value.
    Demo,
}
