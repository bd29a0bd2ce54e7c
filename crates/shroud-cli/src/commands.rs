//! Command implementations.
//!
//! Each command returns its output document; printing happens in
//! [`run`], so the commands themselves can be exercised in tests.

use std::io::Read;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use shroud::Client;
use tracing::{debug, info};

use crate::cli::Commands;
use crate::config::Config;
use crate::output::{print_json, KeygenOutput, OpenOutput, SealOutput};

/// Dispatch `command` and print its output.
pub fn run(command: &Commands, cfg: &Config) -> Result<()> {
    match command {
        Commands::Keygen => print_json(&keygen()?),
        Commands::Seal { json } => {
            let input = match json {
                Some(inline) => inline.clone(),
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read JSON from stdin")?;
                    buf
                }
            };
            print_json(&seal(&cfg.client()?, &input)?)
        }
        Commands::Open { token } => print_json(&open(&cfg.client()?, token)?),
        Commands::Demo => demo(&cfg.client()?),
    }
}

/// Generate a fresh key.
pub fn keygen() -> Result<KeygenOutput> {
    let key = shroud::generate_key().context("failed to generate key")?;
    info!("generated key");
    Ok(KeygenOutput {
        key: STANDARD.encode(key),
    })
}

/// Seal a JSON document.
pub fn seal(client: &Client, input: &str) -> Result<SealOutput> {
    let value: serde_json::Value =
        serde_json::from_str(input.trim()).context("input is not a JSON document")?;
    let secret = client.shroud(&value).context("failed to seal value")?;
    info!(
        input_bytes = input.len(),
        token_bytes = secret.encrypted_value().len(),
        "sealed value"
    );
    Ok(SealOutput {
        encrypted_value: secret.into_encrypted_value(),
    })
}

/// Open a token into its schema-erased value.
pub fn open(client: &Client, token: &str) -> Result<OpenOutput> {
    let value: serde_json::Value = client
        .open_token(token.trim())
        .context("failed to open token")?;
    info!(token_bytes = token.len(), "opened token");
    Ok(OpenOutput { value })
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct DemoUser {
    username: String,
    api_key: String,
}

fn demo(client: &Client) -> Result<()> {
    let string_secret = client.shroud("my-sensitive-data")?;
    let exposed: String = string_secret.expose()?;
    println!("String value: {exposed}");

    let user = DemoUser {
        username: "john_doe".into(),
        api_key: "secret-api-key".into(),
    };
    let stored = client.shroud(&user)?.into_encrypted_value();
    println!("Encrypted value: {stored}");

    let retrieved = client.create_from_encrypted(&stored)?;
    let mut restored = DemoUser {
        username: String::new(),
        api_key: String::new(),
    };
    retrieved.expose_into(Some(&mut restored))?;
    let round_trip_ok = restored == user;
    debug!(round_trip_ok, "demo round trip finished");
    println!("Retrieved user: {restored:?}");
    Ok(())
}
