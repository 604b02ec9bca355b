//! API key management handler
//!
//! Stores, inspects, and clears the Gemini API key in the OS keyring.
//! The environment variable always takes precedence at resolution time;
//! `status` makes the effective source visible.

use colored::Colorize;
use rustyline::DefaultEditor;

use crate::cli::AuthCommand;
use crate::error::Result;
use crate::providers::credentials::{
    clear_api_key, key_source, mask_key, store_api_key, KeySource, API_KEY_ENV,
};

/// Run an auth subcommand
pub fn run_auth(command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Set { api_key } => {
            let key = match api_key {
                Some(key) => key,
                None => {
                    let mut rl = DefaultEditor::new()?;
                    rl.readline("API key: ")?
                }
            };
            store_api_key(&key)?;
            println!("API key stored ({})", mask_key(key.trim()));
            Ok(())
        }
        AuthCommand::Status => {
            match key_source()? {
                Some(KeySource::Environment) => {
                    let key = std::env::var(API_KEY_ENV).unwrap_or_default();
                    println!(
                        "API key from {} ({})",
                        KeySource::Environment,
                        mask_key(key.trim())
                    );
                }
                Some(KeySource::Keyring) => {
                    println!("API key from {}", KeySource::Keyring);
                }
                None => {
                    println!(
                        "{}",
                        format!(
                            "No API key configured; set {} or run `nexus auth set`",
                            API_KEY_ENV
                        )
                        .yellow()
                    );
                }
            }
            Ok(())
        }
        AuthCommand::Clear => {
            clear_api_key()?;
            println!("API key cleared");
            Ok(())
        }
    }
}
