//! Provider abstraction and implementations
//!
//! This module exposes the ChatProvider trait, the Gemini implementation,
//! the non-throwing [`send_message`] boundary, and the credential
//! resolution helpers.

pub mod base;
pub mod credentials;
pub mod gemini;

pub use base::{send_message, ChatProvider, ModelReply, EMPTY_REPLY_PLACEHOLDER};
pub use gemini::{GeminiProvider, KnownModel, KNOWN_MODELS};

use crate::config::ProviderConfig;
use crate::error::Result;

/// Creates the configured provider with resolved credentials
///
/// Resolves the API key (environment, then keyring) and constructs an
/// explicit [`GeminiProvider`] handle.
///
/// # Errors
///
/// Returns an error when no API key is available or client construction
/// fails.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn ChatProvider>> {
    let api_key = credentials::resolve_api_key()?;
    let provider = GeminiProvider::new(config, api_key)?;
    Ok(Box::new(provider))
}
