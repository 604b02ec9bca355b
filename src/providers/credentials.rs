//! API key acquisition and storage
//!
//! The credential-acquisition contract, in order:
//!
//! 1. the `GEMINI_API_KEY` environment variable, when set and non-empty;
//! 2. the OS keyring entry written by `nexus auth set` (Keychain on macOS,
//!    Secret Service on Linux, Credential Manager on Windows).
//!
//! There is no ambient global client state: the resolved key is handed to
//! an explicitly constructed provider.

use keyring::Entry;

use crate::error::{NexusError, Result};

/// Environment variable consulted before the keyring
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const KEYRING_SERVICE: &str = "nexus";
const KEYRING_USER: &str = "gemini-api-key";

/// Where a resolved API key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// `GEMINI_API_KEY` environment variable
    Environment,
    /// OS keyring entry
    Keyring,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => write!(f, "environment ({})", API_KEY_ENV),
            Self::Keyring => write!(f, "OS keyring"),
        }
    }
}

fn entry() -> Result<Entry> {
    Ok(Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
}

/// Resolves the API key from the environment, then the keyring
///
/// # Errors
///
/// Returns `NexusError::MissingCredentials` when neither source holds a
/// key, or a keyring error when the credential store is unavailable.
pub fn resolve_api_key() -> Result<String> {
    if let Some(key) = env_key() {
        tracing::debug!("Using API key from {}", API_KEY_ENV);
        return Ok(key);
    }

    match entry()?.get_password() {
        Ok(key) => {
            tracing::debug!("Using API key from OS keyring");
            Ok(key)
        }
        Err(keyring::Error::NoEntry) => Err(NexusError::MissingCredentials(format!(
            "set {} or run `nexus auth set`",
            API_KEY_ENV
        ))
        .into()),
        Err(e) => Err(NexusError::Keyring(e).into()),
    }
}

/// Reports which source currently holds a key, if any
pub fn key_source() -> Result<Option<KeySource>> {
    if env_key().is_some() {
        return Ok(Some(KeySource::Environment));
    }
    match entry()?.get_password() {
        Ok(_) => Ok(Some(KeySource::Keyring)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(NexusError::Keyring(e).into()),
    }
}

/// Stores the API key in the OS keyring
pub fn store_api_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(NexusError::Config("API key must not be empty".to_string()).into());
    }
    entry()?.set_password(key.trim())?;
    tracing::info!("API key stored in OS keyring");
    Ok(())
}

/// Removes the API key from the OS keyring
///
/// A missing entry is not an error.
pub fn clear_api_key() -> Result<()> {
    match entry()?.delete_password() {
        Ok(()) => {
            tracing::info!("API key removed from OS keyring");
            Ok(())
        }
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(NexusError::Keyring(e).into()),
    }
}

fn env_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

/// Masks a key for status display, keeping only a short prefix
///
/// # Examples
///
/// ```
/// use nexus::providers::credentials::mask_key;
///
/// assert_eq!(mask_key("AIzaSyExample123"), "AIza…(16 chars)");
/// assert_eq!(mask_key("ab"), "…(2 chars)");
/// ```
pub fn mask_key(key: &str) -> String {
    if key.len() <= 4 {
        format!("…({} chars)", key.len())
    } else {
        format!("{}…({} chars)", &key[..4], key.len())
    }
}
