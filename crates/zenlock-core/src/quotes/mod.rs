//! Motivational quote collaborator.
//!
//! The provider surface is infallible by construction: `quote()` and
//! `tips()` always resolve, substituting fixed fallback values when the
//! remote call fails. The state machine never waits on either.

mod canned;
mod gemini;

pub use canned::CannedQuotes;
pub use gemini::{GeminiQuotes, DEFAULT_MODEL};

use async_trait::async_trait;

use crate::storage::Config;

/// Shown when the provider answers successfully but with empty text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "Stay focused. Stay disciplined.";
/// Shown when the provider call fails outright.
pub const ERROR_FALLBACK: &str = "The pain of discipline is far less than the pain of regret.";
/// Fixed 3-item tips list used whenever the remote tips call fails.
pub const FALLBACK_TIPS: [&str; 3] = [
    "Eliminate external noise",
    "Keep your workspace clean",
    "Breathe deeply",
];

/// Keyring entry name for the provider API key.
pub const API_KEY_ENTRY: &str = "gemini_api_key";
/// Environment variable consulted before the keyring.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Source of catalyst quotes and focus tips.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// A short motivational phrase for the given session context.
    /// Never fails; internal errors resolve to a fixed fallback phrase.
    async fn quote(&self, context: &str) -> String;

    /// Exactly three short deep-work tips; the fixed fallback list on failure.
    async fn tips(&self) -> Vec<String>;
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "zenlock";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Look up the provider API key: environment first, then the OS keyring.
pub fn api_key() -> Option<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.is_empty() {
            return Some(key);
        }
    }
    keyring_store::get(API_KEY_ENTRY).ok().flatten()
}

/// Build the configured provider: Gemini when quotes are enabled and a key
/// is available, the offline canned pool otherwise.
pub fn provider_from_environment(config: &Config) -> Box<dyn QuoteProvider> {
    if config.quotes.enabled {
        if let Some(key) = api_key() {
            return Box::new(GeminiQuotes::new(key, config.quotes.model.clone()));
        }
        tracing::debug!("no quote provider API key; using canned catalyst pool");
    }
    Box::new(CannedQuotes::new())
}
