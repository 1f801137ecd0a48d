mod config;

pub use config::{Config, GuardConfig, QuotesConfig, SessionDefaults};

use std::path::PathBuf;

/// Returns `~/.config/zenlock[-dev]/` based on ZENLOCK_ENV.
///
/// Set ZENLOCK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ZENLOCK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("zenlock-dev")
    } else {
        base_dir.join("zenlock")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
