use std::io::{self, BufRead, Write};

use clap::Subcommand;
use zenlock_core::quotes::{self, keyring_store};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the quote provider API key in the OS keyring
    SetKey {
        /// Key value; prompted on stdin when omitted
        key: Option<String>,
    },
    /// Show whether a key is configured, and where it comes from
    Status,
    /// Remove the stored API key
    Clear,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetKey { key } => {
            let key = match key {
                Some(k) => k,
                None => prompt("Gemini API key: ")?,
            };
            if key.is_empty() {
                return Err("empty API key".into());
            }
            keyring_store::set(quotes::API_KEY_ENTRY, &key)?;
            println!("API key stored in the OS keyring.");
        }
        AuthAction::Status => {
            if std::env::var(quotes::API_KEY_ENV).is_ok_and(|k| !k.is_empty()) {
                println!("API key: set via {}", quotes::API_KEY_ENV);
            } else if keyring_store::get(quotes::API_KEY_ENTRY)?.is_some() {
                println!("API key: stored in the OS keyring");
            } else {
                println!("API key: not configured (canned quotes in use)");
            }
        }
        AuthAction::Clear => {
            keyring_store::delete(quotes::API_KEY_ENTRY)?;
            println!("API key removed.");
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String, Box<dyn std::error::Error>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
