//! Shared command utilities (config loading, store and client construction)

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{Config, SessionStore, SupabaseStore, TextGenClient};

/// Load configuration, resolving defaults, file, and environment once
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load_from(path).context("Failed to load configuration")
}

/// Open the hosted store from configuration
pub fn open_store(config: &Config) -> Result<SupabaseStore> {
    let store_config = config.store.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "Store not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY, \
             or add a [store] section to the config file."
        )
    })?;
    let sessions = SessionStore::from_config(&config.session)?;
    tracing::debug!(host = %store_config.url, "Using hosted store");
    Ok(SupabaseStore::new(store_config, sessions))
}

/// Build the optional text generation client from configuration
pub fn text_client(config: &Config) -> Option<TextGenClient> {
    TextGenClient::from_config(config.ai.as_ref())
}

/// Prompt on stdout and read one trimmed line from stdin
pub fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}
