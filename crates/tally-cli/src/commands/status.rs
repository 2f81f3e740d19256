//! Status command implementation

use std::path::Path;

use anyhow::Result;
use tally_core::config::default_config_path;
use tally_core::store::default_session_path;
use tally_core::{SessionKind, TextGenBackend};

use super::{load_config, open_store, text_client};

/// Show configuration, session, and collaborator status
pub async fn cmd_status(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    println!();
    println!("📊 Tally Status");
    println!("   ─────────────────────────────────────────────────────────────");

    match config_path {
        Some(path) => println!("   Config: {}", path.display()),
        None => match default_config_path() {
            Some(path) if path.exists() => println!("   Config: {}", path.display()),
            Some(path) => println!("   Config: {} (not present)", path.display()),
            None => println!("   Config: (no config directory)"),
        },
    }

    // Store half
    match config.store {
        Some(ref store_config) => {
            println!("   Store: {}", store_config.url);

            let store = open_store(&config)?;
            match store.current_session()? {
                Some(session) => {
                    println!("   🔑 Session: signed in (user {})", session.user_id);
                    if session.needs_refresh() {
                        println!("      Token expires soon; it will refresh on next use.");
                    }
                }
                None => println!("   Session: not signed in (run 'tally login')"),
            }
        }
        None => {
            println!("   ❌ Store: not configured");
            println!("      Set SUPABASE_URL and SUPABASE_ANON_KEY, or add a [store] section.");
        }
    }

    if config.session.kind == SessionKind::File {
        if let Some(path) = config.session.path.clone().or_else(default_session_path) {
            println!("   Session file: {}", path.display());
        }
    }

    // AI half
    println!();
    match text_client(&config) {
        Some(client) => {
            println!("   AI: {} ({})", client.model(), client.host());
            print!("   Checking collaborator availability... ");
            if client.health_check().await {
                println!("✅ Connected");
            } else {
                println!("❌ Failed");
                println!("      Insights will fall back to the built-in template.");
            }
        }
        None => {
            println!("   AI: not configured (insights use the built-in template)");
            println!("      Set OPENAI_API_KEY and OPENAI_BASE_URL to enable generation.");
        }
    }

    println!();
    Ok(())
}
