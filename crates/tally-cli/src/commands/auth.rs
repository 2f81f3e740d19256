//! Account command implementations (signup, login, logout)

use anyhow::Result;
use tally_core::SupabaseStore;

use super::read_line;

pub async fn cmd_signup(store: &SupabaseStore, email: &str, password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => read_line("Choose a password: ")?,
    };
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let session = store.sign_up(email, &password).await?;

    println!();
    println!("✅ Account created for {}", email);
    println!("   User id: {}", session.user_id);
    println!("   You are signed in.");

    Ok(())
}

pub async fn cmd_login(store: &SupabaseStore, email: &str, password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => read_line("Password: ")?,
    };

    let session = store.sign_in(email, &password).await?;

    println!();
    println!("✅ Signed in as {}", email);
    println!("   User id: {}", session.user_id);

    Ok(())
}

pub async fn cmd_logout(store: &SupabaseStore) -> Result<()> {
    if store.current_session()?.is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    store.sign_out().await?;
    println!("✅ Signed out. Session cleared.");

    Ok(())
}
