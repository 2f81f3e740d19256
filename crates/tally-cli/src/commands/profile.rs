//! Profile command implementations (show, set)

use anyhow::Result;
use tally_core::{ProfileUpdate, SupabaseStore};

pub async fn cmd_profile_show(store: &SupabaseStore) -> Result<()> {
    let profile = store.fetch_profile().await?;

    println!();
    println!("👤 Profile");
    println!("   ─────────────────────────────");

    match profile {
        Some(profile) => {
            println!("   Name: {}", profile.full_name.as_deref().unwrap_or("(not set)"));
            println!("   Currency: {}", profile.currency);
            match profile.monthly_budget {
                Some(amount) => println!("   Monthly budget: ${:.2}", amount),
                None => println!("   Monthly budget: (not set)"),
            }
        }
        None => {
            println!("   No profile yet. Create one with:");
            println!("     tally profile set --name \"Your Name\"");
        }
    }

    Ok(())
}

pub async fn cmd_profile_set(
    store: &SupabaseStore,
    name: Option<&str>,
    currency: Option<&str>,
    monthly_budget: Option<f64>,
) -> Result<()> {
    if name.is_none() && currency.is_none() && monthly_budget.is_none() {
        anyhow::bail!("Nothing to update. Pass --name, --currency, or --monthly-budget.");
    }

    if let Some(amount) = monthly_budget {
        if amount <= 0.0 {
            anyhow::bail!("Monthly budget must be positive, got {}", amount);
        }
    }

    let mut update = ProfileUpdate::new(&store.user_id().await?);
    if let Some(name) = name {
        update = update.with_full_name(name);
    }
    if let Some(currency) = currency {
        update = update.with_currency(&currency.to_uppercase());
    }
    if let Some(amount) = monthly_budget {
        update = update.with_monthly_budget(amount);
    }

    let profile = store.upsert_profile(&update).await?;

    println!("✅ Profile updated");
    if let Some(name) = profile.full_name {
        println!("   Name: {}", name);
    }
    println!("   Currency: {}", profile.currency);
    if let Some(amount) = profile.monthly_budget {
        println!("   Monthly budget: ${:.2}", amount);
    }

    Ok(())
}
