//! Budget command implementations (list, set, delete)

use anyhow::Result;
use chrono::Utc;
use tally_core::{evaluate_budget, month_bounds, BudgetHealth, Category, NewBudget, SupabaseStore};

pub async fn cmd_budget_list(store: &SupabaseStore) -> Result<()> {
    let budgets = store.list_budgets().await?;

    if budgets.is_empty() {
        println!("No budgets set. Create one with:");
        println!("  tally budget set --amount 500 --category food");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let (first, last) = month_bounds(today);
    let expenses = store.list_expenses(Some((first, last))).await?;

    println!();
    println!("💰 Budgets ({} to {})", first, last);
    println!("   ─────────────────────────────────────────────────────────────");

    for budget in &budgets {
        let label = budget
            .category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "overall".to_string());

        match evaluate_budget(budget, &expenses) {
            Ok(status) => {
                println!(
                    "   {} {:15} {} {:>5.1}%",
                    health_icon(status.health),
                    label,
                    progress_bar(status.progress_percent(), 20),
                    status.percentage
                );
                println!(
                    "      ${:.2} of ${:.2} spent, ${:.2} remaining",
                    status.spent, status.budgeted, status.remaining
                );
            }
            Err(e) => {
                println!("   ❌ {:15} {}", label, e);
            }
        }
        println!();
    }

    Ok(())
}

pub async fn cmd_budget_set(
    store: &SupabaseStore,
    amount: f64,
    category: Option<&str>,
    threshold: f64,
) -> Result<()> {
    if amount <= 0.0 {
        anyhow::bail!("Budget amount must be positive, got {}", amount);
    }
    if threshold <= 0.0 || threshold > 1.0 {
        anyhow::bail!(
            "Alert threshold must be a fraction between 0 and 1, got {}",
            threshold
        );
    }

    let category = category
        .map(|s| {
            s.parse::<Category>().map_err(|e: String| {
                anyhow::anyhow!(
                    "{} (available: food, transport, shopping, entertainment, bills, health, other)",
                    e
                )
            })
        })
        .transpose()?;

    let mut new_budget = NewBudget::monthly(&store.user_id().await?, category, amount);
    new_budget.alert_threshold = threshold;

    // Replace an existing budget for the same scope instead of stacking
    let existing = store
        .list_budgets()
        .await?
        .into_iter()
        .find(|b| b.category == category);

    let label = category
        .map(|c| c.to_string())
        .unwrap_or_else(|| "overall".to_string());

    match existing {
        Some(budget) => {
            store.update_budget(&budget.id, &new_budget).await?;
            println!(
                "✅ Updated {} budget: ${:.2}/month (warns at {:.0}%)",
                label,
                amount,
                threshold * 100.0
            );
        }
        None => {
            store.insert_budget(&new_budget).await?;
            println!(
                "✅ Set {} budget: ${:.2}/month (warns at {:.0}%)",
                label,
                amount,
                threshold * 100.0
            );
        }
    }

    Ok(())
}

pub async fn cmd_budget_delete(store: &SupabaseStore, id: &str) -> Result<()> {
    store.delete_budget(id).await?;
    println!("✅ Deleted budget {}", id);
    Ok(())
}

/// Icon for a budget health state
pub fn health_icon(health: BudgetHealth) -> &'static str {
    match health {
        BudgetHealth::Good => "✅",
        BudgetHealth::Warning => "⚠️ ",
        BudgetHealth::Over => "❌",
    }
}

/// Render a fixed-width progress bar for a 0..=100 percentage
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
