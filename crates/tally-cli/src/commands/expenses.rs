//! Expense command implementations (add, list, delete)

use anyhow::Result;
use chrono::Utc;
use tally_core::{Category, NewExpense, SupabaseStore};

use super::{parse_date, truncate};

pub async fn cmd_add(
    store: &SupabaseStore,
    amount: f64,
    description: &str,
    category: &str,
    date: Option<&str>,
) -> Result<()> {
    if amount <= 0.0 {
        anyhow::bail!("Amount must be positive, got {}", amount);
    }

    let category: Category = category.parse().map_err(|e: String| {
        anyhow::anyhow!(
            "{} (available: food, transport, shopping, entertainment, bills, health, other)",
            e
        )
    })?;

    let date = match date {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };

    let expense = store
        .insert_expense(&NewExpense {
            user_id: store.user_id().await?,
            amount,
            description: description.to_string(),
            category,
            date,
        })
        .await?;

    println!();
    println!("✅ Recorded ${:.2} on {}", expense.amount, expense.date);
    println!("   {} ({})", expense.description, category);
    println!("   Id: {}", expense.id);

    Ok(())
}

pub async fn cmd_expenses_list(
    store: &SupabaseStore,
    from: Option<&str>,
    to: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let range = match (from, to) {
        (Some(from), Some(to)) => Some((parse_date(from)?, parse_date(to)?)),
        (Some(from), None) => Some((parse_date(from)?, Utc::now().date_naive())),
        (None, Some(to)) => anyhow::bail!("--to requires --from (got --to {})", to),
        (None, None) => None,
    };

    let expenses = store.list_expenses(range).await?;

    if json {
        let rows: Vec<_> = expenses.iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  tally add 12.50 \"Lunch\" -c food");
        return Ok(());
    }

    println!();
    println!("🧾 Expenses");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:10} │ {:>10} │ {:15} │ {}",
        "Date", "Amount", "Category", "Description"
    );
    println!("   ───────────┼────────────┼─────────────────┼──────────────────");

    for expense in expenses.iter().take(limit) {
        println!(
            "   {:10} │ {:>10.2} │ {:15} │ {}",
            expense.date.to_string(),
            expense.amount,
            truncate(&expense.category, 15),
            truncate(&expense.description, 30)
        );
    }

    let shown = expenses.len().min(limit);
    let total: f64 = expenses.iter().take(limit).map(|e| e.amount).sum();
    println!("   ───────────┼────────────┼─────────────────┼──────────────────");
    println!("   {:10} │ {:>10.2} │", format!("({} rows)", shown), total);

    if expenses.len() > limit {
        println!();
        println!("   Showing {} of {}. Use --limit to see more.", limit, expenses.len());
    }

    Ok(())
}

pub async fn cmd_expenses_delete(store: &SupabaseStore, id: &str) -> Result<()> {
    store.delete_expense(id).await?;
    println!("✅ Deleted expense {}", id);
    Ok(())
}
