//! Spending insight command implementation

use anyhow::Result;
use chrono::Utc;
use tally_core::{
    month_bounds, month_over_month, spending_summary, Config, Expense, InsightFormatter,
    InsightSource, SupabaseStore,
};

use super::text_client;

/// Summarize the current month and format insights
///
/// Fetches the previous month too so the month-over-month delta has data to
/// work with. With `--no-ai` (or no AI config) the built-in template is used.
pub async fn cmd_insights(store: &SupabaseStore, config: &Config, no_ai: bool) -> Result<()> {
    let today = Utc::now().date_naive();
    let (first, last) = month_bounds(today);
    let (prev_first, _) = month_bounds(first.pred_opt().unwrap());

    let history = store.list_expenses(Some((prev_first, last))).await?;

    let current: Vec<Expense> = history
        .iter()
        .filter(|e| e.date >= first)
        .cloned()
        .collect();
    let mut summary = spending_summary(&current);
    summary.month_over_month = month_over_month(&history, today);

    let client = if no_ai { None } else { text_client(config) };
    let formatter = InsightFormatter::new(client);

    if formatter.has_collaborator() {
        println!("✨ Generating insights...");
    }

    let insight = formatter.generate(&summary).await;

    println!();
    println!("{}", insight.text);
    println!();

    if let InsightSource::Generated { model } = insight.source {
        println!("   (generated by {})", model);
    }

    Ok(())
}
