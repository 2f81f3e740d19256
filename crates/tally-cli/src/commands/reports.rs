//! Report command implementations

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tally_core::{
    category_totals, last_6_months, last_7_days, month_bounds, time_series, BucketUnit,
    SupabaseStore,
};

use super::truncate;

/// Resolve a period string to (from_date, to_date)
pub fn resolve_period(period: &str) -> Result<(NaiveDate, NaiveDate)> {
    let today = Utc::now().date_naive();

    match period.to_lowercase().as_str() {
        "this-month" => {
            let (first, _) = month_bounds(today);
            Ok((first, today))
        }
        "last-month" => {
            let (first, _) = month_bounds(today);
            let prev = first.pred_opt().unwrap();
            Ok(month_bounds(prev))
        }
        "last-30-days" => {
            let from = today - chrono::Duration::days(30);
            Ok((from, today))
        }
        "all" => {
            let from = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            Ok((from, today))
        }
        _ => anyhow::bail!(
            "Unknown period: {}. Available: this-month, last-month, last-30-days, all",
            period
        ),
    }
}

pub async fn cmd_report_spending(
    store: &SupabaseStore,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<()> {
    let expenses = store.list_expenses(Some((from, to))).await?;
    let totals = category_totals(&expenses);

    println!();
    println!("📊 Spending Summary");
    println!("   Period: {} to {}", from, to);
    println!("   ─────────────────────────────────────────────────────────────");

    if totals.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    let total: f64 = totals.iter().map(|c| c.amount).sum();
    println!("   Total: ${:.2}", total);
    println!();
    println!("   {:25} │ {:>10} │ {:>6}", "Category", "Amount", "%");
    println!("   ──────────────────────────┼────────────┼────────");

    for entry in &totals {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}%",
            truncate(entry.category.as_str(), 25),
            entry.amount,
            entry.percentage
        );
    }

    Ok(())
}

pub async fn cmd_report_trends(
    store: &SupabaseStore,
    unit: &str,
    window: Option<usize>,
) -> Result<()> {
    let unit: BucketUnit = unit.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    if window == Some(0) {
        anyhow::bail!("Window must be at least 1 bucket");
    }

    let today = Utc::now().date_naive();
    let expenses = store.list_expenses(None).await?;

    let series = match (unit, window) {
        (BucketUnit::Day, None) => last_7_days(&expenses, today),
        (BucketUnit::Month, None) => last_6_months(&expenses, today),
        (BucketUnit::Week, None) => time_series(&expenses, 8, BucketUnit::Week, today),
        (unit, Some(window)) => time_series(&expenses, window, unit, today),
    };

    println!();
    println!("📈 Spending Trends ({})", series.unit.as_str());
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:12} │ {:>10}", "Period", "Amount");
    println!("   ─────────────┼────────────");

    for point in &series.points {
        println!("   {:12} │ {:>10.2}", point.label, point.total);
    }

    let total: f64 = series.points.iter().map(|p| p.total).sum();
    let average = total / series.points.len() as f64;

    println!("   ─────────────┼────────────");
    println!("   {:12} │ {:>10.2}", "Total", total);
    println!("   {:12} │ {:>10.2}", "Average", average);

    Ok(())
}
