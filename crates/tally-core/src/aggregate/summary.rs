//! Spending summary assembly

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Expense};

use super::categories::{category_totals, CategoryTotal};

/// Aggregate view of a set of expenses
///
/// This is the payload the insight formatter renders, and what the AI prompt
/// is built from. Empty input produces the zero summary rather than an error,
/// with no top category and every numeric field at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total: f64,
    pub transaction_count: usize,
    pub average_transaction: f64,
    /// Per-category totals, largest first
    pub by_category: Vec<CategoryTotal>,
    /// Category with the highest spend, None for empty input
    pub top_category: Option<Category>,
    /// Percentage change vs the previous period, when known
    pub month_over_month: Option<f64>,
}

/// Build a summary over a set of expenses
///
/// Total is conserved: the category amounts sum to the record total. The
/// average is 0 when there are no records.
pub fn spending_summary(expenses: &[Expense]) -> SpendingSummary {
    let by_category = category_totals(expenses);
    let total: f64 = by_category.iter().map(|t| t.amount).sum();
    let transaction_count = expenses.len();
    let average_transaction = if transaction_count > 0 {
        total / transaction_count as f64
    } else {
        0.0
    };
    let top_category = by_category.first().map(|t| t.category);

    SpendingSummary {
        total,
        transaction_count,
        average_transaction,
        by_category,
        top_category,
        month_over_month: None,
    }
}

/// Percentage change of the anchor month's total vs the month before
///
/// Returns None when the previous month has no spending; a delta against
/// zero has no meaningful value, so callers render "no comparison" instead.
pub fn month_over_month(expenses: &[Expense], anchor: NaiveDate) -> Option<f64> {
    let current: f64 = month_total(expenses, anchor.year(), anchor.month());

    let (prev_year, prev_month) = if anchor.month() == 1 {
        (anchor.year() - 1, 12)
    } else {
        (anchor.year(), anchor.month() - 1)
    };
    let previous = month_total(expenses, prev_year, prev_month);

    if previous > 0.0 {
        Some((current - previous) / previous * 100.0)
    } else {
        None
    }
}

fn month_total(expenses: &[Expense], year: i32, month: u32) -> f64 {
    expenses
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .map(|e| e.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense_on(date: NaiveDate, category: &str, amount: f64) -> Expense {
        Expense {
            id: format!("e-{}-{}", date, amount),
            user_id: "user-1".to_string(),
            amount,
            description: category.to_string(),
            category: category.to_string(),
            date,
            created_at: Utc::now(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_input_zero_summary() {
        let summary = spending_summary(&[]);
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.transaction_count, 0);
        assert_eq!(summary.average_transaction, 0.0);
        assert!(summary.by_category.is_empty());
        assert!(summary.top_category.is_none());
        assert!(summary.month_over_month.is_none());
    }

    #[test]
    fn test_summary_totals_and_average() {
        let expenses = vec![
            expense_on(day(2024, 3, 1), "food", 50.0),
            expense_on(day(2024, 3, 2), "Food", 30.0),
            expense_on(day(2024, 3, 3), "transport", 20.0),
        ];

        let summary = spending_summary(&expenses);
        assert_eq!(summary.total, 100.0);
        assert_eq!(summary.transaction_count, 3);
        assert!((summary.average_transaction - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.top_category, Some(Category::Food));

        let category_sum: f64 = summary.by_category.iter().map(|t| t.amount).sum();
        assert!((category_sum - summary.total).abs() < 1e-9);
    }

    #[test]
    fn test_month_over_month_increase() {
        let expenses = vec![
            expense_on(day(2024, 2, 10), "food", 100.0),
            expense_on(day(2024, 3, 5), "food", 150.0),
        ];

        let delta = month_over_month(&expenses, day(2024, 3, 20)).unwrap();
        assert!((delta - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_month_over_month_decrease_across_year() {
        let expenses = vec![
            expense_on(day(2023, 12, 10), "bills", 200.0),
            expense_on(day(2024, 1, 5), "bills", 100.0),
        ];

        let delta = month_over_month(&expenses, day(2024, 1, 20)).unwrap();
        assert!((delta - (-50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_month_over_month_none_without_previous_month() {
        let expenses = vec![expense_on(day(2024, 3, 5), "food", 150.0)];
        assert!(month_over_month(&expenses, day(2024, 3, 20)).is_none());
        assert!(month_over_month(&[], day(2024, 3, 20)).is_none());
    }
}
