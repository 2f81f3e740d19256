//! Category totals

use serde::{Deserialize, Serialize};

use crate::models::{Category, Expense};

/// Spending total for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
    /// Share of the grand total, 0..=100. All zeros when the total is zero.
    pub percentage: f64,
}

/// Group expenses by normalized category and total them
///
/// Category strings are folded through [`Category::parse_lossy`], so "Food",
/// "food", and " FOOD " land in the same bucket and unknown strings land in
/// `Other`. The result is sorted by amount descending; ties keep the order
/// in which the categories first appeared in the input. Percentages are
/// computed against the grand total and are all 0 when the total is 0, so
/// callers never see a division artifact.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut order: Vec<Category> = Vec::new();
    let mut sums: Vec<f64> = Vec::new();

    for expense in expenses {
        let category = Category::parse_lossy(&expense.category);
        match order.iter().position(|c| *c == category) {
            Some(i) => sums[i] += expense.amount,
            None => {
                order.push(category);
                sums.push(expense.amount);
            }
        }
    }

    let total: f64 = sums.iter().sum();

    let mut totals: Vec<CategoryTotal> = order
        .into_iter()
        .zip(sums)
        .map(|(category, amount)| CategoryTotal {
            category,
            amount,
            percentage: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    // Stable sort keeps first-seen order for equal amounts
    totals.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));

    totals
}
