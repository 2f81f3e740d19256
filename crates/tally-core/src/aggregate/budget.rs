//! Budget evaluation

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Budget, Category, Expense};

/// Budget health, recomputed from scratch on every evaluation
///
/// There is no hysteresis and no stored transition history: the state is a
/// pure function of the current percentage and threshold, so evaluating the
/// same inputs twice always agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    Good,
    Warning,
    Over,
}

impl BudgetHealth {
    /// Classify a spent percentage against an alert threshold
    ///
    /// Over at or past 100%, warning at or past `threshold * 100`, good
    /// below that.
    pub fn classify(percentage: f64, alert_threshold: f64) -> Self {
        if percentage >= 100.0 {
            Self::Over
        } else if percentage >= alert_threshold * 100.0 {
            Self::Warning
        } else {
            Self::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Over => "over",
        }
    }
}

impl std::fmt::Display for BudgetHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evaluated state of one budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: Option<Category>,
    pub budgeted: f64,
    pub spent: f64,
    /// Spent share of the budget. Left unclamped so overspend stays visible;
    /// use [`BudgetStatus::progress_percent`] for display bars.
    pub percentage: f64,
    /// Amount left, floored at zero
    pub remaining: f64,
    pub health: BudgetHealth,
}

impl BudgetStatus {
    /// Percentage clamped to 0..=100 for progress displays
    pub fn progress_percent(&self) -> f64 {
        self.percentage.min(100.0)
    }
}

/// Evaluate a budget against expenses from its period
///
/// The caller supplies records already limited to the budget's period (see
/// [`month_bounds`]); this function applies the category filter itself from
/// `budget.category`, where `None` means all spending counts. Fails with
/// [`Error::InvalidBudget`] when the budgeted amount is not positive.
pub fn evaluate_budget(budget: &Budget, expenses: &[Expense]) -> Result<BudgetStatus> {
    if budget.amount <= 0.0 {
        return Err(Error::InvalidBudget(format!(
            "budget amount must be positive, got {}",
            budget.amount
        )));
    }

    let spent: f64 = expenses
        .iter()
        .filter(|e| match budget.category {
            Some(category) => Category::parse_lossy(&e.category) == category,
            None => true,
        })
        .map(|e| e.amount)
        .sum();

    let percentage = spent / budget.amount * 100.0;

    Ok(BudgetStatus {
        category: budget.category,
        budgeted: budget.amount,
        spent,
        percentage,
        remaining: (budget.amount - spent).max(0.0),
        health: BudgetHealth::classify(percentage, budget.alert_threshold),
    })
}

/// First and last day of the calendar month containing `anchor`
pub fn month_bounds(anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1).unwrap_or(anchor);
    let next_first = if anchor.month() == 12 {
        NaiveDate::from_ymd_opt(anchor.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(anchor.year(), anchor.month() + 1, 1)
    };
    let last = next_first
        .and_then(|d| d.pred_opt())
        .unwrap_or(anchor);
    (first, last)
}
