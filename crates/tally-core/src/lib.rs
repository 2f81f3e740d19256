//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Domain models (expenses, budgets, profiles, the category set)
//! - Aggregation engine (category totals, time series, budget status, summaries)
//! - Insight formatter with a deterministic template and optional AI generation
//! - Pluggable text generation backends (OpenAI-compatible servers, mock)
//! - Client for the hosted store (auth + row CRUD) with injectable session storage
//! - Configuration resolved once from file and environment

pub mod aggregate;
pub mod ai;
pub mod config;
pub mod error;
pub mod insight;
pub mod models;
pub mod store;

/// Test utilities including mock store and completions servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{
    category_totals, evaluate_budget, last_6_months, last_7_days, month_bounds,
    month_over_month, spending_summary, time_series, BucketUnit, BudgetHealth, BudgetStatus,
    CategoryTotal, SeriesPoint, SpendingSummary, TimeSeries,
};
pub use ai::{
    GenerationOptions, MockBackend, OpenAiBackend, TextGenBackend, TextGenClient, MOCK_COMPLETION,
};
pub use config::{AiConfig, Config, SessionConfig, SessionKind, StoreConfig};
pub use error::{Error, Result};
pub use insight::{build_prompt, render_template, Insight, InsightFormatter, InsightSource};
pub use models::{
    Budget, BudgetPeriod, Category, Expense, NewBudget, NewExpense, Profile, ProfileUpdate,
};
pub use store::{Session, SessionStore, SupabaseStore};
