//! Aggregation engine
//!
//! Pure transformations from raw expense rows into derived views: category
//! totals, fixed-window time series, budget status, and the spending summary
//! consumed by the insight formatter. Everything here is deterministic and
//! does no I/O; empty input always produces an empty (zeroed) view, never an
//! error.

mod budget;
mod categories;
mod series;
mod summary;

pub use budget::{evaluate_budget, month_bounds, BudgetHealth, BudgetStatus};
pub use categories::{category_totals, CategoryTotal};
pub use series::{last_6_months, last_7_days, time_series, BucketUnit, SeriesPoint, TimeSeries};
pub use summary::{month_over_month, spending_summary, SpendingSummary};
