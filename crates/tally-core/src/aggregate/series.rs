//! Fixed-window spending series

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Expense;

/// Bucket granularity for a spending series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketUnit {
    Day,
    Week,
    Month,
}

impl BucketUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl std::str::FromStr for BucketUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(format!("Unknown bucket unit: {}", s)),
        }
    }
}

impl std::fmt::Display for BucketUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One bucket of a spending series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub total: f64,
}

/// A fixed-window spending series, oldest bucket first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    pub unit: BucketUnit,
    pub points: Vec<SeriesPoint>,
}

/// Bucket expenses into a trailing window ending at `anchor`
///
/// Always returns exactly `window` points in chronological order, zero-filled
/// where nothing was spent; an empty input produces a window of zeros.
/// Expenses outside the window are ignored. The anchor is a parameter so
/// tests and reports can pin the window; callers wanting "ending today" pass
/// `Utc::now().date_naive()`.
///
/// Bucket identity and labels per unit:
/// - `Day`: calendar date, labeled with the short weekday name ("Mon")
/// - `Week`: Monday-started week, labeled with the week start ("Mar 04")
/// - `Month`: calendar month, labeled with the short month name ("Mar")
pub fn time_series(
    expenses: &[Expense],
    window: usize,
    unit: BucketUnit,
    anchor: NaiveDate,
) -> TimeSeries {
    // Canonical start date of each bucket in the window, oldest first
    let starts: Vec<NaiveDate> = (0..window)
        .rev()
        .map(|back| bucket_start_back(anchor, unit, back as i32))
        .collect();

    let mut totals = vec![0.0_f64; window];
    for expense in expenses {
        let key = bucket_start(expense.date, unit);
        if let Some(i) = starts.iter().position(|s| *s == key) {
            totals[i] += expense.amount;
        }
    }

    let points = starts
        .iter()
        .zip(totals)
        .map(|(start, total)| SeriesPoint {
            label: bucket_label(*start, unit),
            total,
        })
        .collect();

    TimeSeries { unit, points }
}

/// The last 7 days ending at `anchor`, one bucket per day
pub fn last_7_days(expenses: &[Expense], anchor: NaiveDate) -> TimeSeries {
    time_series(expenses, 7, BucketUnit::Day, anchor)
}

/// The last 6 calendar months ending at the month containing `anchor`
pub fn last_6_months(expenses: &[Expense], anchor: NaiveDate) -> TimeSeries {
    time_series(expenses, 6, BucketUnit::Month, anchor)
}

/// Canonical start date of the bucket containing `date`
fn bucket_start(date: NaiveDate, unit: BucketUnit) -> NaiveDate {
    match unit {
        BucketUnit::Day => date,
        BucketUnit::Week => {
            date - Duration::days(date.weekday().num_days_from_monday() as i64)
        }
        BucketUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
    }
}

/// Start date of the bucket `back` buckets before the one containing `anchor`
fn bucket_start_back(anchor: NaiveDate, unit: BucketUnit, back: i32) -> NaiveDate {
    match unit {
        BucketUnit::Day => anchor - Duration::days(back as i64),
        BucketUnit::Week => bucket_start(anchor, unit) - Duration::weeks(back as i64),
        BucketUnit::Month => {
            let months = anchor.year() * 12 + anchor.month() as i32 - 1 - back;
            let year = months.div_euclid(12);
            let month = months.rem_euclid(12) as u32 + 1;
            NaiveDate::from_ymd_opt(year, month, 1)
                .unwrap_or_else(|| bucket_start(anchor, BucketUnit::Month))
        }
    }
}

fn bucket_label(start: NaiveDate, unit: BucketUnit) -> String {
    match unit {
        BucketUnit::Day => start.format("%a").to_string(),
        BucketUnit::Week => start.format("%b %d").to_string(),
        BucketUnit::Month => start.format("%b").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense_on(date: NaiveDate, amount: f64) -> Expense {
        Expense {
            id: format!("e-{}", date),
            user_id: "user-1".to_string(),
            amount,
            description: "test".to_string(),
            category: "food".to_string(),
            date,
            created_at: Utc::now(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_input_still_fills_window() {
        let series = time_series(&[], 7, BucketUnit::Day, day(2024, 3, 10));
        assert_eq!(series.points.len(), 7);
        assert!(series.points.iter().all(|p| p.total == 0.0));
    }

    #[test]
    fn test_daily_window_ends_at_anchor() {
        // 2024-03-10 is a Sunday
        let anchor = day(2024, 3, 10);
        let expenses = vec![
            expense_on(anchor, 5.0),
            expense_on(day(2024, 3, 4), 3.0),  // Monday, oldest bucket
            expense_on(day(2024, 3, 3), 99.0), // outside the window
        ];

        let series = last_7_days(&expenses, anchor);
        assert_eq!(series.points.len(), 7);
        assert_eq!(series.points[0].label, "Mon");
        assert_eq!(series.points[0].total, 3.0);
        assert_eq!(series.points[6].label, "Sun");
        assert_eq!(series.points[6].total, 5.0);
        let sum: f64 = series.points.iter().map(|p| p.total).sum();
        assert_eq!(sum, 8.0);
    }

    #[test]
    fn test_daily_buckets_are_chronological() {
        let series = time_series(&[], 3, BucketUnit::Day, day(2024, 3, 10));
        // Fri, Sat, Sun
        assert_eq!(series.points[0].label, "Fri");
        assert_eq!(series.points[1].label, "Sat");
        assert_eq!(series.points[2].label, "Sun");
    }

    #[test]
    fn test_monthly_window_crosses_year_boundary() {
        let anchor = day(2024, 2, 15);
        let expenses = vec![
            expense_on(day(2023, 9, 1), 10.0),  // oldest bucket (Sep)
            expense_on(day(2023, 12, 25), 20.0),
            expense_on(day(2024, 2, 1), 30.0),
            expense_on(day(2023, 8, 31), 99.0), // outside the window
        ];

        let series = last_6_months(&expenses, anchor);
        assert_eq!(series.points.len(), 6);
        let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["Sep", "Oct", "Nov", "Dec", "Jan", "Feb"]);
        assert_eq!(series.points[0].total, 10.0);
        assert_eq!(series.points[3].total, 20.0);
        assert_eq!(series.points[5].total, 30.0);
    }

    #[test]
    fn test_monthly_bucket_merges_whole_month() {
        let anchor = day(2024, 3, 31);
        let expenses = vec![
            expense_on(day(2024, 3, 1), 1.0),
            expense_on(day(2024, 3, 15), 2.0),
            expense_on(day(2024, 3, 31), 4.0),
        ];

        let series = time_series(&expenses, 1, BucketUnit::Month, anchor);
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].label, "Mar");
        assert_eq!(series.points[0].total, 7.0);
    }

    #[test]
    fn test_weekly_buckets_align_to_monday() {
        // 2024-03-13 is a Wednesday; its week starts Mon 2024-03-11
        let anchor = day(2024, 3, 13);
        let expenses = vec![
            expense_on(day(2024, 3, 11), 5.0), // same week, Monday
            expense_on(day(2024, 3, 17), 6.0), // same week, Sunday after anchor
            expense_on(day(2024, 3, 10), 7.0), // previous week, Sunday
        ];

        let series = time_series(&expenses, 2, BucketUnit::Week, anchor);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].label, "Mar 04");
        assert_eq!(series.points[0].total, 7.0);
        assert_eq!(series.points[1].label, "Mar 11");
        assert_eq!(series.points[1].total, 11.0);
    }

    #[test]
    fn test_bucket_unit_round_trip() {
        assert_eq!("day".parse::<BucketUnit>().unwrap(), BucketUnit::Day);
        assert_eq!("WEEKLY".parse::<BucketUnit>().unwrap(), BucketUnit::Week);
        assert_eq!("month".parse::<BucketUnit>().unwrap(), BucketUnit::Month);
        assert!("year".parse::<BucketUnit>().is_err());
    }
}
