//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default budget alert threshold (warn at 80% of the budgeted amount)
pub const DEFAULT_ALERT_THRESHOLD: f64 = 0.8;

/// Expense categories
///
/// The category set is closed: stored rows keep whatever string was entered,
/// but every derived view groups on this enum. Strings that don't match a
/// known category fold into `Other` via [`Category::parse_lossy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Health,
    Other,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 7] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Entertainment,
        Self::Bills,
        Self::Health,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Bills => "bills",
            Self::Health => "health",
            Self::Other => "other",
        }
    }

    /// Parse a stored category string, folding unknown or empty values
    /// into `Other`. Matching is case-insensitive and whitespace-tolerant.
    pub fn parse_lossy(s: &str) -> Self {
        s.trim().parse().unwrap_or(Self::Other)
    }

    /// Material community icon name for this category
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "car",
            Self::Shopping => "shopping",
            Self::Entertainment => "movie",
            Self::Bills => "receipt",
            Self::Health => "hospital-box",
            Self::Other => "dots-horizontal-circle",
        }
    }

    /// Display color (hex) for this category
    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "#F59E0B",
            Self::Transport => "#3B82F6",
            Self::Shopping => "#EC4899",
            Self::Entertainment => "#8B5CF6",
            Self::Bills => "#EF4444",
            Self::Health => "#10B981",
            Self::Other => "#6B7280",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "shopping" => Ok(Self::Shopping),
            "entertainment" => Ok(Self::Entertainment),
            "bills" => Ok(Self::Bills),
            "health" => Ok(Self::Health),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored expense row
///
/// `category` is kept as the raw stored string; aggregation normalizes it
/// with [`Category::parse_lossy`] so historical rows with odd casing still
/// group correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting or updating an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub user_id: String,
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
}

/// Budget periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored budget row
///
/// `category: None` is the overall budget covering all spending in the
/// period; a specific category limits the budget to that slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category: Option<Category>,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub alert_threshold: f64,
}

/// Payload for inserting or updating a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudget {
    pub user_id: String,
    pub category: Option<Category>,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub alert_threshold: f64,
}

impl NewBudget {
    /// Create a monthly budget with the default alert threshold
    pub fn monthly(user_id: &str, category: Option<Category>, amount: f64) -> Self {
        Self {
            user_id: user_id.to_string(),
            category,
            amount,
            period: BudgetPeriod::Monthly,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

/// A user profile row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub monthly_budget: Option<f64>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Partial profile upsert payload
///
/// Only the fields that are `Some` are written; the row is created if it
/// doesn't exist yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<f64>,
}

impl ProfileUpdate {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            full_name: None,
            avatar_url: None,
            currency: None,
            monthly_budget: None,
        }
    }

    pub fn with_full_name(mut self, name: &str) -> Self {
        self.full_name = Some(name.to_string());
        self
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = Some(currency.to_string());
        self
    }

    pub fn with_monthly_budget(mut self, amount: f64) -> Self {
        self.monthly_budget = Some(amount);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_as_str() {
        assert_eq!(Category::Food.as_str(), "food");
        assert_eq!(Category::Transport.as_str(), "transport");
        assert_eq!(Category::Shopping.as_str(), "shopping");
        assert_eq!(Category::Entertainment.as_str(), "entertainment");
        assert_eq!(Category::Bills.as_str(), "bills");
        assert_eq!(Category::Health.as_str(), "health");
        assert_eq!(Category::Other.as_str(), "other");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("FOOD".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("Health".parse::<Category>().unwrap(), Category::Health);
        assert!("groceries".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_parse_lossy() {
        assert_eq!(Category::parse_lossy("Food"), Category::Food);
        assert_eq!(Category::parse_lossy("  transport  "), Category::Transport);
        assert_eq!(Category::parse_lossy("groceries"), Category::Other);
        assert_eq!(Category::parse_lossy(""), Category::Other);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, r#""entertainment""#);

        let parsed: Category = serde_json::from_str(r#""bills""#).unwrap();
        assert_eq!(parsed, Category::Bills);
    }

    #[test]
    fn test_category_icon_and_color_cover_all() {
        for category in Category::ALL {
            assert!(!category.icon().is_empty());
            assert!(category.color().starts_with('#'));
            assert_eq!(category.color().len(), 7);
        }
        assert_eq!(Category::Other.icon(), "dots-horizontal-circle");
        assert_eq!(Category::Other.color(), "#6B7280");
    }

    #[test]
    fn test_budget_period_round_trip() {
        assert_eq!(BudgetPeriod::Monthly.as_str(), "monthly");
        assert_eq!(
            "MONTHLY".parse::<BudgetPeriod>().unwrap(),
            BudgetPeriod::Monthly
        );
        assert!("weekly".parse::<BudgetPeriod>().is_err());
    }

    #[test]
    fn test_new_budget_monthly_defaults() {
        let budget = NewBudget::monthly("user-1", Some(Category::Food), 400.0);
        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert_eq!(budget.alert_threshold, DEFAULT_ALERT_THRESHOLD);
    }

    #[test]
    fn test_expense_serde() {
        let expense = Expense {
            id: "e-1".to_string(),
            user_id: "user-1".to_string(),
            amount: 42.50,
            description: "Groceries".to_string(),
            category: "Food".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&expense).unwrap();
        assert!(json.contains("2024-03-15"));

        let parsed: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.amount, 42.50);
        assert_eq!(parsed.category, "Food");
    }

    #[test]
    fn test_profile_update_skips_absent_fields() {
        let update = ProfileUpdate::new("user-1").with_currency("EUR");
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("currency"));
        assert!(!json.contains("full_name"));
        assert!(!json.contains("monthly_budget"));
    }
}
