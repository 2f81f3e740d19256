//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `auth` - Account commands (signup, login, logout)
//! - `budgets` - Budget management commands (list, set, delete)
//! - `core` - Shared utilities (config loading, store/client construction)
//! - `expenses` - Expense commands (add, list, delete)
//! - `insights` - Spending insight command
//! - `profile` - Profile commands (show, set)
//! - `reports` - Report generation commands
//! - `status` - Status command

pub mod auth;
pub mod budgets;
pub mod core;
pub mod expenses;
pub mod insights;
pub mod profile;
pub mod reports;
pub mod status;

// Re-export command functions for main.rs
pub use auth::*;
pub use budgets::*;
pub use core::*;
pub use expenses::*;
pub use insights::*;
pub use profile::*;
pub use reports::*;
pub use status::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
