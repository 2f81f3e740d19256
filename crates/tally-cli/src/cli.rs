//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track spending from the terminal
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Expense tracker with budgets and spending insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ~/.config/tally/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account on the hosted store
    Signup {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign in and persist the session
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and clear the persisted session
    Logout,

    /// Show configuration, session, and collaborator status
    Status,

    /// Record an expense
    Add {
        /// Amount spent
        amount: f64,

        /// What the money went to
        description: String,

        /// Category: food, transport, shopping, entertainment, bills, health, other
        #[arg(short, long, default_value = "other")]
        category: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Manage expenses (list, delete)
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Spending reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Manage budgets (list, set, delete)
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Spending insights for the current month
    Insights {
        /// Skip the text generation backend and use the built-in template
        #[arg(long)]
        no_ai: bool,
    },

    /// Manage your profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Maximum rows to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print raw rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete an expense by id
    Delete {
        /// Expense id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Category breakdown for a period
    Spending {
        /// Period: this-month, last-month, last-30-days, all
        #[arg(short, long, default_value = "this-month")]
        period: String,
    },

    /// Spending totals over time
    Trends {
        /// Bucket size: day (last 7 days), week (last 8 weeks), or month (last 6 months)
        #[arg(short, long, default_value = "month")]
        unit: String,

        /// Number of buckets (overrides the unit's default window)
        #[arg(short, long)]
        window: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// List budgets with progress for the current month
    List,

    /// Create or replace a budget
    Set {
        /// Monthly amount
        #[arg(short, long)]
        amount: f64,

        /// Category to budget (omit for an overall budget)
        #[arg(short, long)]
        category: Option<String>,

        /// Alert threshold as a fraction (0.8 warns at 80%)
        #[arg(short, long, default_value = "0.8")]
        threshold: f64,
    },

    /// Delete a budget by id
    Delete {
        /// Budget id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the stored profile
    Show,

    /// Update profile fields
    Set {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Preferred currency code (e.g. USD)
        #[arg(long)]
        currency: Option<String>,

        /// Overall monthly budget amount
        #[arg(long)]
        monthly_budget: Option<f64>,
    },
}
