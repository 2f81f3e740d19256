//! Tally CLI - Terminal expense tracker
//!
//! Usage:
//!   tally login --email you@example.com    Sign in to the hosted store
//!   tally add 12.50 "Lunch" -c food        Record an expense
//!   tally report spending                  Category breakdown for this month
//!   tally insights                         Spending insights (AI when configured)

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Signup { email, password } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            commands::cmd_signup(&store, &email, password.as_deref()).await
        }
        Commands::Login { email, password } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            commands::cmd_login(&store, &email, password.as_deref()).await
        }
        Commands::Logout => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            commands::cmd_logout(&store).await
        }
        Commands::Status => commands::cmd_status(cli.config.as_deref()).await,
        Commands::Add {
            amount,
            description,
            category,
            date,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            commands::cmd_add(&store, amount, &description, &category, date.as_deref()).await
        }
        Commands::Expenses { action } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            match action {
                None => commands::cmd_expenses_list(&store, None, None, 20, false).await,
                Some(ExpensesAction::List {
                    from,
                    to,
                    limit,
                    json,
                }) => {
                    commands::cmd_expenses_list(&store, from.as_deref(), to.as_deref(), limit, json)
                        .await
                }
                Some(ExpensesAction::Delete { id }) => {
                    commands::cmd_expenses_delete(&store, &id).await
                }
            }
        }
        Commands::Report { report_type } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            match report_type {
                ReportType::Spending { period } => {
                    let (from, to) = commands::resolve_period(&period)?;
                    commands::cmd_report_spending(&store, from, to).await
                }
                ReportType::Trends { unit, window } => {
                    commands::cmd_report_trends(&store, &unit, window).await
                }
            }
        }
        Commands::Budget { action } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            match action {
                None | Some(BudgetAction::List) => commands::cmd_budget_list(&store).await,
                Some(BudgetAction::Set {
                    amount,
                    category,
                    threshold,
                }) => commands::cmd_budget_set(&store, amount, category.as_deref(), threshold).await,
                Some(BudgetAction::Delete { id }) => commands::cmd_budget_delete(&store, &id).await,
            }
        }
        Commands::Insights { no_ai } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            commands::cmd_insights(&store, &config, no_ai).await
        }
        Commands::Profile { action } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let store = commands::open_store(&config)?;
            match action {
                None | Some(ProfileAction::Show) => commands::cmd_profile_show(&store).await,
                Some(ProfileAction::Set {
                    name,
                    currency,
                    monthly_budget,
                }) => {
                    commands::cmd_profile_set(
                        &store,
                        name.as_deref(),
                        currency.as_deref(),
                        monthly_budget,
                    )
                    .await
                }
            }
        }
    }
}
