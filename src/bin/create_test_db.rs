use std::{error::Error, path::Path, process::exit, sync::Arc};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use pennywise_rs::{
    feed::{AlwaysConfirm, NewTransaction, TransactionFeed},
    models::{AccountKind, NewAccount, NewExpense, NewIncome, NewProfile, NewRecurringTemplate,
        NewTransfer, RecurringKind},
    notify::LogNotifier,
    recurring::run_due_templates,
    stores::{AccountStore, ProfileStore, RecurringStore, sqlite::create_stores},
};

/// A utility for creating a test database populated with demo data.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_filter(filter::LevelFilter::INFO),
        )
        .init();

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;
    let mut stores = create_stores(connection)?;

    println!("Creating profile and accounts...");

    stores.profile.save(NewProfile {
        monthly_income: 4200.0,
        currency: "USD".to_string(),
    })?;

    let checking = stores.accounts.create(NewAccount {
        name: "Checking".to_string(),
        kind: AccountKind::BankAccount { balance: 2500.0 },
    })?;
    let daily_card = stores.accounts.create(NewAccount {
        name: "Daily card".to_string(),
        kind: AccountKind::DebitCard { balance: 350.0 },
    })?;
    stores.accounts.create(NewAccount {
        name: "Visa".to_string(),
        kind: AccountKind::CreditCard {
            credit_limit: 4000.0,
            billing_cycle_start: 5,
            billing_cycle_end: 4,
        },
    })?;

    println!("Creating transactions...");

    let mut feed = TransactionFeed::new(
        stores.expenses.clone(),
        stores.incomes.clone(),
        stores.transfers.clone(),
        Arc::new(LogNotifier),
        Arc::new(AlwaysConfirm),
    );

    let today = OffsetDateTime::now_utc().date();
    let days_ago = |days: i64| {
        today
            .checked_sub(Duration::days(days))
            .ok_or("date out of range")
    };

    for (days, amount, category) in [
        (2, 54.30, "groceries"),
        (5, 12.00, "coffee"),
        (9, 80.25, "groceries"),
        (12, 39.99, "entertainment"),
        (20, 110.00, "utilities"),
    ] {
        feed.create(NewTransaction::Expense(NewExpense::new(
            checking.id,
            amount,
            category,
            days_ago(days)?,
        )))?;
    }

    let mut salary = NewIncome::new(Some(checking.id), 4200.0, days_ago(14)?);
    salary.category = Some("salary".to_string());
    salary.description = Some("Monthly salary".to_string());
    feed.create(NewTransaction::Income(salary))?;

    feed.create(NewTransaction::Transfer(NewTransfer {
        from_account_id: checking.id,
        to_account_id: daily_card.id,
        amount: 200.0,
        date: days_ago(3)?,
        description: Some("Card top-up".to_string()),
    }))?;

    println!("Creating recurring templates...");

    stores.recurring.create(NewRecurringTemplate {
        day_of_month: 1,
        amount: 1200.0,
        account_id: Some(checking.id),
        category: Some("rent".to_string()),
        description: Some("Monthly rent".to_string()),
        kind: RecurringKind::Expense,
    })?;
    stores.recurring.create(NewRecurringTemplate {
        day_of_month: 25,
        amount: 150.0,
        account_id: Some(checking.id),
        category: Some("dividends".to_string()),
        description: None,
        kind: RecurringKind::Income,
    })?;

    let report = run_due_templates(
        &mut stores.recurring,
        &mut stores.expenses,
        &mut stores.incomes,
        today,
    )?;
    println!(
        "Materialised {} expense(s) and {} income(s) from recurring templates",
        report.expenses_created, report.incomes_created
    );

    println!(
        "Success! The transaction feed contains {} records.",
        feed.transactions().len()
    );

    Ok(())
}
