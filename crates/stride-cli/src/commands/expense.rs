use std::path::Path;

use serde::Serialize;
use stride_core::models::Expense;

use crate::cli::ExpenseCommands;
use crate::commands::common::{
    format_amount, format_date, open_service, parse_amount, parse_date, print_json,
    resolve_record, short_id, sync_if_configured, sync_marker,
};
use crate::error::CliError;
use crate::profile::CliProfile;

pub async fn run(
    command: ExpenseCommands,
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    match command {
        ExpenseCommands::Add {
            amount,
            category,
            description,
            date,
        } => add(&amount, &category, description, date.as_deref(), db_path, profile).await,
        ExpenseCommands::List { json } => list(json, db_path, profile).await,
        ExpenseCommands::Rm { id } => remove(&id, db_path, profile).await,
    }
}

async fn add(
    amount: &str,
    category: &str,
    description: Option<String>,
    date: Option<&str>,
    db_path: &Path,
    profile: &CliProfile,
) -> Result<(), CliError> {
    let amount_cents = parse_amount(amount)?;
    let category = category.trim();
    if category.is_empty() {
        return Err(CliError::EmptyTitle);
    }

    let service = open_service(db_path, profile).await?;
    let owner = profile.owner_id.clone().ok_or(CliError::NotSignedIn)?;

    let mut expense = Expense::new(owner, amount_cents, category);
    expense.description = description;
    if let Some(date) = date {
        expense.incurred_on = parse_date(date)?;
    }

    service.create(expense.clone()).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", expense.id);
    Ok(())
}

#[derive(Debug, Serialize)]
struct ExpenseListItem {
    id: String,
    amount: String,
    amount_cents: i64,
    category: String,
    description: Option<String>,
    incurred_on: String,
    synced: bool,
}

async fn list(json: bool, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let expenses: Vec<Expense> = service.list().await?;

    if json {
        let items = expenses
            .iter()
            .map(|expense| ExpenseListItem {
                id: expense.id.to_string(),
                amount: format_amount(expense.amount_cents),
                amount_cents: expense.amount_cents,
                category: expense.category.clone(),
                description: expense.description.clone(),
                incurred_on: format_date(expense.incurred_on),
                synced: expense.synced,
            })
            .collect::<Vec<_>>();
        return print_json(&items);
    }

    for expense in &expenses {
        let description = expense.description.as_deref().unwrap_or("");
        println!(
            "{}{} {}  {:>10}  {:<16}  {description}",
            short_id(expense.id),
            sync_marker(expense.synced),
            format_date(expense.incurred_on),
            format_amount(expense.amount_cents),
            expense.category,
        );
    }
    Ok(())
}

async fn remove(id: &str, db_path: &Path, profile: &CliProfile) -> Result<(), CliError> {
    let service = open_service(db_path, profile).await?;
    let expense: Expense = resolve_record(&service, id).await?;

    service.delete::<Expense>(expense.id).await?;
    sync_if_configured(&service, profile).await?;

    println!("{}", expense.id);
    Ok(())
}
