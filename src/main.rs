mod config;
mod db;
mod models;
mod operations;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use db::ledger::Ledger;
use operations::add::parse_new_transaction;
use operations::history::render_table;
use operations::remove::parse_transaction_id;
use operations::summary::{parse_date_filter, run_summary};

#[derive(Parser)]
#[command(name = "ledger", about = "Terminal expense ledger")]
struct Args {
    /// Path to the SQLite database file.
    #[arg(long = "db", default_value = config::DEFAULT_DB_FILE)]
    db: PathBuf,
}

pub enum UserCommand {
    Add,
    History,
    Summary,
    Delete,
    Exit,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let ledger = Ledger::open(args.db).expect("Failed to open the ledger database");

    println!("Welcome to the expense ledger!");
    loop {
        println!("Please enter a command (add, history, summary, delete, exit):");

        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let command = match check_for_command(input.trim()) {
            Some(command) => command,
            None => {
                if !input.trim().is_empty() {
                    println!("Unknown command: {}", input.trim());
                }
                continue;
            }
        };

        match command {
            UserCommand::Add => {
                println!(
                    "Add command selected. Please enter the expense in the format:\ndate(YYYY-MM-DD), description, amount, category\nCategories: {}",
                    config::EXPENSE_CATEGORIES.join(", ")
                );
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match parse_new_transaction(&input) {
                    Ok(tx) => {
                        if ledger.add(&tx) {
                            println!("Expense recorded successfully!");
                        } else {
                            println!("Failed to record the expense. Please try again.");
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommand::History => match ledger.list() {
                Some(transactions) if transactions.is_empty() => {
                    println!("No expenses recorded yet.");
                }
                Some(transactions) => {
                    println!("{}", render_table(&transactions));
                }
                None => println!("Failed to load the expense history."),
            },
            UserCommand::Summary => {
                println!("Summary command selected. Enter a date (YYYY-MM-DD) to filter, or leave empty for all dates:");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match parse_date_filter(&input) {
                    Ok(filter) => {
                        if let Err(e) = run_summary(&ledger, filter) {
                            println!("Failed to render the summary: {}", e);
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommand::Delete => {
                println!("Delete command selected. Provide the expense ID to delete:");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match parse_transaction_id(&input) {
                    Ok(id) => {
                        if ledger.delete(id) {
                            println!("Expense deleted successfully.");
                        } else {
                            println!("Failed to delete the expense.");
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommand::Exit => {
                println!("Exiting the application.");
                break;
            }
        }
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> Option<UserCommand> {
    match input {
        "add" => Some(UserCommand::Add),
        "history" => Some(UserCommand::History),
        "summary" => Some(UserCommand::Summary),
        "delete" => Some(UserCommand::Delete),
        "exit" => Some(UserCommand::Exit),
        _ => None,
    }
}
