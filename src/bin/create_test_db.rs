use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Date, Duration, OffsetDateTime};

use expense_tracker::{
    NewExpense, NewIncome, Session, initialize_db, log_expense, log_income, open_db, register,
    set_budget,
};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const BUDGETS: [(&str, f64); 5] = [
    ("Rent", 1200.0),
    ("Utilities", 180.0),
    ("Groceries", 400.0),
    ("Dining Out", 100.0),
    ("Subscriptions", 30.0),
];

/// (days ago, category, description, amount)
const EXPENSES: [(i64, &str, &str, f64); 9] = [
    (28, "Rent", "Monthly rent", 1200.0),
    (25, "Groceries", "Weekly shop", 92.35),
    (21, "Utilities", "Power bill", 134.20),
    (18, "Groceries", "Weekly shop", 88.10),
    (14, "Dining Out", "Dinner with friends", 64.50),
    (11, "Groceries", "Weekly shop", 101.75),
    (7, "Dining Out", "Lunch", 42.00),
    (4, "Subscriptions", "Music streaming", 15.99),
    (2, "Luxury Items", "Headphones", 249.00),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
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
    let conn = open_db(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user 'test' with the password 'test'...");
    let session = Session::new(register("test", "test", &conn)?);

    println!("Adding budgets, expenses and income...");
    for (category, amount) in BUDGETS {
        set_budget(&session, category, amount, &conn)?;
    }

    let today = OffsetDateTime::now_utc().date();
    let days_ago = |days: i64| -> Date { today - Duration::days(days) };

    for (days, category, description, amount) in EXPENSES {
        let expense = NewExpense {
            category: category.to_owned(),
            description: description.to_owned(),
            amount,
            date: days_ago(days),
        };
        log_expense(&session, expense, &conn)?;
    }

    for days in [28, 14] {
        let income = NewIncome {
            source: "Salary".to_owned(),
            amount: 2100.0,
            date: days_ago(days),
        };
        log_income(&session, income, &conn)?;
    }

    println!("Success!");

    Ok(())
}
