//! The expense model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::{Session, UserID},
    database_id::DatabaseId,
};

/// Money spent by a user on something in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: DatabaseId,
    /// The user who logged the expense.
    pub user_id: UserID,
    /// The category the expense counts against, e.g. "Groceries".
    pub category: String,
    /// What the money was spent on.
    pub description: String,
    /// The amount spent in dollars.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
}

/// The user-entered fields of an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    /// See [Expense::category].
    pub category: String,
    /// See [Expense::description].
    pub description: String,
    /// See [Expense::amount].
    pub amount: f64,
    /// See [Expense::date].
    pub date: Date,
}

/// Record an expense for the session's user.
///
/// The category, amount and date are stored as given.
///
/// # Errors
/// This function will return a [Error::SqlError] if the row could not be inserted.
pub fn log_expense(
    session: &Session,
    expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expenses (user_id, category, description, amount, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, category, description, amount, date",
        )?
        .query_row(
            (
                session.user_id().as_i64(),
                expense.category,
                expense.description,
                expense.amount,
                expense.date,
            ),
            map_expense_row,
        )?;

    tracing::debug!("logged expense {} for user {}", expense.id, expense.user_id);

    Ok(expense)
}

/// All of the session user's expenses, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if the query failed.
pub fn get_expenses(session: &Session, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, description, amount, date
             FROM expenses
             WHERE user_id = ?1
             ORDER BY date ASC, id ASC",
        )?
        .query_map([session.user_id().as_i64()], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Create the expenses table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // The report sums expenses per category for one user.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_user_category ON expenses(user_id, category);",
        (),
    )?;

    Ok(())
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
    })
}
