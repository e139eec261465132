//! The budget model and its database queries.
//!
//! A user has at most one budget per category. Setting a budget for a
//! category that already has one replaces the amount.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{Session, UserID},
    database_id::DatabaseId,
};

/// How much a user plans to spend in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: DatabaseId,
    /// The user who set the budget.
    pub user_id: UserID,
    /// The category the budget covers, at most one budget per user.
    pub category: String,
    /// The planned spending in dollars.
    pub amount: f64,
}

/// Set the session user's budget for `category` to `amount`.
///
/// Creates the budget if the category has none, otherwise overwrites the
/// amount. The insert and update happen in a single statement.
///
/// # Errors
/// This function will return a [Error::SqlError] if the statement failed.
pub fn set_budget(
    session: &Session,
    category: &str,
    amount: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "INSERT INTO budget (user_id, category, amount)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, category) DO UPDATE SET amount = excluded.amount
             RETURNING id, user_id, category, amount",
        )?
        .query_row(
            (session.user_id().as_i64(), category, amount),
            map_budget_row,
        )?;

    tracing::debug!(
        "set {} budget to {} for user {}",
        budget.category,
        budget.amount,
        budget.user_id
    );

    Ok(budget)
}

/// The session user's budgets, ordered by category.
///
/// # Errors
/// This function will return a [Error::SqlError] if the query failed.
pub fn get_budgets(session: &Session, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount
             FROM budget
             WHERE user_id = ?1
             ORDER BY category ASC",
        )?
        .query_map([session.user_id().as_i64()], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                UNIQUE(user_id, category),
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
    })
}

#[cfg(test)]
mod budget_tests {
    use crate::test_utils::{get_test_connection, test_session};

    use super::{get_budgets, set_budget};

    #[test]
    fn set_budget_creates_budget() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);

        let budget = set_budget(&session, "Rent", 1000.0, &conn).unwrap();

        assert_eq!(budget.user_id, session.user_id());
        assert_eq!(budget.category, "Rent");
        assert_eq!(budget.amount, 1000.0);
    }

    #[test]
    fn setting_budget_twice_keeps_one_row_with_last_amount() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);

        let first = set_budget(&session, "Groceries", 300.0, &conn).unwrap();
        let second = set_budget(&session, "Groceries", 350.0, &conn).unwrap();

        assert_eq!(first.id, second.id);
        let budgets = get_budgets(&session, &conn).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 350.0);
    }

    #[test]
    fn same_category_is_separate_per_user() {
        let conn = get_test_connection();
        let alice = test_session("alice", &conn);
        let bob = test_session("bob", &conn);

        set_budget(&alice, "Rent", 1000.0, &conn).unwrap();
        set_budget(&bob, "Rent", 800.0, &conn).unwrap();

        assert_eq!(get_budgets(&alice, &conn).unwrap()[0].amount, 1000.0);
        assert_eq!(get_budgets(&bob, &conn).unwrap()[0].amount, 800.0);
    }

    #[test]
    fn get_budgets_orders_by_category() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);
        set_budget(&session, "Utilities", 150.0, &conn).unwrap();
        set_budget(&session, "Groceries", 300.0, &conn).unwrap();
        set_budget(&session, "Rent", 1000.0, &conn).unwrap();

        let categories = get_budgets(&session, &conn)
            .unwrap()
            .into_iter()
            .map(|budget| budget.category)
            .collect::<Vec<_>>();

        assert_eq!(categories, vec!["Groceries", "Rent", "Utilities"]);
    }
}
