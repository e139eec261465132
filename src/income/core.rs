//! The income model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::{Session, UserID},
    database_id::DatabaseId,
};

/// Money earned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    /// The ID of the income entry.
    pub id: DatabaseId,
    /// The user who earned the income.
    pub user_id: UserID,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    /// The amount earned in dollars.
    pub amount: f64,
    /// When the money was received.
    pub date: Date,
}

/// The user-entered fields of an income entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIncome {
    /// See [Income::source].
    pub source: String,
    /// See [Income::amount].
    pub amount: f64,
    /// See [Income::date].
    pub date: Date,
}

/// Record income for the session's user.
///
/// # Errors
/// This function will return a [Error::SqlError] if the row could not be inserted.
pub fn log_income(
    session: &Session,
    income: NewIncome,
    connection: &Connection,
) -> Result<Income, Error> {
    let income = connection
        .prepare(
            "INSERT INTO income (user_id, source, amount, date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, source, amount, date",
        )?
        .query_row(
            (
                session.user_id().as_i64(),
                income.source,
                income.amount,
                income.date,
            ),
            map_income_row,
        )?;

    tracing::debug!("logged income {} for user {}", income.id, income.user_id);

    Ok(income)
}

/// All of the session user's income, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if the query failed.
pub fn get_income(session: &Session, connection: &Connection) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, source, amount, date
             FROM income
             WHERE user_id = ?1
             ORDER BY date ASC, id ASC",
        )?
        .query_map([session.user_id().as_i64()], map_income_row)?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}

/// Create the income table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS income (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                source TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_income_row(row: &Row) -> Result<Income, rusqlite::Error> {
    Ok(Income {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        source: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
    })
}

#[cfg(test)]
mod income_tests {
    use time::macros::date;

    use crate::test_utils::{get_test_connection, test_session};

    use super::{NewIncome, get_income, log_income};

    fn salary(amount: f64) -> NewIncome {
        NewIncome {
            source: "Salary".to_owned(),
            amount,
            date: date!(2025 - 03 - 15),
        }
    }

    #[test]
    fn log_income_returns_stored_income() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);

        let income = log_income(&session, salary(4200.0), &conn).unwrap();

        assert_eq!(income.user_id, session.user_id());
        assert_eq!(income.source, "Salary");
        assert_eq!(income.amount, 4200.0);
        assert_eq!(income.date, date!(2025 - 03 - 15));
    }

    #[test]
    fn get_income_returns_every_entry() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);
        log_income(&session, salary(100.0), &conn).unwrap();
        log_income(&session, salary(200.0), &conn).unwrap();

        let total: f64 = get_income(&session, &conn)
            .unwrap()
            .iter()
            .map(|income| income.amount)
            .sum();

        assert_eq!(total, 300.0);
    }

    #[test]
    fn get_income_only_returns_own_income() {
        let conn = get_test_connection();
        let alice = test_session("alice", &conn);
        let bob = test_session("bob", &conn);
        log_income(&alice, salary(100.0), &conn).unwrap();

        assert_eq!(get_income(&bob, &conn), Ok(vec![]));
    }
}
