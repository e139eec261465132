//! Opens the application database, creates the schema and hands out scoped
//! access to the shared connection.

use std::{path::Path, sync::Mutex};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, budget::create_budget_table, expense::create_expense_table,
    income::create_income_table,
};

/// Open the SQLite database at `path`, creating the file if needed.
///
/// # Errors
///
/// Returns [Error::StoreUnavailable] if the file cannot be opened.
pub fn open(path: impl AsRef<Path>) -> Result<Connection, Error> {
    let path = path.as_ref();

    Connection::open(path).map_err(|error| {
        tracing::error!("could not open the database at {path:?}: {error}");
        Error::StoreUnavailable(error.to_string())
    })
}

/// Create the users, expenses, income and budget tables if they do not exist.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
///
/// Returns [Error::StoreUnavailable] if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    initialize_tables(connection).map_err(|error| {
        tracing::error!("could not initialize the database: {error}");
        Error::StoreUnavailable(error.to_string())
    })
}

fn initialize_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    // Has no effect inside a transaction, so it must be set first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_income_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()
}

/// Run `operation` with exclusive access to the shared database connection.
///
/// The lock is released as soon as `operation` returns, whether it succeeded
/// or not.
///
/// # Errors
///
/// Returns [Error::DatabaseLockError] if the lock is poisoned, otherwise
/// whatever `operation` returns.
pub fn with_connection<T>(
    db_connection: &Mutex<Connection>,
    operation: impl FnOnce(&Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    operation(&connection)
}
