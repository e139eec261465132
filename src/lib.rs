//! Expense Tracker is a web app for recording expenses and income against
//! per-category budgets.
//!
//! This library provides a REST API that directly serves HTML pages, plus the
//! storage, ledger and report functions the pages are built on.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod budget;
mod category;
mod chart;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod html;
mod income;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod report;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, Session, User, UserID, get_user_by_id, get_user_by_username, log_in, register,
    update_password,
};
pub use budget::{Budget, get_budgets, set_budget};
pub use category::{ExpenseType, categories_for};
pub use db::{initialize as initialize_db, open as open_db, with_connection};
pub use expense::{Expense, NewExpense, get_expenses, log_expense};
pub use income::{Income, NewIncome, get_income, log_income};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{BudgetReport, ReportRow, build_budget_report, report_to_csv, report_to_xlsx};
pub use routing::build_router;

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username chosen at registration belongs to another user.
    ///
    /// The client should try again with a different username.
    #[error("the username is already taken")]
    UsernameTaken,

    /// The username and password did not match a registered user.
    ///
    /// Unknown usernames and wrong passwords are deliberately reported with
    /// the same error.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// The backing store could not be opened or initialized.
    #[error("the database is unavailable: {0}")]
    StoreUnavailable(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The budget report could not be written to CSV or a spreadsheet.
    #[error("could not export the report: {0}")]
    ExportError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The auth cookie could not be created.
    #[error("could not create the auth cookie: {0}")]
    CookieError(String),

    /// The lock for the database connection was poisoned by a panicking thread.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("users.username") =>
            {
                Error::UsernameTaken
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::StoreUnavailable(_) | Error::DatabaseLockError => InternalServerError {
                description: "Database Unavailable",
                fix: "The database could not be reached. Try again later or check the server logs.",
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                )
                .into_html(),
            )
                .into_response(),
            Error::StoreUnavailable(_) | Error::DatabaseLockError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Database unavailable",
                    "The database could not be reached, your changes were not saved.",
                )
                .into_html(),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    )
                    .into_html(),
                )
                    .into_response()
            }
        }
    }
}
