//! Defines the endpoint for logging a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// axum_extra's Form reads empty optional fields as None instead of failing.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState,
    auth::Session,
    dashboard::DashboardView,
    db::with_connection,
    expense::core::{NewExpense, log_expense},
};

/// The state needed to log an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for logging an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// The amount spent in dollars.
    pub amount: f64,
    pub date: Date,
    /// The dashboard's selected expense type, kept across the redirect.
    pub expense_type: Option<String>,
    /// The dashboard's selected chart, kept across the redirect.
    pub chart: Option<String>,
}

/// A route handler for logging an expense, redirects back to the dashboard on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(session): Extension<Session>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let view = DashboardView::from_slugs(form.expense_type.as_deref(), form.chart.as_deref());
    let expense = NewExpense {
        category: form.category,
        description: form.description,
        amount: form.amount,
        date: form.date,
    };

    if let Err(error) = with_connection(&state.db_connection, |connection| {
        log_expense(&session, expense, connection)
    }) {
        tracing::error!("could not log expense: {error}");
        return error.into_alert_response();
    }

    (HxRedirect(view.url()), StatusCode::SEE_OTHER).into_response()
}

#[cfg(test)]
mod create_expense_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        auth::{Session, UserID},
        expense::get_expenses,
        test_utils::{assert_hx_redirect, get_test_connection, test_session},
    };

    use super::{CreateExpenseState, ExpenseForm, create_expense_endpoint};

    fn form(expense_type: Option<&str>) -> ExpenseForm {
        ExpenseForm {
            category: "Rent".to_owned(),
            description: "March rent".to_owned(),
            amount: 1000.0,
            date: date!(2025 - 03 - 01),
            expense_type: expense_type.map(str::to_owned),
            chart: None,
        }
    }

    #[tokio::test]
    async fn creates_expense_and_redirects_to_dashboard() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = create_expense_endpoint(
            State(state.clone()),
            Extension(session),
            Form(form(Some("variable"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/dashboard?expense_type=variable&chart=pie");

        let connection = state.db_connection.lock().unwrap();
        let expenses = get_expenses(&session, &connection).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, "Rent");
        assert_eq!(expenses[0].amount, 1000.0);
    }

    #[tokio::test]
    async fn failed_insert_returns_alert() {
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let stranger = Session::new(UserID::new(404));

        let response =
            create_expense_endpoint(State(state), Extension(stranger), Form(form(None))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
