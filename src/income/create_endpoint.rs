//! Defines the endpoint for logging income.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
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
    income::core::{NewIncome, log_income},
};

/// The state needed to log income.
#[derive(Debug, Clone)]
pub struct CreateIncomeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for logging income.
#[derive(Debug, Deserialize)]
pub struct IncomeForm {
    pub source: String,
    pub amount: f64,
    pub date: Date,
    pub expense_type: Option<String>,
    pub chart: Option<String>,
}

/// A route handler for logging income, redirects back to the dashboard on success.
pub async fn create_income_endpoint(
    State(state): State<CreateIncomeState>,
    Extension(session): Extension<Session>,
    Form(form): Form<IncomeForm>,
) -> Response {
    let view = DashboardView::from_slugs(form.expense_type.as_deref(), form.chart.as_deref());
    let income = NewIncome {
        source: form.source,
        amount: form.amount,
        date: form.date,
    };

    match with_connection(&state.db_connection, |connection| {
        log_income(&session, income, connection)
    }) {
        Ok(_) => (HxRedirect(view.url()), StatusCode::SEE_OTHER).into_response(),
        Err(error) => {
            tracing::error!("could not log income: {error}");
            error.into_alert_response()
        }
    }
}
