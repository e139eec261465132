//! Defines the endpoint for setting a category budget.

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

use crate::{
    AppState, auth::Session, budget::core::set_budget, dashboard::DashboardView,
    db::with_connection,
};

/// The state needed to set a budget.
#[derive(Debug, Clone)]
pub struct SetBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SetBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for setting a budget.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    pub category: String,
    /// The planned spending in dollars.
    pub amount: f64,
    pub expense_type: Option<String>,
    pub chart: Option<String>,
}

/// A route handler for setting a budget, redirects back to the dashboard on success.
pub async fn set_budget_endpoint(
    State(state): State<SetBudgetState>,
    Extension(session): Extension<Session>,
    Form(form): Form<BudgetForm>,
) -> Response {
    let view = DashboardView::from_slugs(form.expense_type.as_deref(), form.chart.as_deref());

    match with_connection(&state.db_connection, |connection| {
        set_budget(&session, &form.category, form.amount, connection)
    }) {
        Ok(_) => (HxRedirect(view.url()), StatusCode::SEE_OTHER).into_response(),
        Err(error) => {
            tracing::error!("could not set {} budget: {error}", form.category);
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod set_budget_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;

    use crate::{
        budget::get_budgets,
        test_utils::{assert_hx_redirect, get_test_connection, test_session},
    };

    use super::{BudgetForm, SetBudgetState, set_budget_endpoint};

    fn form(amount: f64) -> BudgetForm {
        BudgetForm {
            category: "Dining Out".to_owned(),
            amount,
            expense_type: Some("discretionary".to_owned()),
            chart: None,
        }
    }

    #[tokio::test]
    async fn resubmitting_budget_overwrites_amount() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);
        let state = SetBudgetState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        set_budget_endpoint(State(state.clone()), Extension(session), Form(form(50.0))).await;
        let response =
            set_budget_endpoint(State(state.clone()), Extension(session), Form(form(65.0))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/dashboard?expense_type=discretionary&chart=pie");

        let connection = state.db_connection.lock().unwrap();
        let budgets = get_budgets(&session, &connection).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 65.0);
    }
}
