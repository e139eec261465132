//! Route handlers for downloading the budget report as a file.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::Session,
    db::with_connection,
    report::{BudgetReport, build_budget_report, report_to_csv, report_to_xlsx},
};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The state needed to build the report for download.
#[derive(Debug, Clone)]
pub struct ReportDownloadState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportDownloadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn load_report(state: &ReportDownloadState, session: &Session) -> Result<BudgetReport, Error> {
    with_connection(&state.db_connection, |connection| {
        build_budget_report(session, connection)
    })
}

fn attachment(content_type: &'static str, file_name: &str, body: impl IntoResponse) -> Response {
    (
        [
            (CONTENT_TYPE, content_type.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// Download the budget report as `budget_report.csv`.
pub async fn get_report_csv(
    State(state): State<ReportDownloadState>,
    Extension(session): Extension<Session>,
) -> Response {
    match load_report(&state, &session).and_then(|report| report_to_csv(&report)) {
        Ok(csv) => attachment(CSV_CONTENT_TYPE, "budget_report.csv", csv),
        Err(error) => {
            tracing::error!("could not export report as CSV: {error}");
            error.into_response()
        }
    }
}

/// Download the budget report as `budget_report.xlsx`.
pub async fn get_report_xlsx(
    State(state): State<ReportDownloadState>,
    Extension(session): Extension<Session>,
) -> Response {
    match load_report(&state, &session).and_then(|report| report_to_xlsx(&report)) {
        Ok(bytes) => attachment(XLSX_CONTENT_TYPE, "budget_report.xlsx", bytes),
        Err(error) => {
            tracing::error!("could not export report as Excel: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod download_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};

    use crate::{
        budget::set_budget,
        test_utils::{
            assert_content_type, assert_status_ok, get_header, get_test_connection, test_session,
        },
    };

    use super::{ReportDownloadState, get_report_csv, get_report_xlsx};

    #[tokio::test]
    async fn csv_download_is_attachment() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);
        set_budget(&session, "Rent", 1000.0, &conn).unwrap();
        let state = ReportDownloadState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_report_csv(State(state), Extension(session)).await;

        assert_status_ok(&response);
        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"budget_report.csv\""
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Category,Budgeted Amount,Total Expenses,Remaining Budget")
        );
        assert!(lines.next().unwrap().starts_with("Rent,"));
    }

    #[tokio::test]
    async fn xlsx_download_is_attachment() {
        let conn = get_test_connection();
        let session = test_session("alice", &conn);
        let state = ReportDownloadState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_report_xlsx(State(state), Extension(session)).await;

        assert_status_ok(&response);
        assert_content_type(
            &response,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        );
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"budget_report.xlsx\""
        );
    }
}
