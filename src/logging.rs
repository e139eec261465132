//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{
        Method, StatusCode,
        header::CONTENT_TYPE,
        request::Parts as RequestParts,
        response::Parts as ResponseParts,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Password fields in submitted forms are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(bytes) = read_body(body).await else {
        tracing::error!("could not read the body of the request to {}", parts.uri);
        return StatusCode::BAD_REQUEST.into_response();
    };

    let body_text = String::from_utf8_lossy(&bytes);
    if is_form_post(&parts) {
        log_request(&parts, &redact_form(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let Some(bytes) = read_body(body).await else {
        tracing::error!("could not read the response body");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    log_response(&parts, &String::from_utf8_lossy(&bytes));

    Response::from_parts(parts, Body::from(bytes))
}

fn is_form_post(parts: &RequestParts) -> bool {
    parts.method == Method::POST
        && parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| {
                content_type.starts_with("application/x-www-form-urlencoded")
            })
}

/// Collect `body` so it can be logged and then sent on unchanged.
async fn read_body(body: Body) -> Option<Bytes> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("could not read body: {error}"))
        .ok()
}

/// Replace the values of password fields in a URL encoded form.
fn redact_form(form_text: &str) -> String {
    let Ok(fields) = serde_urlencoded::from_str::<Vec<(String, String)>>(form_text) else {
        return "<unreadable form>".to_owned();
    };

    let fields = fields
        .into_iter()
        .map(|(name, value)| {
            if REDACTED_FIELDS.contains(&name.as_str()) {
                (name, "********".to_owned())
            } else {
                (name, value)
            }
        })
        .collect::<Vec<_>>();

    serde_urlencoded::to_string(fields).unwrap_or_else(|_| "<unreadable form>".to_owned())
}

/// The first [LOG_BODY_LENGTH_LIMIT] bytes of `body`, cut back to a character boundary.
fn truncate(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(parts: &RequestParts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {:}...",
            truncate(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &ResponseParts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {:}...",
            truncate(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{
        Router, middleware,
        routing::{get, post},
    };
    use axum_test::TestServer;

    use crate::report::{BudgetReport, ReportRow, report_to_xlsx};

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_form, truncate};

    #[test]
    fn redacts_both_password_fields() {
        let redacted =
            redact_form("username=alice&password=hunter2&confirm_password=hunter2&remember_me=on");

        assert_eq!(
            redacted,
            "username=alice&password=********&confirm_password=********&remember_me=on"
        );
    }

    #[test]
    fn form_without_passwords_is_unchanged() {
        let form = "category=Rent&amount=1000&date=2025-03-01";

        assert_eq!(redact_form(form), form);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate(&body);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(truncated.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn middleware_passes_body_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .post("/echo")
            .form(&[("username", "alice"), ("password", "hunter2")])
            .await;

        response.assert_status_ok();
        response.assert_text("username=alice&password=hunter2");
    }

    #[tokio::test]
    async fn middleware_leaves_binary_response_untouched() {
        let report = BudgetReport {
            rows: vec![ReportRow {
                category: "Rent".to_owned(),
                budgeted_amount: 1000.0,
                total_expenses: 250.0,
                remaining_budget: 750.0,
            }],
        };
        let workbook = report_to_xlsx(&report).unwrap();
        let want = workbook.clone();
        let app = Router::new()
            .route("/report.xlsx", get(move || async move { workbook }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get("/report.xlsx").await;

        response.assert_status_ok();
        assert_eq!(response.as_bytes().to_vec(), want);
    }
}
