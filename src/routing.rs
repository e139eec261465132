//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    budget::set_budget_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    expense::create_expense_endpoint,
    income::create_income_endpoint,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    report::{get_report_csv, get_report_xlsx},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // The downloads are plain links, so they redirect like pages do.
    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::REPORT_CSV, get(get_report_csv))
        .route(endpoints::REPORT_XLSX, get(get_report_xlsx))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
            .route(endpoints::INCOME_API, post(create_income_endpoint))
            .route(endpoints::BUDGETS_API, post(set_budget_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    add_tracing_layer(
        protected_routes
            .merge(unprotected_routes)
            .nest_service(endpoints::STATIC, ServeDir::new("static/"))
            .fallback(get_404_not_found)
            .with_state(state),
    )
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().expect("Could not open in-memory database"),
            "42",
            "Etc/UTC",
        )
        .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_in_and_register_pages_are_public() {
        let server = get_test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn dashboard_redirects_to_log_in_without_cookie() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("location"),
            "/log_in?redirect_url=%2Fdashboard"
        );
    }

    #[tokio::test]
    async fn report_download_redirects_to_log_in_without_cookie() {
        let server = get_test_server();

        let response = server.get(endpoints::REPORT_CSV).await;

        response.assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn api_routes_use_hx_redirect_without_cookie() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSES_API)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", "http://localhost/dashboard?chart=bar")
            .form(&[("category", "Rent"), ("amount", "10"), ("date", "2025-01-01")])
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("hx-redirect"),
            "/log_in?redirect_url=%2Fdashboard%3Fchart%3Dbar"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/does/not/exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
