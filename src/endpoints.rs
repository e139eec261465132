//! The URIs of the pages and API routes.

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for registering users.
pub const USERS: &str = "/api/users";
/// The route for logging an expense.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route for logging income.
pub const INCOME_API: &str = "/api/income";
/// The route for setting a category budget.
pub const BUDGETS_API: &str = "/api/budgets";
/// The budget report as a CSV file.
pub const REPORT_CSV: &str = "/api/report.csv";
/// The budget report as an Excel workbook.
pub const REPORT_XLSX: &str = "/api/report.xlsx";

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::REGISTER_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::LOG_IN_API,
            endpoints::LOG_OUT,
            endpoints::USERS,
            endpoints::EXPENSES_API,
            endpoints::INCOME_API,
            endpoints::BUDGETS_API,
            endpoints::REPORT_CSV,
            endpoints::REPORT_XLSX,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }
}
