//! Middleware that turns a valid auth cookie into a [Session] for the route handlers.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{
        Session,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::{build_log_in_redirect_url, log_in_url_with_target},
    },
    endpoints,
    timezone::get_local_offset,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts without activity.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

async fn guard(
    state: AuthState,
    request: Request,
    next: Next,
    redirect_to: impl Fn(&str) -> Response,
) -> Response {
    let log_in_url = build_log_in_redirect_url(&request)
        .or_else(|| log_in_url_with_target(endpoints::DASHBOARD_VIEW))
        .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned());

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!(
            "invalid timezone {}, sending user to log in page",
            state.local_timezone
        );
        return redirect_to(&log_in_url);
    };

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("could not read cookie jar: {error:?}");
            return redirect_to(&log_in_url);
        }
    };
    let Ok(token) = get_token_from_cookies(&jar) else {
        return redirect_to(&log_in_url);
    };

    parts.extensions.insert(Session::new(token.user_id));
    let response = next.run(Request::from_parts(parts, body)).await;

    // Keep active users logged in.
    let jar = extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration, local_offset)
        .unwrap_or_else(|error| {
            tracing::error!("could not extend auth cookie: {error:?}");
            jar
        });

    let (mut parts, body) = response.into_parts();
    let jar_response = jar.into_response();
    for value in jar_response.headers().get_all(SET_COOKIE) {
        parts.headers.append(SET_COOKIE, value.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Only let requests with a valid auth cookie through to page routes.
///
/// The request gets a [Session] extension for the cookie's user, which route
/// handlers take with `Extension(session): Extension<Session>`. Requests
/// without a valid cookie are redirected to the log-in page.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, |url| Redirect::to(url).into_response()).await
}

/// Same as [auth_guard], but for routes called by HTMX, which need an
/// `HX-Redirect` header instead of a regular redirect.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, |url| {
        (HxRedirect(url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::State,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::Digest;
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        Error,
        auth::{
            AuthState, COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, Session, UserID, auth_guard,
            auth_guard_hx, set_auth_cookie,
        },
        endpoints,
    };

    const TEST_LOG_IN_ROUTE: &str = "/log_in/test";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";

    async fn echo_user_id(Extension(session): Extension<Session>) -> String {
        session.user_id().to_string()
    }

    async fn stub_log_in_route(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(42), state.cookie_duration, UtcOffset::UTC)
    }

    fn get_state(cookie_duration: Duration) -> AuthState {
        let hash = sha2::Sha512::digest("nafstenoas");

        AuthState {
            cookie_key: Key::from(&hash),
            cookie_duration,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn get_test_server(cookie_duration: Duration) -> TestServer {
        let state = get_state(cookie_duration);
        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(echo_user_id))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn get_test_server_hx() -> TestServer {
        let state = get_state(DEFAULT_COOKIE_DURATION);
        let app = Router::new()
            .route(TEST_API_ROUTE, get(echo_user_id))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn expected_log_in_url(target: &str) -> String {
        let query = serde_urlencoded::to_string([("redirect_url", target)]).unwrap();
        format!("{}?{}", endpoints::LOG_IN_VIEW, query)
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[tokio::test]
    async fn valid_cookie_gives_handler_the_session() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let token_cookie = server.post(TEST_LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_ok();
        response.assert_text("42");
    }

    #[tokio::test]
    async fn auth_guard_extends_valid_cookie_duration() {
        let server = get_test_server(Duration::minutes(5));
        let token_cookie = server.post(TEST_LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        let auth_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            auth_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + Duration::minutes(5),
        );
        assert_eq!(auth_cookie.secure(), Some(true));
        assert_eq!(auth_cookie.http_only(), Some(true));
        assert_eq!(auth_cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn missing_cookie_redirects_to_log_in() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            expected_log_in_url(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn invalid_cookie_redirects_to_log_in() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::build((COOKIE_TOKEN, "FOOBAR")).build())
            .await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            expected_log_in_url(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn api_route_redirects_with_hx_redirect() {
        let server = get_test_server_hx();
        let current_url = "/dashboard?chart=bar";

        let response = server
            .get(TEST_API_ROUTE)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", current_url)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("hx-redirect"),
            expected_log_in_url(current_url)
        );
    }
}
