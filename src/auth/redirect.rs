//! Where to send a user after they log in.
//!
//! Protected pages redirect to the log-in page with a `redirect_url` query
//! parameter holding the page the user asked for. Only same-site paths are
//! accepted so the parameter cannot be used to bounce users to another site.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Return the path and query of `raw_url` if it is a safe place to redirect to.
///
/// Absolute URLs, protocol-relative URLs (`//evil.example`) and the log-in
/// page itself are rejected.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    safe_path_and_query(&uri)
}

fn safe_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?;
    let target = path_and_query.as_str();

    let is_local = target.starts_with('/') && !target.starts_with("//");
    let is_log_in_page = path_and_query.path() == endpoints::LOG_IN_VIEW;

    (is_local && !is_log_in_page).then(|| target.to_owned())
}

/// The log-in page URL with `target` as the `redirect_url` query parameter.
pub(super) fn log_in_url_with_target(target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", target)])
        .inspect_err(|error| tracing::error!("could not encode redirect URL {target}: {error}"))
        .ok()
        .map(|query| format!("{}?{}", endpoints::LOG_IN_VIEW, query))
}

/// Build the log-in URL that brings the user back to where `request` was going.
///
/// Page requests come back to the requested URI. HTMX requests to `/api`
/// routes come back to the page that issued them, taken from the
/// `HX-Current-URL` header.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let target = if request.uri().path().starts_with("/api") {
        hx_current_page(request)?
    } else {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    };

    log_in_url_with_target(&target)
}

fn hx_current_page(request: &Request) -> Option<String> {
    let headers = request.headers();

    let is_hx_request = headers
        .get("hx-request")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));
    if !is_hx_request {
        tracing::warn!("/api request without the HX-Request header");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|value| value.to_str().ok())
    else {
        tracing::warn!("/api request without the HX-Current-URL header");
        return None;
    };

    // HTMX sends the full URL, keep only the path and query.
    let page = current_url
        .parse::<Uri>()
        .ok()
        .and_then(|uri| safe_path_and_query(&uri));
    if page.is_none() {
        tracing::warn!("ignoring HX-Current-URL {current_url}");
    }

    page
}
