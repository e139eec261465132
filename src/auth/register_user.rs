//! The registration page and the route handler for creating accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{gate, set_auth_cookie},
    endpoints,
    html::{
        LINK_STYLE, base, field_error, log_in_register, password_input, submit_button,
        username_input,
    },
    timezone::get_local_offset,
};

const EMPTY_USERNAME_ERROR_MSG: &str = "Enter a username.";
const USERNAME_TAKEN_ERROR_MSG: &str = "That username is already taken, choose another.";
const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

#[derive(Default)]
struct FormErrors<'a> {
    username: Option<&'a str>,
    confirm_password: Option<&'a str>,
    form: Option<&'a str>,
}

fn registration_form(username: &str, errors: FormErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username))
            (password_input("password", "Password", None))
            (password_input("confirm_password", "Confirm Password", errors.confirm_password))
            (field_error(errors.form))

            (submit_button("Create Account"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form("", FormErrors::default());
    let content = log_in_register("Create an account", &form);

    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create an account and log the new user in.
///
/// On success the client is redirected to the dashboard, otherwise the form
/// is returned with the problem marked on the relevant field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let username = form.username.trim();

    if username.is_empty() {
        return registration_form(
            username,
            FormErrors {
                username: Some(EMPTY_USERNAME_ERROR_MSG),
                ..Default::default()
            },
        )
        .into_response();
    }

    if form.password != form.confirm_password {
        return registration_form(
            username,
            FormErrors {
                confirm_password: Some(PASSWORD_MISMATCH_ERROR_MSG),
                ..Default::default()
            },
        )
        .into_response();
    }

    let user_id = match gate::create_account(
        &state.db_connection,
        username,
        form.password.clone(),
    )
    .await
    {
        Ok(user_id) => user_id,
        Err(Error::UsernameTaken) => {
            return registration_form(
                username,
                FormErrors {
                    username: Some(USERNAME_TAKEN_ERROR_MSG),
                    ..Default::default()
                },
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("could not register {username}: {error}");
            return registration_form(
                username,
                FormErrors {
                    form: Some(INTERNAL_ERROR_MSG),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    match set_auth_cookie(jar, user_id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set auth cookie for new user {user_id}: {error}");
            redirect_to_log_in()
        }
    }
}

/// Used when the account was created but the user could not be logged in.
fn redirect_to_log_in() -> Response {
    (
        HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
