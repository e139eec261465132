//! Accounts, passwords, log-in sessions and the middleware guarding private routes.

mod cookie;
mod gate;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod session;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use gate::{log_in, register};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::PasswordHash;
pub use register_user::{get_register_page, register_user};
pub use session::Session;
pub use user::{
    User, UserID, create_user_table, get_user_by_id, get_user_by_username, update_password,
};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub(crate) use gate::register_with_cost;

#[cfg(test)]
pub use middleware::AuthState;
