//! Registration and log-in checks, independent of HTTP.

use std::sync::{Mutex, OnceLock};

use rusqlite::Connection;

use crate::{
    Error,
    auth::{
        PasswordHash, UserID,
        user::{User, create_user, get_user_by_username},
    },
    db::with_connection,
};

/// Register `username` with `password`, storing only a salted hash of the password.
///
/// # Errors
///
/// Returns a:
/// - [Error::UsernameTaken] if `username` is already registered,
/// - [Error::HashingError] if the password could not be hashed,
/// - [Error::SqlError] if some other SQL related error occurred.
pub fn register(username: &str, password: &str, connection: &Connection) -> Result<UserID, Error> {
    register_with_cost(username, password, PasswordHash::DEFAULT_COST, connection)
}

/// [register] with an explicit bcrypt `cost`, see [PasswordHash::new].
pub fn register_with_cost(
    username: &str,
    password: &str,
    cost: u32,
    connection: &Connection,
) -> Result<UserID, Error> {
    let password_hash = PasswordHash::new(password, cost)?;

    register_with_hash(username, password_hash, connection)
}

fn register_with_hash(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<UserID, Error> {
    let user = create_user(username, password_hash, connection)?;

    tracing::info!("registered user {} as {}", user.username, user.id);

    Ok(user.id)
}

/// Check `username` and `password` against the registered users.
///
/// Returns the user's ID on an exact username match with the right password
/// and `None` otherwise.
///
/// # Errors
///
/// Returns an error only if the database could not be queried or the stored
/// hash could not be checked.
pub fn log_in(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<Option<UserID>, Error> {
    let user = get_user_by_username(username, connection)?;

    verify_credentials(user.as_ref(), password)
}

/// [register] for request handlers.
///
/// The password is hashed on the blocking thread pool and the database lock
/// is only held for the insert.
pub async fn create_account(
    db_connection: &Mutex<Connection>,
    username: &str,
    password: String,
) -> Result<UserID, Error> {
    let password_hash = tokio::task::spawn_blocking(move || {
        PasswordHash::new(&password, PasswordHash::DEFAULT_COST)
    })
    .await
    .map_err(|error| Error::HashingError(error.to_string()))??;

    with_connection(db_connection, |connection| {
        register_with_hash(username, password_hash, connection)
    })
}

/// [log_in] for request handlers.
///
/// The user is looked up under the database lock and the password is
/// verified on the blocking thread pool after the lock is released.
pub async fn check_credentials(
    db_connection: &Mutex<Connection>,
    username: &str,
    password: String,
) -> Result<Option<UserID>, Error> {
    let user = with_connection(db_connection, |connection| {
        get_user_by_username(username, connection)
    })?;

    tokio::task::spawn_blocking(move || verify_credentials(user.as_ref(), &password))
        .await
        .map_err(|error| Error::HashingError(error.to_string()))?
}

fn verify_credentials(user: Option<&User>, password: &str) -> Result<Option<UserID>, Error> {
    let Some(user) = user else {
        // Do the same amount of work as for a registered user so the
        // response time does not reveal whether the username exists.
        let _ = placeholder_hash().verify(password);
        return Ok(None);
    };

    let is_password_valid = user.password_hash.verify(password).map_err(|error| {
        tracing::error!("could not verify password for user {}: {error}", user.id);
        Error::HashingError(error.to_string())
    })?;

    Ok(is_password_valid.then_some(user.id))
}

fn placeholder_hash() -> &'static PasswordHash {
    static PLACEHOLDER: OnceLock<PasswordHash> = OnceLock::new();

    PLACEHOLDER.get_or_init(|| {
        // Any valid bcrypt hash at the default cost, the result is discarded.
        PasswordHash::new_unchecked("$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm")
    })
}
